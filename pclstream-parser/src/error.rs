//! Error types for tokenizing.

use pclstream_io::ReadError;
use thiserror::Error;

/// Errors surfaced while tokenizing a capture.
#[derive(Error, Debug)]
pub enum TokenizeError {
    #[error("read failed: {0}")]
    Read(#[from] ReadError),

    #[error("byte 0x{byte:02X} at offset {offset} cannot appear in a command")]
    UnexpectedByte { offset: u64, byte: u8 },

    #[error("capture ended inside the command starting at offset {offset}")]
    UnexpectedEndOfData { offset: u64 },

    #[error("value {value:?} at offset {offset} is not a usable payload length")]
    BadPayloadLength { offset: u64, value: String },
}
