//! Error types for capture readers.

use std::io;
use thiserror::Error;

/// Errors surfaced by [`SeekableReader`](crate::SeekableReader) operations.
///
/// End-of-data is not represented here: read operations report it as a
/// normal `Ok(None)` outcome.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("repositioning within the capture is not supported by this source")]
    UnsupportedSeek,

    #[error("seek target {offset} is past the end of the capture ({limit} bytes)")]
    OutOfRange { offset: u64, limit: u64 },

    #[error("tried to position to offset {requested} but only reached {skipped}")]
    SeekShortfall { requested: u64, skipped: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
