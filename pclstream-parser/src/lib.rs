//! PCL Capture Tokenizer
//!
//! This crate walks a PCL capture through a
//! [`SeekableReader`](pclstream_io::SeekableReader) and lazily emits decoded
//! [`Token`]s: parameterized escape sequences, two-character escape
//! commands, control bytes, and runs of printable text.
//!
//! The tokenizer is:
//! - Lazy: tokens are decoded on demand via `Iterator`
//! - Positional: every token carries the stream offset it began at
//! - Lossless: every token re-encodes to its original bytes
//!
//! Combined sequences (several value/terminator segments after one escape)
//! are split into one command record per segment, and commands whose kind
//! carries embedded binary data pull their payload from the reader.
//!
//! ```
//! use pclstream_io::SeekableReader;
//! use pclstream_parser::{Token, Tokenizer};
//!
//! let reader = SeekableReader::from_bytes(b"\x1b&l0S".to_vec());
//! let tokens: Vec<Token> = Tokenizer::new(reader)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].to_bytes(), b"\x1b&l0S");
//! ```

pub mod error;
pub mod token;
pub mod tokenizer;

pub use error::TokenizeError;
pub use token::Token;
pub use tokenizer::{carries_data, Tokenizer};
