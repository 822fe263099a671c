//! Byte Access for PCL Captures
//!
//! A capture may be a multi-gigabyte spool file, a buffer already in memory,
//! or an arbitrary byte stream of unknown length. [`SeekableReader`] gives
//! the tokenizer one uniform read/seek/tell surface over all of them,
//! picking the cheapest backend the source supports at construction time:
//!
//! - Mapped: a read-only memory mapping, for files below the mapping limit
//! - Buffered: the whole capture materialized once, for fixed in-memory
//!   sources and anything whose length the capacity probe can determine
//! - Streaming: incremental reads, with seek realized as restart-and-skip
//!
//! The backend is fixed for the reader's lifetime; `position` is tracked in
//! one place regardless of backend, so `tell` is always exact.

pub mod error;
pub mod reader;
pub mod source;

pub use error::ReadError;
pub use reader::SeekableReader;
pub use source::{probe_capacity, CaptureSource};
