//! Capture sources that can feed a [`SeekableReader`](crate::SeekableReader).
//!
//! [`CaptureSource`] is `Read` plus three optional capabilities a source may
//! declare: a length it knows upfront, an inner source it delegates to, and
//! the ability to restart from offset zero. The capacity probe composes the
//! first two; the streaming seek path uses the third.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};

/// A byte producer backing a reader.
///
/// Every capability defaults to "not available"; concrete sources override
/// the ones they genuinely have.
pub trait CaptureSource: Read {
    /// Total length in bytes, when the source knows it without being
    /// consumed. Delegating adapters leave this `None` and expose
    /// [`unwrap_inner`](Self::unwrap_inner) instead.
    fn declared_len(&self) -> Option<u64> {
        None
    }

    /// The source this one wraps, for delegating adapters.
    fn unwrap_inner(&self) -> Option<&dyn CaptureSource> {
        None
    }

    /// Whether [`restart`](Self::restart) is available.
    fn supports_restart(&self) -> bool {
        false
    }

    /// Rewinds the source to offset zero.
    fn restart(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "capture source cannot restart",
        ))
    }
}

impl CaptureSource for Cursor<Vec<u8>> {
    fn declared_len(&self) -> Option<u64> {
        Some(self.get_ref().len() as u64)
    }

    fn supports_restart(&self) -> bool {
        true
    }

    fn restart(&mut self) -> io::Result<()> {
        self.set_position(0);
        Ok(())
    }
}

impl CaptureSource for Cursor<&[u8]> {
    fn declared_len(&self) -> Option<u64> {
        Some(self.get_ref().len() as u64)
    }

    fn supports_restart(&self) -> bool {
        true
    }

    fn restart(&mut self) -> io::Result<()> {
        self.set_position(0);
        Ok(())
    }
}

impl CaptureSource for File {
    fn declared_len(&self) -> Option<u64> {
        self.metadata().ok().map(|meta| meta.len())
    }

    fn supports_restart(&self) -> bool {
        true
    }

    fn restart(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

impl<R: CaptureSource + Seek> CaptureSource for BufReader<R> {
    fn unwrap_inner(&self) -> Option<&dyn CaptureSource> {
        Some(self.get_ref())
    }

    fn supports_restart(&self) -> bool {
        true
    }

    fn restart(&mut self) -> io::Result<()> {
        // Seeking through the BufReader also discards its buffer.
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

/// Best-effort total length of a source, without consuming it.
///
/// Unwraps delegating sources one layer at a time until some layer declares
/// a length. `None` means the length is unknowable upfront; that is a
/// normal outcome, not an error; callers that need a length (the Buffered
/// backend) fall back to Streaming.
pub fn probe_capacity(source: &dyn CaptureSource) -> Option<u64> {
    let mut current = source;
    loop {
        if let Some(len) = current.declared_len() {
            return Some(len);
        }
        match current.unwrap_inner() {
            Some(inner) => current = inner,
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_declares_length() {
        let source = Cursor::new(vec![1u8, 2, 3]);
        assert_eq!(probe_capacity(&source), Some(3));
    }

    #[test]
    fn test_probe_unwraps_delegating_source() {
        let source = BufReader::new(Cursor::new(vec![0u8; 42]));
        assert_eq!(probe_capacity(&source), Some(42));
    }

    #[test]
    fn test_probe_unwraps_nested_layers() {
        let source = BufReader::new(BufReader::new(Cursor::new(vec![0u8; 7])));
        assert_eq!(probe_capacity(&source), Some(7));
    }

    #[test]
    fn test_unknown_capacity_is_none() {
        struct Opaque;
        impl Read for Opaque {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Ok(0)
            }
        }
        impl CaptureSource for Opaque {}

        assert_eq!(probe_capacity(&Opaque), None);
    }

    #[test]
    fn test_restart_rewinds_cursor() {
        let mut source = Cursor::new(vec![10u8, 20, 30]);
        let mut buf = [0u8; 2];
        source.read_exact(&mut buf).unwrap();
        source.restart().unwrap();
        let mut all = Vec::new();
        source.read_to_end(&mut all).unwrap();
        assert_eq!(all, vec![10, 20, 30]);
    }
}
