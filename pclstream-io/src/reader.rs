//! The seekable reader over a PCL capture.
//!
//! One reader, three backends. The backend is chosen once, at construction,
//! from what the source can do, without runtime type inspection. The cursor
//! (`position`) lives on the reader itself and is updated by exactly one
//! code path per operation, so backend bookkeeping can never drift from
//! what `tell` reports.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use memmap2::Mmap;

use crate::error::ReadError;
use crate::source::{probe_capacity, CaptureSource};

/// Largest file the Mapped backend takes on; larger captures fall back to
/// Streaming. Matches the addressable range of a 32-bit mapping view.
pub const MAP_LIMIT: u64 = i32::MAX as u64;

enum Backend {
    /// Read-only mapping of a capture file.
    Mapped { map: Mmap },
    /// The whole capture, materialized once into an owned buffer.
    Buffered { buf: Vec<u8> },
    /// Incremental reads from an arbitrary source.
    Streaming { source: Box<dyn CaptureSource> },
}

/// Uniform read/seek/tell access over a PCL capture.
///
/// The reader exclusively owns its backend resource (the mapping, the
/// buffer, or the boxed source) and releases it deterministically when
/// dropped or explicitly [`close`](Self::close)d. It is not safe for
/// concurrent use without external synchronization: there is a single
/// cursor and, for the Mapped and Streaming backends, a single underlying
/// OS resource.
pub struct SeekableReader {
    backend: Backend,
    /// Absolute offset of the next unread byte.
    position: u64,
}

impl SeekableReader {
    /// Opens a capture file. Files below [`MAP_LIMIT`] are memory-mapped;
    /// larger ones are streamed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        Self::from_file(File::open(path)?)
    }

    /// Wraps an already-open capture file, applying the same mapping rule
    /// as [`from_path`](Self::from_path).
    pub fn from_file(file: File) -> Result<Self, ReadError> {
        let len = file.metadata()?.len();
        if len < MAP_LIMIT {
            // SAFETY: the mapping is read-only and created from a file handle
            // this function owns; it stays valid after the handle is dropped.
            let map = unsafe { Mmap::map(&file)? };
            log::debug!("mapped {len} byte capture");
            Ok(SeekableReader {
                backend: Backend::Mapped { map },
                position: 0,
            })
        } else {
            log::debug!("{len} byte capture exceeds the mapping limit, streaming");
            Ok(SeekableReader {
                backend: Backend::Streaming { source: Box::new(file) },
                position: 0,
            })
        }
    }

    /// Wraps a capture that is already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        SeekableReader {
            backend: Backend::Buffered { buf: bytes },
            position: 0,
        }
    }

    /// Wraps an arbitrary source. When the capacity probe can determine a
    /// total length the capture is materialized into the Buffered backend;
    /// otherwise it is streamed.
    pub fn from_source<S: CaptureSource + 'static>(mut source: S) -> Result<Self, ReadError> {
        match probe_capacity(&source) {
            Some(len) => {
                let mut buf = Vec::with_capacity(len as usize);
                source.read_to_end(&mut buf)?;
                log::debug!("buffered {} byte capture", buf.len());
                Ok(Self::from_bytes(buf))
            }
            None => {
                log::debug!("capture length unknown, streaming");
                Ok(SeekableReader {
                    backend: Backend::Streaming { source: Box::new(source) },
                    position: 0,
                })
            }
        }
    }

    /// Reads the next byte. `Ok(None)` is end of data, a normal outcome.
    pub fn read_byte(&mut self) -> Result<Option<u8>, ReadError> {
        let position = self.position;
        let byte = match &mut self.backend {
            Backend::Mapped { map } => map.get(position as usize).copied(),
            Backend::Buffered { buf } => buf.get(position as usize).copied(),
            Backend::Streaming { source } => {
                let mut one = [0u8; 1];
                loop {
                    match source.read(&mut one) {
                        Ok(0) => break None,
                        Ok(_) => break Some(one[0]),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        };
        if byte.is_some() {
            self.position += 1;
        }
        Ok(byte)
    }

    /// Fills as much of `buf` as the remaining data permits and returns the
    /// count; partial fills are normal. `Ok(None)` when zero bytes remain.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<Option<usize>, ReadError> {
        let position = self.position;
        let filled = match &mut self.backend {
            Backend::Mapped { map } => copy_partial(map, position, buf),
            Backend::Buffered { buf: owned } => copy_partial(owned, position, buf),
            Backend::Streaming { source } => loop {
                match source.read(buf) {
                    Ok(0) if buf.is_empty() => break Some(0),
                    Ok(0) => break None,
                    Ok(n) => break Some(n),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            },
        };
        if let Some(count) = filled {
            self.position += count as u64;
        }
        Ok(filled)
    }

    /// Fills all of `buf`, or reports end of data (`Ok(None)`) when fewer
    /// bytes remain; never a partial count, unlike
    /// [`read_into`](Self::read_into). The asymmetry is deliberate and
    /// matches existing callers. On the Streaming backend an end-of-data
    /// outcome may still have consumed the trailing bytes, and `tell`
    /// reflects what was actually consumed.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<Option<usize>, ReadError> {
        let wanted = buf.len();
        let position = self.position;
        match &mut self.backend {
            Backend::Mapped { map } => {
                if !copy_exact(map, position, buf) {
                    return Ok(None);
                }
            }
            Backend::Buffered { buf: owned } => {
                if !copy_exact(owned, position, buf) {
                    return Ok(None);
                }
            }
            Backend::Streaming { source } => {
                let mut filled = 0;
                while filled < wanted {
                    match source.read(&mut buf[filled..]) {
                        Ok(0) => {
                            self.position += filled as u64;
                            return Ok(None);
                        }
                        Ok(n) => filled += n,
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            self.position += filled as u64;
                            return Err(e.into());
                        }
                    }
                }
            }
        }
        self.position += wanted as u64;
        Ok(Some(wanted))
    }

    /// Repositions to an absolute offset measured from the start of the
    /// capture. Mapped and Buffered backends bounds-check the target;
    /// Streaming backends restart the source and skip forward, failing
    /// hard on a shortfall rather than stopping short.
    pub fn seek(&mut self, offset: u64) -> Result<(), ReadError> {
        match &mut self.backend {
            Backend::Mapped { map } => {
                let limit = map.len() as u64;
                if offset > limit {
                    return Err(ReadError::OutOfRange { offset, limit });
                }
                self.position = offset;
                Ok(())
            }
            Backend::Buffered { buf } => {
                let limit = buf.len() as u64;
                if offset > limit {
                    return Err(ReadError::OutOfRange { offset, limit });
                }
                self.position = offset;
                Ok(())
            }
            Backend::Streaming { source } => {
                if !source.supports_restart() {
                    return Err(ReadError::UnsupportedSeek);
                }
                source.restart()?;
                self.position = 0;
                let skipped = skip_forward(source.as_mut(), offset)?;
                self.position = skipped;
                if skipped != offset {
                    return Err(ReadError::SeekShortfall {
                        requested: offset,
                        skipped,
                    });
                }
                Ok(())
            }
        }
    }

    /// Current absolute offset of the next unread byte.
    pub fn tell(&self) -> u64 {
        self.position
    }

    /// Releases the backend resource. Dropping the reader performs the same
    /// release on every other exit path; `close` just makes the point of
    /// release explicit.
    pub fn close(self) {}
}

impl Drop for SeekableReader {
    fn drop(&mut self) {
        if let Backend::Buffered { buf } = &mut self.backend {
            // Captures carry print content; scrub the materialized copy
            // before the allocation is returned.
            buf.fill(0);
        }
    }
}

fn copy_partial(data: &[u8], position: u64, out: &mut [u8]) -> Option<usize> {
    let position = position as usize;
    let remaining = data.len().saturating_sub(position);
    if remaining == 0 && !out.is_empty() {
        return None;
    }
    let count = out.len().min(remaining);
    out[..count].copy_from_slice(&data[position..position + count]);
    Some(count)
}

fn copy_exact(data: &[u8], position: u64, out: &mut [u8]) -> bool {
    let position = position as usize;
    if data.len().saturating_sub(position) < out.len() {
        return false;
    }
    out.copy_from_slice(&data[position..position + out.len()]);
    true
}

fn skip_forward(source: &mut dyn CaptureSource, count: u64) -> Result<u64, ReadError> {
    let mut scratch = [0u8; 8192];
    let mut skipped = 0u64;
    while skipped < count {
        let want = ((count - skipped).min(scratch.len() as u64)) as usize;
        match source.read(&mut scratch[..want]) {
            Ok(0) => break,
            Ok(n) => skipped += n as u64,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CaptureSource;
    use std::io::Read;

    /// Streaming-only source: no declared length, reads in small chunks.
    struct Chunked {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
        restartable: bool,
    }

    impl Chunked {
        fn new(data: Vec<u8>, chunk: usize, restartable: bool) -> Self {
            Chunked {
                data,
                pos: 0,
                chunk,
                restartable,
            }
        }
    }

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let remaining = self.data.len() - self.pos;
            let count = buf.len().min(self.chunk).min(remaining);
            buf[..count].copy_from_slice(&self.data[self.pos..self.pos + count]);
            self.pos += count;
            Ok(count)
        }
    }

    impl CaptureSource for Chunked {
        fn supports_restart(&self) -> bool {
            self.restartable
        }

        fn restart(&mut self) -> io::Result<()> {
            if !self.restartable {
                return Err(io::Error::new(io::ErrorKind::Unsupported, "no restart"));
            }
            self.pos = 0;
            Ok(())
        }
    }

    fn streaming(data: &[u8]) -> SeekableReader {
        SeekableReader::from_source(Chunked::new(data.to_vec(), 3, true)).unwrap()
    }

    #[test]
    fn test_buffered_read_byte() {
        let mut reader = SeekableReader::from_bytes(vec![0x1B, b'E']);
        assert_eq!(reader.read_byte().unwrap(), Some(0x1B));
        assert_eq!(reader.read_byte().unwrap(), Some(b'E'));
        assert_eq!(reader.read_byte().unwrap(), None);
        assert_eq!(reader.tell(), 2);
    }

    #[test]
    fn test_buffered_read_into_partial() {
        let mut reader = SeekableReader::from_bytes(vec![1, 2, 3]);
        let mut buf = [0u8; 8];
        assert_eq!(reader.read_into(&mut buf).unwrap(), Some(3));
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(reader.read_into(&mut buf).unwrap(), None);
        assert_eq!(reader.tell(), 3);
    }

    #[test]
    fn test_buffered_read_exact_refuses_partial() {
        let mut reader = SeekableReader::from_bytes(vec![1, 2, 3]);
        let mut buf = [0u8; 4];
        // Fewer than four bytes remain: end-of-data, not a short fill.
        assert_eq!(reader.read_exact(&mut buf).unwrap(), None);
        assert_eq!(reader.tell(), 0);

        let mut buf = [0u8; 3];
        assert_eq!(reader.read_exact(&mut buf).unwrap(), Some(3));
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(reader.tell(), 3);
    }

    #[test]
    fn test_buffered_seek_and_tell() {
        let mut reader = SeekableReader::from_bytes(vec![10, 20, 30, 40]);
        reader.seek(2).unwrap();
        assert_eq!(reader.tell(), 2);
        assert_eq!(reader.read_byte().unwrap(), Some(30));

        // Seeking exactly to the limit is allowed; past it is not.
        reader.seek(4).unwrap();
        assert_eq!(reader.tell(), 4);
        match reader.seek(5) {
            Err(ReadError::OutOfRange { offset: 5, limit: 4 }) => {}
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_destination_buffer() {
        let mut reader = SeekableReader::from_bytes(vec![1]);
        let mut empty = [0u8; 0];
        assert_eq!(reader.read_into(&mut empty).unwrap(), Some(0));
        assert_eq!(reader.read_exact(&mut empty).unwrap(), Some(0));
        assert_eq!(reader.tell(), 0);
    }

    #[test]
    fn test_source_with_known_length_is_buffered() {
        let source = std::io::Cursor::new(vec![5u8, 6, 7]);
        let mut reader = SeekableReader::from_source(source).unwrap();
        // Buffered backends bounds-check seeks, so an out-of-range target
        // reports OutOfRange rather than a streaming shortfall.
        match reader.seek(99) {
            Err(ReadError::OutOfRange { .. }) => {}
            other => panic!("expected OutOfRange, got {other:?}"),
        }
        assert_eq!(reader.read_byte().unwrap(), Some(5));
    }

    #[test]
    fn test_streaming_reads_across_chunks() {
        let mut reader = streaming(b"abcdefgh");
        let mut buf = [0u8; 8];
        assert_eq!(reader.read_exact(&mut buf).unwrap(), Some(8));
        assert_eq!(&buf, b"abcdefgh");
        assert_eq!(reader.tell(), 8);
        assert_eq!(reader.read_byte().unwrap(), None);
    }

    #[test]
    fn test_streaming_read_into_returns_chunk() {
        let mut reader = streaming(b"abcdefgh");
        let mut buf = [0u8; 8];
        // The source hands out at most three bytes per read; a partial
        // fill is a normal outcome for read_into.
        assert_eq!(reader.read_into(&mut buf).unwrap(), Some(3));
        assert_eq!(reader.tell(), 3);
    }

    #[test]
    fn test_streaming_seek_restarts_and_skips() {
        let mut reader = streaming(b"abcdefgh");
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).unwrap();

        reader.seek(2).unwrap();
        assert_eq!(reader.tell(), 2);
        assert_eq!(reader.read_byte().unwrap(), Some(b'c'));

        // Seeking backwards works the same way: restart, then skip.
        reader.seek(0).unwrap();
        assert_eq!(reader.tell(), 0);
        assert_eq!(reader.read_byte().unwrap(), Some(b'a'));
    }

    #[test]
    fn test_streaming_seek_past_end_is_shortfall() {
        let mut reader = streaming(b"abc");
        match reader.seek(10) {
            Err(ReadError::SeekShortfall {
                requested: 10,
                skipped: 3,
            }) => {}
            other => panic!("expected SeekShortfall, got {other:?}"),
        }
        // The cursor honestly reports how far the skip actually got.
        assert_eq!(reader.tell(), 3);
    }

    #[test]
    fn test_streaming_seek_unsupported() {
        let source = Chunked::new(b"abc".to_vec(), 2, false);
        let mut reader = SeekableReader::from_source(source).unwrap();
        match reader.seek(1) {
            Err(ReadError::UnsupportedSeek) => {}
            other => panic!("expected UnsupportedSeek, got {other:?}"),
        }
    }

    #[test]
    fn test_streaming_read_exact_consumes_tail_on_end_of_data() {
        let mut reader = streaming(b"abc");
        let mut buf = [0u8; 5];
        assert_eq!(reader.read_exact(&mut buf).unwrap(), None);
        // The trailing bytes were consumed while attempting the fill.
        assert_eq!(reader.tell(), 3);
    }
}
