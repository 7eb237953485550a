//! Replayable byte source

use std::collections::VecDeque;

use crate::tty::{ByteSource, TtyResult};

/// A byte source over pre-recorded input
///
/// Input is a list of chunks, each standing for bytes that arrived together.
/// The boundary after a chunk behaves like a read timeout: the first
/// non-blocking read that finds the current chunk used up returns `Ok(0)`
/// and moves on to the next chunk. Blocking reads skip boundaries. Once all
/// chunks are consumed every read returns `Ok(0)`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    chunks: VecDeque<Vec<u8>>,
    consumed: usize,
}

impl ScriptedSource {
    pub fn new<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        Self {
            chunks: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
            consumed: 0,
        }
    }

    /// Total bytes handed out so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Bytes not yet read
    pub fn remaining(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

impl ByteSource for ScriptedSource {
    fn read(&mut self, buf: &mut [u8], blocking: bool) -> TtyResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if blocking {
            while self.chunks.front().is_some_and(Vec::is_empty) {
                self.chunks.pop_front();
            }
        }

        let Some(chunk) = self.chunks.front_mut() else {
            return Ok(0);
        };

        if chunk.is_empty() {
            // Timeout: nothing more arrived after the last chunk
            self.chunks.pop_front();
            return Ok(0);
        }

        let n = buf.len().min(chunk.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        *chunk = chunk.split_off(n);
        self.consumed += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_boundary_times_out() {
        let chunks: [&[u8]; 2] = [b"ab", b"c"];
        let mut source = ScriptedSource::new(chunks);
        let mut buf = [0u8; 8];

        assert_eq!(source.read(&mut buf, false).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        // End of first chunk acts as a timeout
        assert_eq!(source.read(&mut buf, false).unwrap(), 0);
        assert_eq!(source.read(&mut buf, false).unwrap(), 1);
        assert_eq!(buf[0], b'c');
        assert_eq!(source.consumed(), 3);
        assert!(source.is_exhausted());
    }

    #[test]
    fn test_blocking_read_skips_boundaries() {
        let chunks: [&[u8]; 3] = [b"a", b"", b"b"];
        let mut source = ScriptedSource::new(chunks);
        let mut buf = [0u8; 1];

        assert_eq!(source.read(&mut buf, true).unwrap(), 1);
        assert_eq!(source.read(&mut buf, true).unwrap(), 1);
        assert_eq!(buf[0], b'b');
        assert_eq!(source.read(&mut buf, true).unwrap(), 0);
    }

    #[test]
    fn test_partial_reads() {
        let mut source = ScriptedSource::new([b"hello"]);
        let mut buf = [0u8; 2];
        assert_eq!(source.read(&mut buf, true).unwrap(), 2);
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.read(&mut buf, false).unwrap(), 2);
        assert_eq!(&buf, b"ll");
        assert_eq!(source.read(&mut [], false).unwrap(), 0);
        assert_eq!(source.remaining(), 1);
    }
}
