//! Bounded key sequence buffer

use std::fmt;

/// The bytes produced by one key press
///
/// A fixed-capacity inline buffer. Bytes pushed past the capacity are
/// dropped, so a runaway sequence can never grow the buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeySequence {
    bytes: [u8; Self::CAPACITY],
    len: usize,
}

impl KeySequence {
    /// Maximum number of bytes in one sequence
    pub const CAPACITY: usize = 11;

    pub fn new() -> Self {
        Self {
            bytes: [0; Self::CAPACITY],
            len: 0,
        }
    }

    /// Append one byte. Returns false if the sequence is full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len == Self::CAPACITY {
            return false;
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        true
    }

    /// Append as many bytes as fit, returning how many were taken
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.bytes[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
        n
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn first(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space left
    pub fn remaining(&self) -> usize {
        Self::CAPACITY - self.len
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for KeySequence {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[u8]> for KeySequence {
    fn from(bytes: &[u8]) -> Self {
        let mut seq = Self::new();
        seq.extend_from_slice(bytes);
        seq
    }
}

impl fmt::Debug for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeySequence({})", self)
    }
}

/// Space separated hex bytes, e.g. `1b 5b 41`
impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
