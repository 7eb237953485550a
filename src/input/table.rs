//! Escape sequence lookup table
//!
//! Maps the exact byte sequence a key produces to its virtual key.

use super::{KeySequence, VirtualKey};

/// Sequences recognised by the standard table
///
/// F1, F10-F12, Print Screen and Pause/Break have no entry and are never
/// produced by the decoder.
const STANDARD_SEQUENCES: &[(&[u8], VirtualKey)] = &[
    (b"\x1b", VirtualKey::Esc),
    (b"\x1b[OQ", VirtualKey::F2),
    (b"\x1b[OR", VirtualKey::F3),
    (b"\x1b[OS", VirtualKey::F4),
    (b"\x1b[15~", VirtualKey::F5),
    (b"\x1b[17~", VirtualKey::F6),
    (b"\x1b[18~", VirtualKey::F7),
    (b"\x1b[19~", VirtualKey::F8),
    (b"\x1b[20~", VirtualKey::F9),
    (b"\x1b[H", VirtualKey::Home),
    (b"\x1b[F", VirtualKey::End),
    (b"\x1b[A", VirtualKey::UpArrow),
    (b"\x1b[B", VirtualKey::DownArrow),
    (b"\x1b[C", VirtualKey::RightArrow),
    (b"\x1b[D", VirtualKey::LeftArrow),
    (b"\x1b[5~", VirtualKey::PageUp),
    (b"\x1b[6~", VirtualKey::PageDown),
    (b"\x1b[2~", VirtualKey::Insert),
    (b"\x1b[3~", VirtualKey::Delete),
    (b"\x7f", VirtualKey::Backspace),
    (b"\x0a", VirtualKey::Enter),
    (b"\x09", VirtualKey::Tab),
];

/// Error building a custom table
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Sequence {0:02x?} is mapped more than once")]
    Duplicate(Vec<u8>),

    #[error("Empty sequence cannot be mapped")]
    Empty,

    #[error("Sequence {0:02x?} is longer than {max} bytes", max = KeySequence::CAPACITY)]
    TooLong(Vec<u8>),

    #[error("Sequence {0:02x?} maps to VirtualKey::None")]
    NoneKey(Vec<u8>),
}

/// Immutable sequence to key mapping
///
/// Stored as a sorted array searched by binary search; lookups only match
/// whole sequences, never prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceTable {
    entries: Vec<(Vec<u8>, VirtualKey)>,
}

impl SequenceTable {
    /// The standard table
    pub fn new() -> Self {
        let mut entries: Vec<(Vec<u8>, VirtualKey)> = STANDARD_SEQUENCES
            .iter()
            .map(|(seq, key)| (seq.to_vec(), *key))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    /// Build a custom table
    pub fn from_entries<I, S>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, VirtualKey)>,
        S: AsRef<[u8]>,
    {
        let mut sorted = Vec::new();
        for (seq, key) in entries {
            let seq = seq.as_ref().to_vec();
            if seq.is_empty() {
                return Err(TableError::Empty);
            }
            if seq.len() > KeySequence::CAPACITY {
                return Err(TableError::TooLong(seq));
            }
            if key == VirtualKey::None {
                return Err(TableError::NoneKey(seq));
            }
            sorted.push((seq, key));
        }

        sorted.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(TableError::Duplicate(pair[0].0.clone()));
        }

        Ok(Self { entries: sorted })
    }

    /// Exact-match lookup
    pub fn lookup(&self, sequence: &[u8]) -> Option<VirtualKey> {
        self.entries
            .binary_search_by(|(seq, _)| seq.as_slice().cmp(sequence))
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in byte order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], VirtualKey)> {
        self.entries.iter().map(|(seq, key)| (seq.as_slice(), *key))
    }
}

impl Default for SequenceTable {
    fn default() -> Self {
        Self::new()
    }
}
