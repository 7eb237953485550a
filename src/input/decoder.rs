//! Escape Sequence Decoder
//!
//! Reads one key press at a time from a [`ByteSource`] and resolves it to an
//! [`InputEvent`].
//!
//! # State Machine
//!
//! Each call starts fresh; nothing carries over between key presses.
//!
//! ```text
//! START --read 1 byte (blocking)--> HAVE_FIRST_BYTE
//! HAVE_FIRST_BYTE --ESC--> AWAIT_ESCAPE_CONTINUATION
//! HAVE_FIRST_BYTE --other--> LOOKUP
//! AWAIT_ESCAPE_CONTINUATION --timeout--> LOOKUP (lone ESC)
//! AWAIT_ESCAPE_CONTINUATION --byte--> ACCUMULATE_REST
//! ACCUMULATE_REST --read rest (timeout-bounded)--> LOOKUP
//! LOOKUP --exact match--> Key(mapped)
//! LOOKUP --no match--> Character(first byte)
//! ```
//!
//! Unrecognised multi-byte sequences decode as their first byte; the rest of
//! the sequence is dropped.

use tracing::{debug, trace};

use super::{InputEvent, KeySequence, SequenceTable, ESC};
use crate::tty::{ByteSource, TtyError, TtyResult};

/// A decoded key press together with the bytes it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub event: InputEvent,
    pub sequence: KeySequence,
}

/// Keyboard decoder
#[derive(Debug)]
pub struct Decoder<S> {
    source: S,
    table: SequenceTable,
}

impl<S: ByteSource> Decoder<S> {
    /// Create a decoder using the standard sequence table
    pub fn new(source: S) -> Self {
        Self::with_table(source, SequenceTable::new())
    }

    /// Create a decoder using a custom sequence table
    pub fn with_table(source: S, table: SequenceTable) -> Self {
        Self { source, table }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Wait for the next key press and decode it
    pub fn next_event(&mut self) -> TtyResult<InputEvent> {
        self.next_decoded().map(|decoded| decoded.event)
    }

    /// Like [`next_event`](Self::next_event), also returning the raw bytes
    ///
    /// Fails with [`TtyError::EndOfInput`] if the blocking read returns no
    /// data, and with the source's error if a read fails. A timeout while
    /// reading continuation bytes is not an error.
    pub fn next_decoded(&mut self) -> TtyResult<Decoded> {
        let mut first = [0u8; 1];
        if self.source.read(&mut first, true)? == 0 {
            return Err(TtyError::EndOfInput);
        }
        let c = first[0];

        let mut sequence = KeySequence::new();
        sequence.push(c);

        if c == ESC {
            self.read_continuation(&mut sequence)?;
        }

        let event = match self.table.lookup(sequence.as_bytes()) {
            Some(key) => InputEvent::Key(key),
            None => {
                if sequence.len() > 1 {
                    debug!(%sequence, "unrecognised sequence, keeping first byte");
                }
                InputEvent::Character(c)
            },
        };

        trace!(?event, %sequence, "decoded");
        Ok(Decoded { event, sequence })
    }

    /// Collect the bytes following an ESC
    ///
    /// Leaves `sequence` untouched if nothing follows within the timeout,
    /// which is how a lone Escape press is recognised.
    fn read_continuation(&mut self, sequence: &mut KeySequence) -> TtyResult<()> {
        let mut next = [0u8; 1];
        if self.source.read(&mut next, false)? == 0 {
            return Ok(());
        }
        sequence.push(next[0]);

        let mut rest = [0u8; KeySequence::CAPACITY];
        let room = sequence.remaining();
        let n = self.source.read(&mut rest[..room], false)?;
        sequence.extend_from_slice(&rest[..n]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::input::{ScriptedSource, VirtualKey};

    fn decoder<I>(chunks: I) -> Decoder<ScriptedSource>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        Decoder::new(ScriptedSource::new(chunks))
    }

    #[test]
    fn test_plain_character() {
        let mut d = decoder([b"a"]);
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(b'a'));
        assert_eq!(d.source().consumed(), 1);
    }

    #[test]
    fn test_quit_byte_is_ordinary() {
        let mut d = decoder([b"q"]);
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(b'q'));
    }

    #[test]
    fn test_single_byte_keys() {
        let mut d = decoder([b"\n", b"\t", b"\x7f"]);
        assert_eq!(d.next_event().unwrap(), InputEvent::Key(VirtualKey::Enter));
        assert_eq!(d.next_event().unwrap(), InputEvent::Key(VirtualKey::Tab));
        assert_eq!(d.next_event().unwrap(), InputEvent::Key(VirtualKey::Backspace));
    }

    #[test]
    fn test_lone_escape() {
        let mut d = decoder([b"\x1b", b"x"]);
        let decoded = d.next_decoded().unwrap();
        assert_eq!(decoded.event, InputEvent::Key(VirtualKey::Esc));
        assert_eq!(decoded.sequence.as_bytes(), b"\x1b");
        assert_eq!(d.source().consumed(), 1);

        // The next key press is unaffected
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(b'x'));
    }

    #[test]
    fn test_arrow_key() {
        let mut d = decoder([b"\x1b[A"]);
        assert_eq!(d.next_event().unwrap(), InputEvent::Key(VirtualKey::UpArrow));
        assert_eq!(d.source().consumed(), 3);
    }

    #[test]
    fn test_function_key() {
        let mut d = decoder([b"\x1b[15~"]);
        let decoded = d.next_decoded().unwrap();
        assert_eq!(decoded.event, InputEvent::Key(VirtualKey::F5));
        assert_eq!(decoded.sequence.as_bytes(), b"\x1b[15~");
        assert_eq!(d.source().consumed(), 5);
    }

    #[test]
    fn test_every_standard_sequence() {
        let table = SequenceTable::new();
        for (seq, key) in table.iter() {
            let mut d = decoder([seq]);
            assert_eq!(d.next_event().unwrap(), InputEvent::Key(key), "{:02x?}", seq);
            assert!(d.source().is_exhausted());
        }
    }

    #[test]
    fn test_unmapped_sequence_degrades_to_first_byte() {
        let chunks: [&[u8]; 2] = [b"\x1b[Z", b"b"];
        let mut d = decoder(chunks);
        let decoded = d.next_decoded().unwrap();
        assert_eq!(decoded.event, InputEvent::Character(ESC));
        assert_eq!(decoded.sequence.as_bytes(), b"\x1b[Z");
        // Trailing bytes are gone, not replayed
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(b'b'));
    }

    #[test]
    fn test_unmapped_function_keys() {
        // F1 and F12 in xterm encoding are not in the table
        let chunks: [&[u8]; 2] = [b"\x1bOP", b"\x1b[24~"];
        let mut d = decoder(chunks);
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(ESC));
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(ESC));
    }

    #[test]
    fn test_escape_then_slow_bytes() {
        // Second byte arrives in time, the rest only after the timeout
        let chunks: [&[u8]; 2] = [b"\x1b[", b"A"];
        let mut d = decoder(chunks);
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(ESC));
        assert_eq!(d.source().consumed(), 2);
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(b'A'));
    }

    #[test]
    fn test_sequence_capped() {
        let mut input = b"\x1b[".to_vec();
        input.extend_from_slice(&[b'1'; 20]);
        let mut d = decoder([&input]);

        let decoded = d.next_decoded().unwrap();
        assert_eq!(decoded.sequence.len(), KeySequence::CAPACITY);
        assert_eq!(decoded.event, InputEvent::Character(ESC));
        assert_eq!(d.source().consumed(), KeySequence::CAPACITY);
    }

    #[test]
    fn test_end_of_input() {
        let mut d = Decoder::new(ScriptedSource::default());
        assert!(matches!(d.next_event(), Err(TtyError::EndOfInput)));
    }

    #[test]
    fn test_custom_table() {
        let table = SequenceTable::from_entries([(&b"\x1b[Z"[..], VirtualKey::Tab)]).unwrap();
        let chunks: [&[u8]; 2] = [b"\x1b[Z", b"\x1b[A"];
        let mut d = Decoder::with_table(ScriptedSource::new(chunks), table);
        assert_eq!(d.next_event().unwrap(), InputEvent::Key(VirtualKey::Tab));
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(ESC));
    }

    #[test]
    fn test_custom_table_without_escape() {
        let table = SequenceTable::from_entries([(&b"\t"[..], VirtualKey::Tab)]).unwrap();
        let mut d = Decoder::with_table(ScriptedSource::new([b"\x1b"]), table);
        assert_eq!(d.next_event().unwrap(), InputEvent::Character(ESC));
    }

    #[test]
    fn test_borrowed_source() {
        let mut source = ScriptedSource::new([b"z"]);
        {
            let mut d = Decoder::new(&mut source);
            assert_eq!(d.next_event().unwrap(), InputEvent::Character(b'z'));
        }
        assert_eq!(source.consumed(), 1);
    }

    proptest! {
        #[test]
        fn prop_unmapped_bytes_are_characters(b in any::<u8>()) {
            prop_assume!(b != ESC);
            prop_assume!(SequenceTable::new().lookup(&[b]).is_none());

            let mut d = Decoder::new(ScriptedSource::new([[b]]));
            prop_assert_eq!(d.next_event().unwrap(), InputEvent::Character(b));
            prop_assert_eq!(d.source().consumed(), 1);
        }

        #[test]
        fn prop_never_emits_none(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..8)) {
            let mut d = Decoder::new(ScriptedSource::new(chunks));
            loop {
                match d.next_event() {
                    Ok(event) => {
                        prop_assert_ne!(event, InputEvent::Key(VirtualKey::None));
                    },
                    Err(TtyError::EndOfInput) => break,
                    Err(e) => return Err(TestCaseError::fail(e.to_string())),
                }
            }
        }
    }
}
