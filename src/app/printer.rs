//! Diagnostic event output

use std::io::{self, Write};

use crate::input::{Decoded, InputEvent};
use crate::tty::{ConsoleSize, RawMode};

/// Writes a human readable line for every decoded key press
pub struct EventPrinter<W: Write> {
    out: W,
    line_ending: &'static str,
    show_sequences: bool,
}

impl<W: Write> EventPrinter<W> {
    pub fn new(out: W, mode: RawMode, show_sequences: bool) -> Self {
        Self {
            out,
            line_ending: mode.line_ending(),
            show_sequences,
        }
    }

    /// Print the console size followed by a column ruler
    ///
    /// The ruler is `columns - 1` digits counting 0-9 and a closing `*`, so it
    /// exactly fills one row.
    pub fn banner(&mut self, size: ConsoleSize) -> io::Result<()> {
        write!(self.out, "text({} {}){}", size.rows, size.columns, self.line_ending)?;
        let ruler: String = (0..size.columns.saturating_sub(1))
            .map(|i| char::from(b'0' + (i % 10) as u8))
            .collect();
        write!(self.out, "{}*{}", ruler, self.line_ending)?;
        self.out.flush()
    }

    /// Print one decoded key press
    pub fn print(&mut self, decoded: &Decoded) -> io::Result<()> {
        let le = self.line_ending;
        match decoded.event {
            InputEvent::Key(key) => {
                if self.show_sequences {
                    write!(self.out, "key seq - ")?;
                    for byte in decoded.sequence.as_bytes() {
                        write!(self.out, " 0x{:x} ", byte)?;
                    }
                    write!(self.out, "{}", le)?;
                }
                write!(self.out, "vk        input - {} ({}){}", key.code(), key, le)?;
            },
            InputEvent::Character(c) if c == b' ' || c.is_ascii_graphic() => {
                write!(self.out, "character input - {}{}", char::from(c), le)?;
            },
            InputEvent::Character(c) => {
                write!(self.out, "character input - 0x{:02x}{}", c, le)?;
            },
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
