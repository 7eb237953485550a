//! Terminal (tty) handling
//!
//! This module owns the OS-facing side of keyboard decoding: switching the
//! input line discipline into raw mode, reading bytes with blocking or
//! timeout-bounded semantics, and querying the console size.

use serde::{Deserialize, Serialize};

#[cfg(unix)]
mod signals;
#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use signals::FATAL_SIGNALS;
#[cfg(unix)]
pub use unix::{console_size, RawModeController, DEFAULT_TIMEOUT_TENTHS};

/// Error type for terminal operations
#[derive(Debug, thiserror::Error)]
pub enum TtyError {
    #[error("Failed to read terminal attributes: {0}")]
    GetAttr(#[source] nix::Error),

    #[error("Failed to set terminal attributes: {0}")]
    SetAttr(#[source] nix::Error),

    #[error("Failed to read from terminal: {0}")]
    Read(#[source] nix::Error),

    #[error("Failed to query console size: {0}")]
    TerminalQuery(#[source] nix::Error),

    #[error("Failed to install signal handlers: {0}")]
    Signal(#[source] nix::Error),

    #[error("Standard input reached end of file")]
    EndOfInput,
}

/// Result type for terminal operations
pub type TtyResult<T> = Result<T, TtyError>;

/// How far raw mode strips the line discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RawMode {
    /// Turn off canonical mode and echo. Keys are delivered immediately,
    /// signals (Ctrl-C, Ctrl-Z) and output processing stay enabled.
    #[default]
    ImmediateNoEcho,
    /// Full raw mode (`cfmakeraw`). Ctrl-C, Ctrl-Z, Ctrl-S, Ctrl-Q and Ctrl-V
    /// arrive as plain bytes and output post-processing is off.
    ImmediateNoEchoIgnoreSignals,
}

impl RawMode {
    /// Line terminator to use when writing to a terminal in this mode
    pub fn line_ending(self) -> &'static str {
        match self {
            RawMode::ImmediateNoEcho => "\n",
            // OPOST is cleared, so LF no longer implies CR
            RawMode::ImmediateNoEchoIgnoreSignals => "\r\n",
        }
    }
}

/// Console text window size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsoleSize {
    pub rows: u16,
    pub columns: u16,
}

impl ConsoleSize {
    pub fn new(rows: u16, columns: u16) -> Self {
        Self { rows, columns }
    }
}

/// A source of raw input bytes
///
/// A blocking read waits indefinitely for at least one byte. A non-blocking
/// read waits at most a short, implementation-defined timeout and returns
/// `Ok(0)` if nothing arrived; that is a normal outcome, not an error.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes into `buf`, returning the count read.
    fn read(&mut self, buf: &mut [u8], blocking: bool) -> TtyResult<usize>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8], blocking: bool) -> TtyResult<usize> {
        (**self).read(buf, blocking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_mode_default() {
        assert_eq!(RawMode::default(), RawMode::ImmediateNoEcho);
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(RawMode::ImmediateNoEcho.line_ending(), "\n");
        assert_eq!(RawMode::ImmediateNoEchoIgnoreSignals.line_ending(), "\r\n");
    }

    #[test]
    fn test_raw_mode_serialization() {
        let json = serde_json::to_string(&RawMode::ImmediateNoEchoIgnoreSignals).unwrap();
        assert_eq!(json, "\"ImmediateNoEchoIgnoreSignals\"");
        let restored: RawMode = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, RawMode::ImmediateNoEchoIgnoreSignals);
    }

    #[test]
    fn test_console_size() {
        let size = ConsoleSize::new(24, 80);
        assert_eq!(size.rows, 24);
        assert_eq!(size.columns, 80);
    }
}
