//! Unix raw mode implementation
//!
//! Implements raw mode switching and byte reads on top of termios.

use std::io;
use std::os::fd::{AsFd, AsRawFd};

use nix::libc;
use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};
use nix::unistd;
use tracing::{debug, trace, warn};

use super::signals::SignalGuard;
use super::{ByteSource, ConsoleSize, RawMode, TtyError, TtyResult};

/// Default timeout for non-blocking reads, in tenths of a second (VTIME)
pub const DEFAULT_TIMEOUT_TENTHS: u8 = 1;

/// Owner of a terminal's raw mode state
///
/// The first call to [`enter`](Self::enter) snapshots the terminal settings.
/// Later calls only switch between blocking and timeout-bounded reads and
/// never touch the snapshot. The snapshot is written back by
/// [`restore`](Self::restore), when the controller is dropped while raw mode
/// is still active (including during a panic unwind), and by the handlers
/// for [`FATAL_SIGNALS`](super::FATAL_SIGNALS) if the process is killed.
pub struct RawModeController<F: AsFd> {
    /// The terminal file descriptor (stdin in the binary)
    fd: F,
    /// Which flags raw mode clears
    mode: RawMode,
    /// VTIME used for non-blocking reads
    timeout_tenths: u8,
    /// Settings captured on the first `enter`
    original: Option<Termios>,
    /// Whether raw settings are currently installed
    active: bool,
    /// Registration of `original` with the fatal signal handlers
    signal_guard: Option<SignalGuard>,
}

impl RawModeController<io::Stdin> {
    /// Create a controller for the process's standard input
    pub fn stdin(mode: RawMode) -> Self {
        Self::new(io::stdin(), mode)
    }
}

impl<F: AsFd> RawModeController<F> {
    /// Create a controller for `fd`. Nothing is changed until `enter`.
    pub fn new(fd: F, mode: RawMode) -> Self {
        Self {
            fd,
            mode,
            timeout_tenths: DEFAULT_TIMEOUT_TENTHS,
            original: None,
            active: false,
            signal_guard: None,
        }
    }

    /// Set the non-blocking read timeout in tenths of a second
    ///
    /// A value of 0 would turn non-blocking reads into pure polls, which
    /// cannot tell a lone ESC from a sequence still in flight, so it is
    /// raised to 1.
    pub fn with_timeout_tenths(mut self, tenths: u8) -> Self {
        self.timeout_tenths = tenths.max(1);
        self
    }

    pub fn timeout_tenths(&self) -> u8 {
        self.timeout_tenths
    }

    /// Whether raw settings are currently installed
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The settings captured by the first `enter`, if any
    pub fn original(&self) -> Option<&Termios> {
        self.original.as_ref()
    }

    /// Install raw mode
    ///
    /// With `wait_for_input` reads block until one byte is available
    /// (VMIN=1, VTIME=0). Without it reads return after the configured
    /// timeout even if nothing arrived (VMIN=0, VTIME=timeout).
    ///
    /// Settings are applied with `TCSANOW` so keys already typed stay queued.
    pub fn enter(&mut self, wait_for_input: bool) -> TtyResult<()> {
        let original = match self.original.clone() {
            Some(original) => original,
            None => {
                let original = termios::tcgetattr(&self.fd).map_err(TtyError::GetAttr)?;
                debug!(
                    vmin = original.control_chars[SpecialCharacterIndices::VMIN as usize],
                    vtime = original.control_chars[SpecialCharacterIndices::VTIME as usize],
                    "saved original terminal settings"
                );
                let guard = SignalGuard::arm(self.fd.as_fd().as_raw_fd(), &original)?;
                self.signal_guard = Some(guard);
                self.original = Some(original.clone());
                original
            },
        };

        let raw = raw_settings(original, self.mode, wait_for_input, self.timeout_tenths);
        termios::tcsetattr(&self.fd, SetArg::TCSANOW, &raw).map_err(TtyError::SetAttr)?;
        self.active = true;
        Ok(())
    }

    /// Write the saved settings back
    ///
    /// Pending unread input is discarded (`TCSAFLUSH`). Does nothing if
    /// `enter` was never called.
    pub fn restore(&mut self) -> TtyResult<()> {
        if let Some(original) = &self.original {
            termios::tcsetattr(&self.fd, SetArg::TCSAFLUSH, original)
                .map_err(TtyError::SetAttr)?;
            self.active = false;
            debug!("restored original terminal settings");
        }
        Ok(())
    }

    /// Read once from the terminal with whatever settings are installed
    fn read_raw(&self, buf: &mut [u8]) -> TtyResult<usize> {
        unistd::read(self.fd.as_fd().as_raw_fd(), buf).map_err(TtyError::Read)
    }
}

impl<F: AsFd> ByteSource for RawModeController<F> {
    fn read(&mut self, buf: &mut [u8], blocking: bool) -> TtyResult<usize> {
        self.enter(blocking)?;
        let n = self.read_raw(buf)?;
        trace!(n, blocking, "terminal read");
        Ok(n)
    }
}

impl<F: AsFd> Drop for RawModeController<F> {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.restore() {
                warn!("Failed to restore terminal settings: {}", e);
            }
        }
    }
}

/// Derive raw settings from the original ones
fn raw_settings(
    mut raw: Termios,
    mode: RawMode,
    wait_for_input: bool,
    timeout_tenths: u8,
) -> Termios {
    match mode {
        RawMode::ImmediateNoEcho => {
            raw.local_flags.remove(LocalFlags::ECHO | LocalFlags::ICANON);
        },
        RawMode::ImmediateNoEchoIgnoreSignals => {
            termios::cfmakeraw(&mut raw);
        },
    }

    let (vmin, vtime) = if wait_for_input {
        (1, 0)
    } else {
        (0, timeout_tenths)
    };
    raw.control_chars[SpecialCharacterIndices::VMIN as usize] = vmin;
    raw.control_chars[SpecialCharacterIndices::VTIME as usize] = vtime;
    raw
}

/// Get the console size of the terminal behind `fd`
pub fn console_size<F: AsFd>(fd: F) -> TtyResult<ConsoleSize> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ is a valid ioctl for getting window size
    let result = unsafe { libc::ioctl(fd.as_fd().as_raw_fd(), libc::TIOCGWINSZ, &mut winsize) };

    if result < 0 {
        Err(TtyError::TerminalQuery(nix::errno::Errno::last()))
    } else {
        Ok(ConsoleSize::new(winsize.ws_row, winsize.ws_col))
    }
}
