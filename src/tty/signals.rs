//! Terminal restoration on fatal signals
//!
//! SIGINT, SIGTERM, SIGHUP and SIGQUIT terminate the process without
//! unwinding, so `Drop` never runs. The handlers installed here write the
//! saved settings back and then let the signal take its default action, so
//! the exit status still reports the signal.

use std::os::fd::RawFd;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::termios::Termios;
use tracing::debug;

use super::{TtyError, TtyResult};

/// Signals whose default action would leave the terminal in raw mode
pub const FATAL_SIGNALS: [Signal; 4] = [
    Signal::SIGHUP,
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTERM,
];

/// Settings to write back from a signal handler
struct Saved {
    fd: RawFd,
    termios: libc::termios,
}

/// The settings of the most recently armed controller, or null
static SAVED: AtomicPtr<Saved> = AtomicPtr::new(ptr::null_mut());

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Keeps a terminal snapshot registered with the signal handlers
///
/// Only one snapshot is registered at a time; arming a second guard replaces
/// the first. Dropping a guard unregisters it if it is still the current one.
pub(super) struct SignalGuard {
    saved: *mut Saved,
}

// The pointer is owned by the guard and only read by the signal handler.
unsafe impl Send for SignalGuard {}

impl SignalGuard {
    pub(super) fn arm(fd: RawFd, original: &Termios) -> TtyResult<Self> {
        install_handlers()?;

        let saved = Box::into_raw(Box::new(Saved {
            fd,
            termios: original.clone().into(),
        }));
        if !SAVED.swap(saved, Ordering::SeqCst).is_null() {
            debug!("replacing terminal settings registered by another controller");
        }
        Ok(Self { saved })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        let _ = SAVED.compare_exchange(
            self.saved,
            ptr::null_mut(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        // SAFETY: allocated by Box::into_raw in arm and freed only here
        drop(unsafe { Box::from_raw(self.saved) });
    }
}

/// Install the restoring handler for every fatal signal, once per process
fn install_handlers() -> TtyResult<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    // SA_RESETHAND puts the default action back before the handler runs
    let action = SigAction::new(
        SigHandler::Handler(restore_and_reraise),
        SaFlags::SA_RESETHAND,
        SigSet::empty(),
    );
    for sig in FATAL_SIGNALS {
        // SAFETY: the handler only calls async-signal-safe functions
        unsafe { signal::sigaction(sig, &action) }.map_err(TtyError::Signal)?;
    }
    debug!(signals = ?FATAL_SIGNALS, "installed terminal restore handlers");
    Ok(())
}

extern "C" fn restore_and_reraise(signum: libc::c_int) {
    let saved = SAVED.load(Ordering::SeqCst);
    // SAFETY: tcsetattr and raise are async-signal-safe. The signal stays
    // blocked until the handler returns, then the default action runs.
    unsafe {
        if let Some(saved) = saved.as_ref() {
            libc::tcsetattr(saved.fd, libc::TCSAFLUSH, &saved.termios);
        }
        libc::raise(signum);
    }
}
