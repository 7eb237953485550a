//! Dispatch loop
//!
//! Pulls key presses from the decoder and hands them to the printer until the
//! quit character arrives or input ends.

use std::io::Write;

use tracing::info;

use super::EventPrinter;
use crate::input::{Decoder, InputEvent};
use crate::tty::{ByteSource, TtyError};

/// Error ending the dispatch loop
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Input error: {0}")]
    Input(#[from] TtyError),
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Run until `quit_byte` is typed as a plain character or input ends
///
/// The quit character itself is not printed. Returns the number of events
/// printed.
pub fn dispatch<S, W>(
    decoder: &mut Decoder<S>,
    printer: &mut EventPrinter<W>,
    quit_byte: u8,
) -> Result<usize, DispatchError>
where
    S: ByteSource,
    W: Write,
{
    let mut dispatched = 0;
    loop {
        let decoded = match decoder.next_decoded() {
            Ok(decoded) => decoded,
            Err(TtyError::EndOfInput) => {
                info!(dispatched, "input closed");
                return Ok(dispatched);
            },
            Err(e) => return Err(e.into()),
        };

        if decoded.event == InputEvent::Character(quit_byte) {
            info!(dispatched, "quit key pressed");
            return Ok(dispatched);
        }

        printer.print(&decoded)?;
        dispatched += 1;
    }
}
