//! Keycode viewer
//!
//! Prints the key code of every key pressed until `q` is typed.

use std::io;
use std::process::ExitCode;

use keycode::app::{dispatch, Config, EventPrinter};
use keycode::input::Decoder;
use keycode::tty::{console_size, RawModeController};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Logs go to stderr so they do not mix with the key report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    info!(?config, "starting");

    let mut printer = EventPrinter::new(io::stdout().lock(), config.raw_mode, config.show_sequences);
    if config.show_ruler {
        let size = console_size(io::stdout())?;
        printer.banner(size)?;
    }

    let mut controller =
        RawModeController::stdin(config.raw_mode).with_timeout_tenths(config.escape_timeout_tenths);
    let mut decoder = Decoder::new(&mut controller);

    // On error the controller restores the terminal when dropped
    let count = dispatch(&mut decoder, &mut printer, config.quit_byte)?;
    drop(decoder);

    if let Err(e) = controller.restore() {
        warn!("Failed to restore terminal settings: {}", e);
    }
    info!(count, "done");
    Ok(())
}
