//! Application glue module
//!
//! Configuration, the dispatch loop, and diagnostic output.

mod config;
mod dispatch;
mod printer;

pub use config::{default_path, Config, ConfigError};
pub use dispatch::{dispatch, DispatchError};
pub use printer::EventPrinter;
