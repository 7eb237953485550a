//! Keycode: raw terminal keyboard decoding
//!
//! Puts a terminal into raw mode and turns its byte stream into key events,
//! telling a lone Escape press apart from the escape sequences sent by arrow,
//! navigation and function keys.
//!
//! - `input`: virtual keys, the sequence table, and the decoder
//! - `tty`: raw mode control, byte reads, console size
//! - `app`: configuration, dispatch loop, diagnostic output

pub mod app;
pub mod input;
pub mod tty;
