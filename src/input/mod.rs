//! Keyboard Input Decoding
//!
//! Turns the raw byte stream of a terminal in raw mode into input events.
//!
//! # Events
//!
//! Every key press becomes exactly one [`InputEvent`]:
//! - `Character(byte)`: a literal byte, including `q` and control characters
//!   that have no virtual key
//! - `Key(VirtualKey)`: a recognised key such as an arrow or function key
//!
//! # Escape Disambiguation
//!
//! The Escape key and the escape sequences sent by arrow and function keys
//! both start with `ESC` (0x1B). A terminal delivers the remainder of an
//! escape sequence immediately, whereas a lone Escape press is followed by
//! silence. The [`Decoder`] therefore reads the byte after `ESC` with a short
//! timeout and treats a timeout as the Escape key.

mod decoder;
mod sequence;
mod source;
mod table;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use decoder::{Decoded, Decoder};
pub use sequence::KeySequence;
pub use source::ScriptedSource;
pub use table::{SequenceTable, TableError};

/// The escape byte
pub const ESC: u8 = 0x1b;

/// Virtual key codes
///
/// The discriminants are the numeric key codes reported by the diagnostic
/// output. `None` is an internal "no key" marker and never appears in an
/// [`InputEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VirtualKey {
    None = 0,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Navigation
    Home,
    End,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    PageUp,
    PageDown,
    Insert,
    Delete,

    // Editing
    Esc,
    Backspace,
    Enter,
    Tab,

    // System
    PrintScreen,
    PauseBreak,
}

impl VirtualKey {
    /// Numeric key code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human readable key name
    pub fn name(self) -> &'static str {
        match self {
            VirtualKey::None => "None",
            VirtualKey::F1 => "F1",
            VirtualKey::F2 => "F2",
            VirtualKey::F3 => "F3",
            VirtualKey::F4 => "F4",
            VirtualKey::F5 => "F5",
            VirtualKey::F6 => "F6",
            VirtualKey::F7 => "F7",
            VirtualKey::F8 => "F8",
            VirtualKey::F9 => "F9",
            VirtualKey::F10 => "F10",
            VirtualKey::F11 => "F11",
            VirtualKey::F12 => "F12",
            VirtualKey::Home => "Home",
            VirtualKey::End => "End",
            VirtualKey::UpArrow => "Up Arrow",
            VirtualKey::DownArrow => "Down Arrow",
            VirtualKey::LeftArrow => "Left Arrow",
            VirtualKey::RightArrow => "Right Arrow",
            VirtualKey::PageUp => "Page Up",
            VirtualKey::PageDown => "Page Down",
            VirtualKey::Insert => "Insert",
            VirtualKey::Delete => "Delete",
            VirtualKey::Esc => "Esc",
            VirtualKey::Backspace => "Backspace",
            VirtualKey::Enter => "Enter",
            VirtualKey::Tab => "Tab",
            VirtualKey::PrintScreen => "Print Screen",
            VirtualKey::PauseBreak => "Pause/Break",
        }
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// A literal byte
    Character(u8),
    /// A recognised virtual key (never `VirtualKey::None`)
    Key(VirtualKey),
}

impl InputEvent {
    /// The byte of a character event
    pub fn as_character(&self) -> Option<u8> {
        match self {
            InputEvent::Character(c) => Some(*c),
            InputEvent::Key(_) => None,
        }
    }

    /// The key of a virtual key event
    pub fn as_key(&self) -> Option<VirtualKey> {
        match self {
            InputEvent::Key(key) => Some(*key),
            InputEvent::Character(_) => None,
        }
    }
}
