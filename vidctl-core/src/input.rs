//! Raw key events and the shortcut table that turns them into [`Command`]s.

use crate::commands::{Command, RateStep, Tenth};
use crate::config::{SEEK_STEP_LONG, SEEK_STEP_SHORT};

/// Key identity, independent of the terminal or windowing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Left,
    Right,
    Other,
}

/// Modifier keys held while the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.meta)
    }
}

/// Where keyboard focus was when the key arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Player,
    /// A text field or text area; shortcuts are suspended
    TextEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
    pub focus: Focus,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            focus: Focus::Player,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.focus = focus;
        self
    }

    /// Parse a key name as used in key scripts: `space`, `left`, `right`,
    /// or a single character.
    pub fn parse(token: &str) -> Option<Self> {
        let key = match token.to_ascii_lowercase().as_str() {
            "space" => Key::Char(' '),
            "left" | "arrowleft" => Key::Left,
            "right" | "arrowright" => Key::Right,
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(Self::new(key))
    }
}

/// Resolve a key event against the shortcut table.
///
/// Rules are tried in order and the first match wins. Letters match
/// case-insensitively. Digits only seek when no modifier is held. Nothing
/// matches while a text field has focus.
pub fn map_key(input: &KeyInput) -> Option<Command> {
    if input.focus == Focus::TextEntry {
        return None;
    }

    if let Key::Char(c) = input.key {
        if let Some(digit) = c.to_digit(10) {
            if !input.modifiers.is_empty() {
                return None;
            }
            // to_digit(10) is always < 10
            return Tenth::new(digit as u8).ok().map(Command::SeekToFraction);
        }
    }

    match input.key {
        Key::Char(c) => match c.to_ascii_lowercase() {
            ' ' | 'k' => Some(Command::TogglePlay),
            'j' => Some(Command::SeekBy(-SEEK_STEP_LONG)),
            'l' => Some(Command::SeekBy(SEEK_STEP_LONG)),
            'f' => Some(Command::ToggleFullscreen),
            't' => Some(Command::ToggleTheater),
            '>' => Some(Command::StepRate(RateStep::Up)),
            '<' => Some(Command::StepRate(RateStep::Down)),
            _ => None,
        },
        Key::Left => Some(Command::SeekBy(-SEEK_STEP_SHORT)),
        Key::Right => Some(Command::SeekBy(SEEK_STEP_SHORT)),
        Key::Other => None,
    }
}

/// Shortcut reference shown in the help panel
pub const SHORTCUTS: &[(&str, &str)] = &[
    ("Space / K", "Play / Pause"),
    ("J", "Rewind 10 seconds"),
    ("L", "Fast forward 10 seconds"),
    ("Left", "Rewind 5 seconds"),
    ("Right", "Fast forward 5 seconds"),
    ("T", "Toggle theater mode"),
    ("F", "Toggle fullscreen"),
    (">", "Next speed"),
    ("<", "Previous speed"),
    ("0-9", "Jump to 0%, 10%, ..., 90%"),
];
