//! Event handling module
//!
//! Maps crossterm terminal events onto the keys a menu understands.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

/// Input understood by a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    /// Number key `1`..=`9`
    Digit(u8),
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Enter key
    Enter,
    /// Window resize
    Resize(u16, u16),
    /// Anything else
    Other,
}

impl From<Event> for MenuInput {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key_event) => key_event.into(),
            Event::Resize(width, height) => MenuInput::Resize(width, height),
            Event::Mouse(_) => MenuInput::Other,
            Event::FocusGained => MenuInput::Other,
            Event::FocusLost => MenuInput::Other,
            Event::Paste(_) => MenuInput::Other,
        }
    }
}

impl From<KeyEvent> for MenuInput {
    fn from(key: KeyEvent) -> Self {
        // Ignore release and repeat events
        if key.kind != KeyEventKind::Press {
            return MenuInput::Other;
        }

        match key.code {
            KeyCode::Enter => MenuInput::Enter,
            KeyCode::Up => MenuInput::Up,
            KeyCode::Down => MenuInput::Down,
            KeyCode::Left => MenuInput::Left,
            KeyCode::Right => MenuInput::Right,
            KeyCode::Char(c @ '1'..='9') => MenuInput::Digit(c as u8 - b'0'),
            _ => MenuInput::Other,
        }
    }
}
