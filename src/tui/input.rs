//! Key dispatch against the active menu

use crate::tui::event::MenuInput;
use crate::tui::state::{MenuNode, Selectable};

/// What the run loop must do after an input was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Cursor moved, draw again
    Redraw,
    /// Select the highlighted row
    Select,
    /// Rebuild the drawing surface at a new size
    Reinitialize { width: u16, height: u16 },
    /// Nothing to do
    Ignore,
}

/// Apply one input to `node` and report the follow-up
pub fn dispatch(node: &mut MenuNode, input: MenuInput) -> Command {
    match input {
        MenuInput::Digit(digit) => {
            if node.jump_to_index(digit as usize) {
                Command::Redraw
            } else {
                Command::Ignore
            }
        }
        MenuInput::Resize(width, height) => Command::Reinitialize { width, height },
        _ if node.is_empty() => Command::Ignore,
        MenuInput::Down => {
            node.go_down();
            Command::Redraw
        }
        MenuInput::Up => {
            node.go_up();
            Command::Redraw
        }
        MenuInput::Right | MenuInput::Enter => Command::Select,
        MenuInput::Left => {
            node.last();
            Command::Select
        }
        MenuInput::Other => Command::Ignore,
    }
}
