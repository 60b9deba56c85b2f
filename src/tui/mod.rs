//! Ratatui terminal menu engine
//!
//! Menus, their rows, the run loop that moves focus between them and the
//! protocol for lending the terminal to external programs.

pub mod app;
pub mod components;
pub mod event;
pub mod handoff;
pub mod input;
pub mod render;
pub mod state;
pub mod terminal;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;

pub use app::MenuApp;
pub use event::MenuInput;
pub use handoff::Handoff;
pub use input::{Command, dispatch};
pub use state::{
    ActiveStack, ExternalProcess, LAUNCH_FAILED, MenuNode, MenuOption, MenuTree, NodeId,
    NodeState, OptionKind, Populate, ReturnValue, Selectable,
};
pub use terminal::{CrosstermTerminal, MenuTerminal, TerminalMode};
pub use theme::{Theme, theme};
