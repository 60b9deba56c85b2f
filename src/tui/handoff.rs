//! Terminal handoff protocol
//!
//! Any option that gives the screen away brackets its action with
//! [`Handoff::acquire`] and [`Handoff::release`]:
//!
//! 1. acquire: capture the display mode, clear the physical terminal,
//!    clear the menu's own surface;
//! 2. the external program owns the terminal until it exits;
//! 3. release: clear the menu's surface, restore the captured mode, then
//!    show and hide the cursor.
//!
//! Restoring the mode alone can leave the cursor visibility flag out of
//! sync on some terminals; the show/hide pair resets it and must stay in
//! that order.

use crate::tui::terminal::{MenuTerminal, TerminalMode};
use std::io;
use tracing::trace;

/// Saved terminal state for one option
#[derive(Debug, Default, Clone, Copy)]
pub struct Handoff {
    saved: Option<TerminalMode>,
}

impl Handoff {
    /// Capture the mode and clear everything for an external program
    pub fn acquire(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<()> {
        trace!("Acquiring terminal");
        self.saved = Some(terminal.save_mode()?);
        terminal.clear_physical()?;
        terminal.clear_surface()
    }

    /// Capture the mode and clear only the menu's surface, for handing the
    /// screen to another menu
    pub fn suspend(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<()> {
        trace!("Suspending menu surface");
        self.saved = Some(terminal.save_mode()?);
        terminal.clear_surface()
    }

    /// Give the terminal back to the menu
    pub fn release(&mut self, terminal: &mut dyn MenuTerminal) -> io::Result<()> {
        trace!("Releasing terminal");
        terminal.clear_surface()?;
        if let Some(mode) = self.saved {
            terminal.restore_mode(mode)?;
        }
        terminal.show_cursor()?;
        terminal.hide_cursor()
    }

    /// Mode captured by the last acquire or suspend
    pub fn saved(&self) -> Option<TerminalMode> {
        self.saved
    }
}
