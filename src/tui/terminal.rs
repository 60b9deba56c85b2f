//! Terminal setup and control for the menu engine
//!
//! [`MenuTerminal`] is everything the engine asks of a terminal: drawing,
//! blocking input, and the primitive steps the handoff protocol is built
//! from. [`CrosstermTerminal`] is the real implementation.

use crate::tui::event::MenuInput;
use crossterm::{
    cursor::{MoveTo, Show},
    event, execute,
    style::Print,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use ratatui::{DefaultTerminal, Frame, layout::Rect};
use std::io::{self, Write};
use tracing::debug;

/// Display mode captured before an external program takes over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalMode {
    /// Raw (non-canonical) input mode
    pub raw: bool,
    /// Alternate screen buffer in use
    pub alternate_screen: bool,
}

/// Terminal operations used by the run loop and the handoff protocol
pub trait MenuTerminal {
    /// Draw one frame
    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame<'_>)) -> io::Result<()>;

    /// Block until the next input arrives
    fn read_input(&mut self) -> io::Result<MenuInput>;

    /// Rebuild the drawing surface at new dimensions
    fn reinitialize(&mut self, width: u16, height: u16) -> io::Result<()>;

    /// Blank the menu's drawing surface so the next draw repaints it fully
    fn clear_surface(&mut self) -> io::Result<()>;

    /// Capture the current display mode
    fn save_mode(&mut self) -> io::Result<TerminalMode>;

    /// Drop back to a plain, cleared terminal
    fn clear_physical(&mut self) -> io::Result<()>;

    /// Put back a mode captured by [`MenuTerminal::save_mode`]
    fn restore_mode(&mut self, mode: TerminalMode) -> io::Result<()>;

    fn show_cursor(&mut self) -> io::Result<()>;

    fn hide_cursor(&mut self) -> io::Result<()>;

    /// Ask the operator for one line of text on the released terminal
    fn prompt(&mut self, label: &str) -> io::Result<String>;
}

/// Crossterm-backed terminal
#[derive(Debug)]
pub struct CrosstermTerminal {
    terminal: DefaultTerminal,
    alternate_screen: bool,
}

impl CrosstermTerminal {
    /// Enter raw mode and the alternate screen
    pub fn new() -> io::Result<Self> {
        let mut terminal = ratatui::try_init()?;
        terminal.hide_cursor()?;
        Ok(Self {
            terminal,
            alternate_screen: true,
        })
    }

    /// Return the terminal to the state it was in before [`CrosstermTerminal::new`]
    pub fn restore(self) {
        ratatui::restore();
    }
}

impl MenuTerminal for CrosstermTerminal {
    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame))?;
        Ok(())
    }

    fn read_input(&mut self) -> io::Result<MenuInput> {
        Ok(event::read()?.into())
    }

    fn reinitialize(&mut self, width: u16, height: u16) -> io::Result<()> {
        debug!(width, height, "Terminal resized");
        self.terminal.resize(Rect::new(0, 0, width, height))?;
        self.terminal.clear()
    }

    fn clear_surface(&mut self) -> io::Result<()> {
        self.terminal.clear()
    }

    fn save_mode(&mut self) -> io::Result<TerminalMode> {
        Ok(TerminalMode {
            raw: terminal::is_raw_mode_enabled()?,
            alternate_screen: self.alternate_screen,
        })
    }

    fn clear_physical(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            io::stdout(),
            LeaveAlternateScreen,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Show
        )?;
        self.alternate_screen = false;
        Ok(())
    }

    fn restore_mode(&mut self, mode: TerminalMode) -> io::Result<()> {
        if mode.alternate_screen && !self.alternate_screen {
            execute!(io::stdout(), EnterAlternateScreen)?;
        } else if !mode.alternate_screen && self.alternate_screen {
            execute!(io::stdout(), LeaveAlternateScreen)?;
        }
        self.alternate_screen = mode.alternate_screen;

        if mode.raw {
            enable_raw_mode()?;
        } else {
            disable_raw_mode()?;
        }

        // Whatever the external program drew is still on screen
        self.terminal.clear()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.terminal.show_cursor()
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.terminal.hide_cursor()
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        execute!(stdout, Print(label))?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
