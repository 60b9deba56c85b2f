//! Theme
//!
//! Styles used when drawing a menu. Colours are left to the terminal so the
//! menu looks at home in whatever palette the operator runs.

use ratatui::style::{Color, Modifier, Style};

/// Menu colours
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Foreground
    pub fg: Color,
    /// Background
    pub bg: Color,
    /// Background of the highlighted row
    pub selected_bg: Color,
    /// Foreground of the highlighted row
    pub selected_fg: Color,
    /// Border
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        THEME
    }
}

impl Theme {
    /// Plain row text
    pub fn normal(&self) -> Style {
        Style::new().fg(self.fg).bg(self.bg)
    }

    /// Title row
    pub fn title(&self) -> Style {
        self.normal().add_modifier(Modifier::UNDERLINED)
    }

    /// Subtitle row
    pub fn subtitle(&self) -> Style {
        self.normal().add_modifier(Modifier::BOLD)
    }

    /// Highlighted row
    pub fn selected(&self) -> Style {
        Style::new().fg(self.selected_fg).bg(self.selected_bg)
    }

    /// Border
    pub fn border(&self) -> Style {
        Style::new().fg(self.border).bg(self.bg)
    }

    /// Version stamp in the bottom-right corner
    pub fn stamp(&self) -> Style {
        self.normal().add_modifier(Modifier::BOLD)
    }
}

/// Shared theme
pub static THEME: Theme = Theme {
    fg: Color::Reset,
    bg: Color::Reset,
    selected_bg: Color::White,
    selected_fg: Color::Black,
    border: Color::Reset,
};

/// Theme used by the renderer
pub fn theme() -> &'static Theme {
    &THEME
}
