//! Menu rendering
//!
//! A menu is drawn onto an off-screen surface tall enough for every row,
//! then the window of that surface that fits the terminal is copied into
//! the frame. Surface layout:
//!
//! ```text
//! row 0      border
//! row 2      title
//! row 4      subtitle
//! row 5..    one row per option, version stamp on the last one
//! last row   border
//! ```

use crate::tui::components::put_text;
use crate::tui::state::{MenuTree, NodeId, Selectable};
use crate::tui::theme::theme;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Position, Rect},
    widgets::{Block, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Rows of the surface not taken by options
pub const FRAME_ROWS: usize = 6;

/// Surface row of the first option
const FIRST_OPTION_ROW: u16 = 5;

/// Stamp drawn beside the last option
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Height of the full surface for `option_count` rows
pub fn content_height(option_count: usize) -> usize {
    option_count + FRAME_ROWS
}

/// First surface row shown in a terminal `height` rows tall
pub fn scroll_offset(content_height: usize, height: usize, cursor: usize) -> usize {
    if content_height <= height {
        0
    } else if height + cursor < content_height {
        cursor
    } else {
        content_height - height
    }
}

/// Draw the full surface of one menu at the given width
pub fn render_surface(tree: &MenuTree, id: NodeId, width: u16) -> Buffer {
    let node = tree.node(id);
    let height = u16::try_from(content_height(node.len())).unwrap_or(u16::MAX);
    let area = Rect::new(0, 0, width, height);
    let mut surface = Buffer::empty(area);

    Block::bordered()
        .border_style(theme().border())
        .render(area, &mut surface);

    put_text(&mut surface, 2, 2, node.title(), theme().title());
    if let Some(subtitle) = node.subtitle() {
        put_text(&mut surface, 2, 4, subtitle, theme().subtitle());
    }

    for (index, option) in node.options().iter().enumerate() {
        let Ok(row) = u16::try_from(index) else {
            break;
        };
        let style = if index == node.cursor() {
            theme().selected()
        } else {
            theme().normal()
        };
        let label = option.render_label(index, tree);
        put_text(&mut surface, 4, FIRST_OPTION_ROW.saturating_add(row), &label, style);
    }

    if !node.is_empty() {
        let row = FIRST_OPTION_ROW.saturating_add(u16::try_from(node.len() - 1).unwrap_or(u16::MAX));
        let x = (width as usize).saturating_sub(VERSION.width() + 2);
        put_text(&mut surface, x as u16, row, VERSION, theme().stamp());
    }

    surface
}

/// Copy the visible window of `surface` into `buf`
pub fn blit(surface: &Buffer, buf: &mut Buffer, area: Rect, offset: usize) {
    let width = area.width.min(surface.area.width);
    for y in 0..area.height {
        let Ok(source_y) = u16::try_from(offset + y as usize) else {
            break;
        };
        if source_y >= surface.area.height {
            break;
        }
        for x in 0..width {
            let Some(cell) = surface.cell(Position::new(x, source_y)) else {
                continue;
            };
            if let Some(target) = buf.cell_mut(Position::new(area.x + x, area.y + y)) {
                *target = cell.clone();
            }
        }
    }
}

/// Draw the menu `id` into the frame, scrolled so the cursor stays visible
pub fn draw_node(frame: &mut Frame<'_>, tree: &MenuTree, id: NodeId) {
    let area = frame.area();
    let node = tree.node(id);
    let surface = render_surface(tree, id, area.width);
    let offset = scroll_offset(
        content_height(node.len()),
        area.height as usize,
        node.cursor(),
    );
    blit(&surface, frame.buffer_mut(), area, offset);
}
