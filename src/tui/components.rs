//! Common drawing helpers

use ratatui::{buffer::Buffer, style::Style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate by display width, never splitting a character
pub fn truncate_value(value: &str, max_width: usize) -> String {
    if value.width() <= max_width {
        return value.to_string();
    }

    let target_width = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut output = String::new();

    for ch in value.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        output.push(ch);
        current_width += ch_width;
    }

    if max_width >= 3 {
        output.push_str("...");
    }
    output
}

/// Write `text` at `(x, y)`, clipped so it never touches the right border.
/// Positions outside the buffer are skipped.
pub fn put_text(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style) {
    let area = buf.area;
    if y >= area.height || x >= area.width.saturating_sub(1) {
        return;
    }
    let room = (area.width - 1 - x) as usize;
    let clipped = truncate_value(text, room);
    buf.set_string(x, y, clipped, style);
}
