//! Wrap-around cursor behaviour shared by menu screens

/// A list with a single highlighted row
pub trait Selectable {
    /// Total number of rows
    fn count(&self) -> usize;
    /// Index of the highlighted row
    fn cursor(&self) -> usize;
    /// Move the highlight without any bounds handling
    fn set_cursor(&mut self, index: usize);

    /// Move down one row, wrapping from the last row to the first
    fn next(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        let i = self.cursor();
        self.set_cursor(if i + 1 < count { i + 1 } else { 0 });
    }

    /// Move up one row, wrapping from the first row to the last
    fn prev(&mut self) {
        let count = self.count();
        if count == 0 {
            return;
        }
        let i = self.cursor();
        let prev = if i == 0 || i >= count {
            count.saturating_sub(1)
        } else {
            i - 1
        };
        self.set_cursor(prev);
    }

    /// Highlight the last row
    fn last(&mut self) {
        let count = self.count();
        if count > 0 {
            self.set_cursor(count - 1);
        }
    }

    /// Highlight a 1-based row number as typed on the keyboard.
    ///
    /// Only `1..=min(9, count)` is accepted; anything else leaves the
    /// cursor where it was and returns `false`.
    fn jump(&mut self, digit: usize) -> bool {
        let max = self.count().min(9);
        if digit == 0 || digit > max {
            return false;
        }
        self.set_cursor(digit - 1);
        true
    }
}
