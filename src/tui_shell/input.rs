/// Single-line text buffer with a cursor. `cursor` is a byte offset on a char boundary.
#[derive(Debug, Default, Clone)]
pub(super) struct Input {
    pub(super) buf: String,
    pub(super) cursor: usize,
}

impl Input {
    pub(super) fn with_value(s: &str) -> Self {
        Self {
            buf: s.to_string(),
            cursor: s.len(),
        }
    }

    pub(super) fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
    }

    pub(super) fn insert_char(&mut self, c: char) {
        self.buf.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub(super) fn backspace(&mut self) {
        let Some(c) = self.buf[..self.cursor].chars().next_back() else {
            return;
        };
        self.cursor -= c.len_utf8();
        self.buf.remove(self.cursor);
    }

    pub(super) fn delete(&mut self) {
        if self.cursor >= self.buf.len() {
            return;
        }
        self.buf.remove(self.cursor);
    }

    pub(super) fn move_left(&mut self) {
        if let Some(c) = self.buf[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub(super) fn move_right(&mut self) {
        if let Some(c) = self.buf[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Cursor column in chars, for terminal positioning.
    pub(super) fn cursor_col(&self) -> u16 {
        self.buf[..self.cursor].chars().count() as u16
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/input_tests.rs"]
mod tests;
