/// Single-line edit buffer used by prompt dialogs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    pub buffer: Vec<char>,
    pub cursor: usize,
}

impl InputState {
    pub fn current(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn masked_clone(&self, mask: char) -> Self {
        Self {
            buffer: self.buffer.iter().map(|_| mask).collect(),
            cursor: self.cursor.min(self.buffer.len()),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, value: &str) {
        for ch in value.chars().filter(|ch| !ch.is_control()) {
            self.insert_char(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.buffer.len() {
            return;
        }
        self.buffer.remove(self.cursor);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn kill_to_end(&mut self) {
        self.buffer.truncate(self.cursor);
    }

    pub fn delete_word_back(&mut self) {
        while self.cursor > 0 && self.buffer[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
        while self.cursor > 0 && !self.buffer[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InputState;

    #[test]
    fn insert_and_backspace_follow_cursor() {
        let mut input = InputState::default();
        input.insert_str("thesis");
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.current(), "theis");
        assert_eq!(input.cursor, 3);
        input.delete();
        assert_eq!(input.current(), "thes");
    }

    #[test]
    fn delete_word_back_removes_trailing_word_and_spaces() {
        let mut input = InputState::default();
        input.insert_str("graph neural  ");
        input.delete_word_back();
        assert_eq!(input.current(), "graph ");
    }

    #[test]
    fn kill_to_end_truncates_at_cursor() {
        let mut input = InputState::default();
        input.insert_str("draft-v2");
        input.move_home();
        input.move_right();
        input.kill_to_end();
        assert_eq!(input.current(), "d");
    }

    #[test]
    fn masked_clone_preserves_cursor() {
        let mut input = InputState::default();
        input.insert_str("hunter2");
        input.cursor = 4;

        let masked = input.masked_clone('*');

        assert_eq!(masked.current(), "*******");
        assert_eq!(masked.cursor, 4);
    }

    #[test]
    fn insert_str_drops_control_characters() {
        let mut input = InputState::default();
        input.insert_str("a\nb\tc");
        assert_eq!(input.current(), "abc");
        assert_eq!(input.cursor, 3);
    }
}
