use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which entry field a prompt is editing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptField {
    RepCode,
    CustomProduct,
    AccProfit,
}

impl PromptField {
    pub fn title(&self) -> &'static str {
        match self {
            PromptField::RepCode => " Enter Rep Code ",
            PromptField::CustomProduct => " Custom Product Name ",
            PromptField::AccProfit => " ACC Profit ($) ",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    /// Key handled, text unchanged.
    Continue,
    /// Text was edited.
    Changed,
    Submit,
    Cancel,
}

/// Single-line text field with readline-style editing keys.
pub struct LineInput {
    chars: Vec<char>,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    pub fn render_parts(&self) -> (String, Option<char>, String) {
        let before = self.chars[..self.cursor].iter().collect();
        match self.chars.get(self.cursor) {
            Some(&ch) => (before, Some(ch), self.chars[self.cursor + 1..].iter().collect()),
            None => (before, None, String::new()),
        }
    }

    /// Insert pasted text at the cursor; newlines are dropped.
    pub fn insert_str(&mut self, text: &str) -> InputResult {
        let before = self.chars.len();
        for ch in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.chars.insert(self.cursor, ch);
            self.cursor += 1;
        }
        if self.chars.len() == before {
            InputResult::Continue
        } else {
            InputResult::Changed
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => InputResult::Cancel,
            KeyCode::Enter => InputResult::Submit,
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputResult::Continue
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.chars.len());
                InputResult::Continue
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputResult::Continue
            }
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                InputResult::Continue
            }
            KeyCode::End => {
                self.cursor = self.chars.len();
                InputResult::Continue
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.chars.len();
                InputResult::Continue
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputResult::Continue;
                }
                self.cursor -= 1;
                self.chars.remove(self.cursor);
                InputResult::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.chars.len() {
                    return InputResult::Continue;
                }
                self.chars.remove(self.cursor);
                InputResult::Changed
            }
            KeyCode::Char('u') if ctrl => {
                if self.chars.is_empty() {
                    return InputResult::Continue;
                }
                self.chars.clear();
                self.cursor = 0;
                InputResult::Changed
            }
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl => {
                self.chars.insert(self.cursor, ch);
                self.cursor += 1;
                InputResult::Changed
            }
            _ => InputResult::Continue,
        }
    }

    /// unix-word-rubout: skip whitespace, then non-whitespace.
    fn delete_word_back(&mut self) -> InputResult {
        let mut pos = self.cursor;
        while pos > 0 && self.chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !self.chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        if pos == self.cursor {
            return InputResult::Continue;
        }
        self.chars.drain(pos..self.cursor);
        self.cursor = pos;
        InputResult::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn insert_at_start_and_end() {
        let mut input = LineInput::new("ac");
        assert_eq!(input.handle(key(KeyCode::Char('d'))), InputResult::Changed);
        assert_eq!(input.value(), "acd");

        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Char('z')));
        assert_eq!(input.value(), "zacd");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn backspace_on_empty_is_unchanged() {
        let mut input = LineInput::new("a");
        assert_eq!(input.handle(key(KeyCode::Backspace)), InputResult::Changed);
        assert_eq!(input.handle(key(KeyCode::Backspace)), InputResult::Continue);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn delete_at_end_is_unchanged() {
        let mut input = LineInput::new("ab");
        assert_eq!(input.handle(key(KeyCode::Delete)), InputResult::Continue);
        input.handle(key(KeyCode::Home));
        assert_eq!(input.handle(key(KeyCode::Delete)), InputResult::Changed);
        assert_eq!(input.value(), "b");
    }

    #[test]
    fn ctrl_w_word_delete() {
        let mut input = LineInput::new("GIFT CARD  ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "GIFT ");

        let mut empty = LineInput::new("");
        assert_eq!(empty.handle(ctrl('w')), InputResult::Continue);
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = LineInput::new("hello world");
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = LineInput::new("a");
        input.handle(key(KeyCode::Right));
        assert_eq!(input.cursor(), 1);
        input.handle(ctrl('a'));
        input.handle(key(KeyCode::Left));
        assert_eq!(input.cursor(), 0);
        input.handle(ctrl('e'));
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = LineInput::new("50");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.value(), "50");
    }

    #[test]
    fn paste_strips_newlines() {
        let mut input = LineInput::new("");
        assert_eq!(input.insert_str("12\n.50"), InputResult::Changed);
        assert_eq!(input.value(), "12.50");
        assert_eq!(input.insert_str("\n"), InputResult::Continue);
    }

    #[test]
    fn render_parts_split_at_cursor() {
        let mut input = LineInput::new("abc");
        assert_eq!(input.render_parts(), ("abc".to_string(), None, String::new()));
        input.handle(key(KeyCode::Left));
        assert_eq!(
            input.render_parts(),
            ("ab".to_string(), Some('c'), String::new())
        );
    }
}
