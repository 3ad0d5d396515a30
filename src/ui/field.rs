use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ui::style::AlertStyle;

/// Outcome of feeding a key to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    /// The field edited its contents (or swallowed the key).
    Edited,
    /// The key is not an editing key; the owner should interpret it.
    Ignored,
}

/// Single-line text editing engine embedded in the input alert.
pub struct InputField {
    value: String,
    cursor: usize,
    placeholder: Option<String>,
    masked: bool,
    focused: bool,
}

impl Default for InputField {
    fn default() -> Self {
        Self::new()
    }
}

impl InputField {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: None,
            masked: false,
            focused: false,
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub const fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub const fn focus(&mut self) {
        self.focused = true;
    }

    pub const fn unfocus(&mut self) {
        self.focused = false;
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    const fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    const fn move_cursor_start(&mut self) {
        self.cursor = 0;
    }

    fn move_cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn delete_word_before_cursor(&mut self) {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] == ' ' {
            pos -= 1;
        }
        while pos > 0 && chars[pos - 1] != ' ' {
            pos -= 1;
        }
        let start = self.byte_offset(pos);
        let end = self.byte_offset(self.cursor);
        self.value.drain(start..end);
        self.cursor = pos;
    }

    fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Feed an editing key. Enter/Esc are reported as `Ignored` so the
    /// owning alert can treat them as submit/cancel.
    pub fn handle_key(&mut self, key: KeyEvent) -> FieldKey {
        match (key.code, key.modifiers) {
            (KeyCode::Backspace, KeyModifiers::ALT) => self.delete_word_before_cursor(),
            (KeyCode::Backspace, _) => self.delete_char_before_cursor(),
            (KeyCode::Delete, _) => self.delete_char_at_cursor(),
            (KeyCode::Left, _) => self.move_cursor_left(),
            (KeyCode::Right, _) => self.move_cursor_right(),
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.move_cursor_start();
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.move_cursor_end();
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.clear_line(),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert_char(c),
            _ => return FieldKey::Ignored,
        }
        FieldKey::Edited
    }

    /// Render the field's single line with a block cursor.
    pub fn render(&self, frame: &mut Frame, area: Rect, style: &AlertStyle) {
        let display_value: String = if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        };

        let chars: Vec<char> = display_value.chars().collect();
        let before: String = chars[..self.cursor.min(chars.len())].iter().collect();
        let cursor_char = chars.get(self.cursor).copied().unwrap_or(' ');
        let after: String = chars
            .get(self.cursor + 1..)
            .unwrap_or_default()
            .iter()
            .collect();

        let text_style = Style::default()
            .fg(style.field_text_color)
            .bg(style.field_background);
        let cursor_style = Style::default()
            .fg(style.field_background)
            .bg(style.field_text_color)
            .add_modifier(Modifier::BOLD);
        let placeholder_style = Style::default()
            .fg(style.hint_color)
            .bg(style.field_background);

        let line = match &self.placeholder {
            Some(placeholder) if self.value.is_empty() => Line::from(vec![
                Span::styled(
                    " ",
                    if self.focused { cursor_style } else { text_style },
                ),
                Span::styled(placeholder.clone(), placeholder_style),
            ]),
            _ => Line::from(vec![
                Span::styled(before, text_style),
                Span::styled(
                    cursor_char.to_string(),
                    if self.focused { cursor_style } else { text_style },
                ),
                Span::styled(after, text_style),
            ]),
        };

        let paragraph =
            Paragraph::new(line).style(Style::default().bg(style.field_background));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut InputField, code: KeyCode) -> FieldKey {
        field.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(field: &mut InputField, s: &str) {
        for c in s.chars() {
            press(field, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut f = InputField::new();
        type_str(&mut f, "abc");
        assert_eq!(f.value(), "abc");
        press(&mut f, KeyCode::Left);
        press(&mut f, KeyCode::Char('X'));
        assert_eq!(f.value(), "abXc");
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut f = InputField::new();
        type_str(&mut f, "abc");
        press(&mut f, KeyCode::Backspace);
        assert_eq!(f.value(), "ab");
    }

    #[test]
    fn delete_removes_at_cursor() {
        let mut f = InputField::new();
        type_str(&mut f, "abc");
        press(&mut f, KeyCode::Home);
        press(&mut f, KeyCode::Delete);
        assert_eq!(f.value(), "bc");
    }

    #[test]
    fn word_delete_stops_at_space() {
        let mut f = InputField::new();
        type_str(&mut f, "one two");
        f.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT));
        assert_eq!(f.value(), "one ");
    }

    #[test]
    fn ctrl_u_clears_the_line() {
        let mut f = InputField::new();
        type_str(&mut f, "whatever");
        f.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(f.value(), "");
    }

    #[test]
    fn enter_and_esc_are_reported_ignored() {
        let mut f = InputField::new();
        assert_eq!(press(&mut f, KeyCode::Enter), FieldKey::Ignored);
        assert_eq!(press(&mut f, KeyCode::Esc), FieldKey::Ignored);
    }

    #[test]
    fn multibyte_input_keeps_cursor_consistent() {
        let mut f = InputField::new();
        type_str(&mut f, "héllo");
        press(&mut f, KeyCode::Backspace);
        press(&mut f, KeyCode::Backspace);
        assert_eq!(f.value(), "hél");
    }
}
