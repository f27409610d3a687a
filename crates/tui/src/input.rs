use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::theme::Theme;

const MAX_INPUT_LEN: usize = 64;

/// Single-line text field with a character cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    label: &'static str,
    chars: Vec<char>,
    cursor: usize,
    masked: bool,
}

impl TextInput {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    /// Field whose contents are drawn as `*`.
    pub fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, self.chars.len() as isize) as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn insert(&mut self, ch: char) {
        if self.chars.len() >= MAX_INPUT_LEN || ch.is_control() {
            return;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    /// Apply an editing key. Returns `false` when the key is not an edit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(ch)
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }

    fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.chars.len())
        } else {
            self.value()
        }
    }

    /// `label: value` line, highlighted when focused.
    pub fn line(&self, focused: bool, theme: &Theme) -> Line<'static> {
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        Line::from(vec![
            Span::styled(format!("{marker}{}: ", self.label), label_style),
            Span::styled(self.display(), Style::default().fg(theme.primary_fg)),
        ])
    }

    /// Place the terminal cursor inside the field drawn by [`line`](Self::line)
    /// on row `row` of `area`.
    pub fn place_cursor(&self, frame: &mut Frame, area: Rect, row: u16) {
        let before: String = if self.masked {
            "*".repeat(self.cursor)
        } else {
            self.chars[..self.cursor].iter().collect()
        };
        let prefix = Span::raw(format!("▶ {}: {before}", self.label)).width() as u16;
        let x = area.x.saturating_add(prefix).min(area.right().saturating_sub(1));
        let y = area.y.saturating_add(row).min(area.bottom().saturating_sub(1));
        frame.set_cursor(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = TextInput::new("아이디");
        for ch in "gamr".chars() {
            input.insert(ch);
        }
        input.move_cursor(-1);
        input.insert('e');
        assert_eq!(input.value(), "gamer");

        input.move_home();
        input.delete();
        assert_eq!(input.value(), "amer");
        input.move_end();
        input.backspace();
        assert_eq!(input.value(), "ame");
        input.move_cursor(-10);
        input.backspace();
        assert_eq!(input.value(), "ame");
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut input = TextInput::new("닉네임");
        for ch in "김철수".chars() {
            input.insert(ch);
        }
        input.move_cursor(-1);
        input.backspace();
        assert_eq!(input.value(), "김수");
    }

    #[test]
    fn masked_fields_hide_contents() {
        let mut input = TextInput::masked("비밀번호");
        for ch in "hunter2".chars() {
            input.insert(ch);
        }
        let rendered: String = input
            .line(false, &Theme::default())
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("*******"));
        assert_eq!(input.value(), "hunter2");
    }

    #[test]
    fn ignores_control_characters_and_caps_length() {
        let mut input = TextInput::new("x");
        input.insert('\n');
        assert!(input.is_empty());
        for _ in 0..(MAX_INPUT_LEN + 5) {
            input.insert('a');
        }
        assert_eq!(input.value().len(), MAX_INPUT_LEN);
    }
}
