//! Editable text field with a byte-offset cursor kept on char boundaries

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{prelude::*, widgets::*};

use crate::theme::Theme;

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Byte offset into `value`
    cursor: usize,
    multiline: bool,
    placeholder: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter inserts a newline and Up/Down move between lines
    pub fn multiline() -> Self {
        TextInput {
            multiline: true,
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text; the cursor goes to the end
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns true when the key was consumed
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let chorded = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Char(c) if !chorded => self.insert(c),
            KeyCode::Enter if self.multiline => self.insert('\n'),
            KeyCode::Backspace => self.delete_before(),
            KeyCode::Delete => self.delete_at(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = self.line_start(),
            KeyCode::End => self.cursor = self.line_end(),
            KeyCode::Up if self.multiline => self.move_up(),
            KeyCode::Down if self.multiline => self.move_down(),
            _ => return false,
        }
        true
    }

    fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn delete_before(&mut self) {
        if let Some((prev, _)) = self.value[..self.cursor].char_indices().last() {
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    fn delete_at(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    fn move_left(&mut self) {
        self.cursor = self.value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }

    fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn line_start(&self) -> usize {
        self.value[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self) -> usize {
        self.value[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.value.len())
    }

    /// Byte offset of the `column`th char of the line spanning `start..end`,
    /// clamped to the line end
    fn offset_in_line(&self, start: usize, end: usize, column: usize) -> usize {
        self.value[start..end]
            .char_indices()
            .nth(column)
            .map(|(i, _)| start + i)
            .unwrap_or(end)
    }

    fn move_up(&mut self) {
        let start = self.line_start();
        if start == 0 {
            return;
        }
        let column = self.value[start..self.cursor].chars().count();
        let prev_end = start - 1;
        let prev_start = self.value[..prev_end].rfind('\n').map(|i| i + 1).unwrap_or(0);
        self.cursor = self.offset_in_line(prev_start, prev_end, column);
    }

    fn move_down(&mut self) {
        let end = self.line_end();
        if end == self.value.len() {
            return;
        }
        let column = self.value[self.line_start()..self.cursor].chars().count();
        let next_start = end + 1;
        let next_end = self.value[next_start..]
            .find('\n')
            .map(|i| next_start + i)
            .unwrap_or(self.value.len());
        self.cursor = self.offset_in_line(next_start, next_end, column);
    }

    /// Cursor as (column, row) in chars
    pub fn cursor_position(&self) -> (usize, usize) {
        let before = &self.value[..self.cursor];
        let row = before.matches('\n').count();
        let column = before[self.line_start()..].chars().count();
        (column, row)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, block: Block, focused: bool, theme: &Theme) {
        let inner = block.inner(area);
        let (column, row) = self.cursor_position();
        let scroll_y = row.saturating_sub(usize::from(inner.height.saturating_sub(1)));
        let scroll_x = if self.multiline {
            0
        } else {
            column.saturating_sub(usize::from(inner.width.saturating_sub(1)))
        };

        let paragraph = if self.value.is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(Style::default().fg(theme.muted))
        } else {
            // Offsets past u16::MAX just show the tail of what ratatui can reach
            Paragraph::new(self.value.as_str())
                .style(Style::default().fg(theme.foreground))
                .scroll((
                    u16::try_from(scroll_y).unwrap_or(u16::MAX),
                    u16::try_from(scroll_x).unwrap_or(u16::MAX),
                ))
        };
        f.render_widget(paragraph.block(block), area);

        if focused && inner.width > 0 && inner.height > 0 {
            // Both offsets are below the inner size once clamped
            let dx = (column - scroll_x).min(usize::from(inner.width - 1)) as u16;
            let dy = (row - scroll_y).min(usize::from(inner.height - 1)) as u16;
            f.set_cursor_position(Position::new(inner.x.saturating_add(dx), inner.y.saturating_add(dy)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn press(input: &mut TextInput, code: KeyCode) -> bool {
        input.handle_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            press(input, KeyCode::Char(c));
        }
    }

    #[test]
    fn edits_around_multibyte_chars() {
        let mut input = TextInput::new();
        type_str(&mut input, "héllo");
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "hllo");
        press(&mut input, KeyCode::Char('ü'));
        assert_eq!(input.value(), "hüllo");
        press(&mut input, KeyCode::Delete);
        assert_eq!(input.value(), "hülo");
    }

    #[test]
    fn single_line_ignores_enter() {
        let mut input = TextInput::new();
        type_str(&mut input, "abc");
        assert!(!press(&mut input, KeyCode::Enter));
        assert!(!press(&mut input, KeyCode::Up));
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut input = TextInput::new();
        assert!(!input.handle_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(input.handle_key(&KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)));
        assert_eq!(input.value(), "S");
    }

    #[test]
    fn multiline_moves_between_lines() {
        let mut input = TextInput::multiline();
        type_str(&mut input, "Accept: */*");
        press(&mut input, KeyCode::Enter);
        type_str(&mut input, "X: 1");
        assert_eq!(input.cursor_position(), (4, 1));

        press(&mut input, KeyCode::Up);
        assert_eq!(input.cursor_position(), (4, 0));
        press(&mut input, KeyCode::End);
        press(&mut input, KeyCode::Down);
        assert_eq!(input.cursor_position(), (4, 1));
        press(&mut input, KeyCode::Home);
        type_str(&mut input, "Y-");
        assert_eq!(input.value(), "Accept: */*\nY-X: 1");
    }

    #[test]
    fn set_value_moves_cursor_to_end() {
        let mut input = TextInput::multiline();
        input.set_value("a\nbc");
        assert_eq!(input.cursor_position(), (2, 1));
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor_position(), (0, 0));
    }

    fn render_to(input: &TextInput, area: Rect) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|f| input.render(f, area, Block::default().borders(Borders::ALL), true, &Theme::default()))
            .unwrap();
        terminal
    }

    #[test]
    fn very_long_line_keeps_cursor_in_the_field() {
        let mut input = TextInput::new();
        input.set_value("a".repeat(70_000));
        assert_eq!(input.cursor_position(), (70_000, 0));

        let mut terminal = render_to(&input, Rect::new(20, 1, 40, 3));
        // Inner area spans x 21 to 58 on row 2
        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(58, 2));
    }

    #[test]
    fn short_line_cursor_follows_text() {
        let mut input = TextInput::new();
        input.set_value("abc");

        let mut terminal = render_to(&input, Rect::new(20, 1, 40, 3));
        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(24, 2));
        assert_eq!(terminal.backend().buffer()[(21, 2)].symbol(), "a");
    }
}
