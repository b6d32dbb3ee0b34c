//! Modal asking for a name before a request is saved

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};

use super::TextInput;
use crate::messages::AppCommand;
use crate::theme::Theme;
use crate::ui::{centered_rect, panel_block};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveField {
    #[default]
    Name,
    Save,
    Cancel,
}

impl SaveField {
    fn next(&self) -> SaveField {
        match self {
            SaveField::Name => SaveField::Save,
            SaveField::Save => SaveField::Cancel,
            SaveField::Cancel => SaveField::Name,
        }
    }

    fn prev(&self) -> SaveField {
        match self {
            SaveField::Name => SaveField::Cancel,
            SaveField::Save => SaveField::Name,
            SaveField::Cancel => SaveField::Save,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaveDialog {
    name: TextInput,
    focus: SaveField,
}

impl SaveDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        self.name.value()
    }

    pub fn focus(&self) -> SaveField {
        self.focus
    }

    /// Pre-fill the name field and put focus on it
    pub fn set_name(&mut self, name: &str) {
        self.name.set_value(name);
        self.focus = SaveField::Name;
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.focus = SaveField::Name;
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Esc => Some(AppCommand::CancelSave),
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                None
            }
            KeyCode::Enter => match self.focus {
                SaveField::Name | SaveField::Save => {
                    Some(AppCommand::SaveRequest(self.name.value().to_string()))
                }
                SaveField::Cancel => Some(AppCommand::CancelSave),
            },
            _ => {
                if self.focus == SaveField::Name {
                    self.name.handle_key(key);
                }
                None
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered_rect(50, 8, area);
        f.render_widget(Clear, popup);

        let block = panel_block(" Save Request ", true, theme)
            .title_alignment(Alignment::Center)
            .style(theme.base());
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Name
                Constraint::Length(1),
                Constraint::Length(1), // Buttons
                Constraint::Min(0),
            ])
            .split(inner);

        let name_focused = self.focus == SaveField::Name;
        self.name.render(
            f,
            chunks[0],
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(name_focused))
                .title(" Name "),
            name_focused,
            theme,
        );

        let button = |label: &'static str, field: SaveField| {
            let style = if self.focus == field {
                theme.selected()
            } else {
                Style::default().fg(theme.foreground)
            };
            Span::styled(format!("[ {} ]", label), style)
        };
        let buttons = Line::from(vec![
            button("Save", SaveField::Save),
            Span::raw("   "),
            button("Cancel", SaveField::Cancel),
        ]);
        f.render_widget(Paragraph::new(buttons).alignment(Alignment::Center), chunks[2]);
    }
}
