//! Sidebar listing saved requests, headed by a "+ New Request" row

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};

use crate::messages::AppCommand;
use crate::models::SavedRequest;
use crate::theme::Theme;
use crate::ui::{method_color, panel_block};
use crate::utils::truncate;

const URL_DISPLAY_LEN: usize = 30;

#[derive(Debug, Clone, Default)]
pub struct CollectionsList {
    requests: Vec<SavedRequest>,
    /// Row index; 0 is the "+ New Request" row
    selected: usize,
}

impl CollectionsList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list contents, keeping the selected row when it still exists
    pub fn set_requests(&mut self, requests: Vec<SavedRequest>) {
        self.requests = requests;
        if self.selected >= self.row_count() {
            self.selected = self.row_count() - 1;
        }
    }

    pub fn requests(&self) -> &[SavedRequest] {
        &self.requests
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, row: usize) {
        self.selected = row.min(self.row_count() - 1);
    }

    /// The saved request under the cursor, if it's not the "new" row
    pub fn selected_request(&self) -> Option<&SavedRequest> {
        self.selected
            .checked_sub(1)
            .and_then(|i| self.requests.get(i))
    }

    fn row_count(&self) -> usize {
        self.requests.len() + 1
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + self.row_count() - 1) % self.row_count();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % self.row_count();
                None
            }
            KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::End => {
                self.selected = self.row_count() - 1;
                None
            }
            KeyCode::Enter => match self.selected_request() {
                Some(saved) => Some(AppCommand::SelectRequest(saved.to_request())),
                None => Some(AppCommand::NewRequest),
            },
            KeyCode::Char('n') => Some(AppCommand::NewRequest),
            KeyCode::Char('d') | KeyCode::Char('D') => self
                .selected_request()
                .map(|saved| AppCommand::DeleteRequest(saved.id)),
            _ => None,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let mut items = vec![ListItem::new(vec![
            Line::from(Span::styled("+ New Request", Style::default().fg(theme.success).bold())),
            Line::from(Span::styled("  Create a new request", Style::default().fg(theme.muted))),
        ])];

        items.extend(self.requests.iter().map(|req| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        req.method.clone(),
                        Style::default().fg(method_color(&req.method)).bold(),
                    ),
                    Span::raw(" "),
                    Span::styled(req.name.clone(), Style::default().fg(theme.foreground)),
                ]),
                Line::from(Span::styled(
                    format!("  {}", truncate(&req.url, URL_DISPLAY_LEN)),
                    Style::default().fg(theme.muted),
                )),
            ])
        }));

        let list = List::new(items)
            .block(panel_block(" Collections ", focused, theme))
            .highlight_style(theme.selected());

        let mut state = ListState::default();
        state.select(Some(self.selected));
        f.render_stateful_widget(list, chunks[0], &mut state);

        let help = Paragraph::new("n: new | d: delete")
            .style(Style::default().fg(theme.muted))
            .alignment(Alignment::Center);
        f.render_widget(help, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn saved(id: i64, name: &str) -> SavedRequest {
        SavedRequest {
            id,
            name: name.to_string(),
            url: format!("https://api.example.com/{name}"),
            method: "GET".to_string(),
            headers: "{}".to_string(),
            collection_id: 1,
            ..Default::default()
        }
    }

    fn press(list: &mut CollectionsList, code: KeyCode) -> Option<AppCommand> {
        list.handle_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn enter_on_first_row_starts_new_request() {
        let mut list = CollectionsList::new();
        list.set_requests(vec![saved(1, "a")]);
        assert_eq!(press(&mut list, KeyCode::Enter), Some(AppCommand::NewRequest));
    }

    #[test]
    fn enter_selects_saved_request() {
        let mut list = CollectionsList::new();
        list.set_requests(vec![saved(7, "users"), saved(9, "orders")]);
        press(&mut list, KeyCode::Down);
        press(&mut list, KeyCode::Char('j'));

        match press(&mut list, KeyCode::Enter) {
            Some(AppCommand::SelectRequest(request)) => {
                assert_eq!(request.id, 9);
                assert_eq!(request.name, "orders");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn delete_never_targets_new_row() {
        let mut list = CollectionsList::new();
        list.set_requests(vec![saved(3, "a")]);
        assert_eq!(press(&mut list, KeyCode::Char('d')), None);
        press(&mut list, KeyCode::Down);
        assert_eq!(press(&mut list, KeyCode::Char('D')), Some(AppCommand::DeleteRequest(3)));
    }

    #[test]
    fn navigation_wraps() {
        let mut list = CollectionsList::new();
        list.set_requests(vec![saved(1, "a"), saved(2, "b")]);
        press(&mut list, KeyCode::Up);
        assert_eq!(list.selected(), 2);
        press(&mut list, KeyCode::Down);
        assert_eq!(list.selected(), 0);
    }

    #[test]
    fn reload_keeps_selection_in_range() {
        let mut list = CollectionsList::new();
        list.set_requests(vec![saved(1, "a"), saved(2, "b"), saved(3, "c")]);
        list.select(2);
        list.set_requests(vec![saved(1, "a"), saved(2, "b"), saved(4, "d")]);
        assert_eq!(list.selected(), 2);

        list.set_requests(vec![saved(1, "a")]);
        assert_eq!(list.selected(), 1);
    }
}
