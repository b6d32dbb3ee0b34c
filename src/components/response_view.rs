//! Status line plus Body/Headers tabs for the last response

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};

use crate::models::Response;
use crate::theme::Theme;
use crate::ui::{highlight_json, panel_block, render_tabs, status_color};
use crate::utils::{format_size, is_valid_json, prettify_body};

const PAGE_SCROLL: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseTab {
    #[default]
    Body,
    Headers,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Status {
    #[default]
    Empty,
    Sending,
    Failed(String),
    Received {
        code: u16,
        status: String,
        duration_ms: u128,
        size: u64,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ResponseView {
    status: Status,
    body: String,
    body_is_json: bool,
    header_lines: Vec<(String, String)>,
    tab: ResponseTab,
    scroll: u16,
}

impl ResponseView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&mut self, response: &Response) {
        self.scroll = 0;

        if let Some(error) = &response.error {
            self.status = Status::Failed(error.clone());
            self.body.clear();
            self.body_is_json = false;
            self.header_lines.clear();
            return;
        }

        self.status = Status::Received {
            code: response.status_code,
            status: response.status.clone(),
            duration_ms: response.duration.as_millis(),
            size: response.size,
        };

        let raw = response.body_string();
        self.body_is_json = is_valid_json(&raw);
        self.body = prettify_body(&raw);

        // BTreeMap iteration is already sorted by name
        self.header_lines = response
            .headers
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.clone(), v.clone())))
            .collect();
    }

    pub fn set_loading(&mut self) {
        self.status = Status::Sending;
    }

    pub fn clear(&mut self) {
        self.status = Status::Empty;
        self.body.clear();
        self.body_is_json = false;
        self.header_lines.clear();
        self.scroll = 0;
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Sending
    }

    pub fn status_line(&self) -> String {
        match &self.status {
            Status::Empty => "No response yet".to_string(),
            Status::Sending => "Sending request...".to_string(),
            Status::Failed(error) => format!("Error: {}", error),
            Status::Received {
                status,
                duration_ms,
                size,
                ..
            } => format!("{} | {}ms | {}", status, duration_ms, format_size(*size)),
        }
    }

    /// Body text as displayed: pretty-printed when it is JSON
    pub fn body_text(&self) -> &str {
        &self.body
    }

    /// Header text as displayed, one `name: value` line per value
    pub fn headers_text(&self) -> String {
        self.header_lines
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn tab(&self) -> ResponseTab {
        self.tab
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            ResponseTab::Body => ResponseTab::Headers,
            ResponseTab::Headers => ResponseTab::Body,
        };
        self.scroll = 0;
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn line_count(&self) -> usize {
        match self.tab {
            ResponseTab::Body => self.body.lines().count(),
            ResponseTab::Headers => self.header_lines.len(),
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.line_count().saturating_sub(1).min(u16::MAX as usize) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max) as u16;
    }

    /// Returns true when the key was consumed
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('t') => self.toggle_tab(),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(PAGE_SCROLL as i32)),
            KeyCode::PageDown => self.scroll_by(PAGE_SCROLL as i32),
            KeyCode::Home => self.scroll = 0,
            _ => return false,
        }
        true
    }

    fn status_span(&self, theme: &Theme) -> Span<'static> {
        let style = match &self.status {
            Status::Empty => Style::default().fg(theme.muted),
            Status::Sending => Style::default().fg(theme.warning),
            Status::Failed(_) => Style::default().fg(theme.error).bold(),
            Status::Received { code, .. } => Style::default().fg(status_color(*code, theme)).bold(),
        };
        Span::styled(self.status_line(), style)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        let header_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(20)])
            .split(chunks[0]);
        f.render_widget(Paragraph::new(Line::from(self.status_span(theme))), header_row[0]);

        let selected = match self.tab {
            ResponseTab::Body => 0,
            ResponseTab::Headers => 1,
        };
        f.render_widget(render_tabs(&["Body", "Headers"], selected, theme), header_row[1]);

        let block = panel_block(" Response ", focused, theme).title_bottom(
            Line::from(Span::styled(" t: toggle tab ", Style::default().fg(theme.muted)))
                .right_aligned(),
        );

        let lines: Vec<Line> = match self.tab {
            ResponseTab::Body if self.body_is_json => highlight_json(&self.body, theme),
            ResponseTab::Body => self
                .body
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.foreground))))
                .collect(),
            ResponseTab::Headers => self
                .header_lines
                .iter()
                .map(|(name, value)| {
                    Line::from(vec![
                        Span::styled(format!("{}:", name), Style::default().fg(theme.accent)),
                        Span::styled(format!(" {}", value), Style::default().fg(theme.foreground)),
                    ])
                })
                .collect(),
        };

        let content = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        f.render_widget(content, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn ok_response() -> Response {
        let mut headers = BTreeMap::new();
        headers.insert("x-test".to_string(), vec!["1".to_string()]);
        headers.insert("content-type".to_string(), vec!["application/json".to_string()]);
        headers.insert("set-cookie".to_string(), vec!["a=1".to_string(), "b=2".to_string()]);
        let body = br#"{"ok":true}"#.to_vec();
        Response {
            status_code: 200,
            status: "200 OK".to_string(),
            headers,
            size: body.len() as u64,
            body,
            duration: Duration::from_millis(42),
            error: None,
        }
    }

    #[test]
    fn starts_empty() {
        let view = ResponseView::new();
        assert_eq!(view.status_line(), "No response yet");
        assert_eq!(view.body_text(), "");
    }

    #[test]
    fn json_body_is_pretty_printed() {
        let mut view = ResponseView::new();
        view.set_response(&ok_response());
        assert_eq!(view.body_text(), "{\n  \"ok\": true\n}");
        assert_eq!(view.status_line(), "200 OK | 42ms | 11 B");
    }

    #[test]
    fn headers_are_sorted_one_line_per_value() {
        let mut view = ResponseView::new();
        view.set_response(&ok_response());
        assert_eq!(
            view.headers_text(),
            "content-type: application/json\nset-cookie: a=1\nset-cookie: b=2\nx-test: 1"
        );
    }

    #[test]
    fn error_clears_body_and_headers() {
        let mut view = ResponseView::new();
        view.set_response(&ok_response());
        view.set_response(&Response::failed("connection refused", Duration::from_millis(1)));
        assert_eq!(view.status_line(), "Error: connection refused");
        assert_eq!(view.body_text(), "");
        assert_eq!(view.headers_text(), "");
    }

    #[test]
    fn loading_then_clear() {
        let mut view = ResponseView::new();
        view.set_loading();
        assert!(view.is_loading());
        assert_eq!(view.status_line(), "Sending request...");
        view.clear();
        assert_eq!(view.status_line(), "No response yet");
    }

    #[test]
    fn toggle_and_scroll() {
        let mut view = ResponseView::new();
        view.set_response(&ok_response());
        let press = |view: &mut ResponseView, code| view.handle_key(&KeyEvent::new(code, KeyModifiers::NONE));

        press(&mut view, KeyCode::Down);
        press(&mut view, KeyCode::Down);
        assert_eq!(view.scroll(), 2);
        press(&mut view, KeyCode::PageDown);
        assert_eq!(view.scroll(), 2);
        press(&mut view, KeyCode::Up);
        assert_eq!(view.scroll(), 1);

        assert!(press(&mut view, KeyCode::Char('t')));
        assert_eq!(view.tab(), ResponseTab::Headers);
        assert_eq!(view.scroll(), 0);
        assert!(!press(&mut view, KeyCode::Char('x')));
    }
}
