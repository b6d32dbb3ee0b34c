//! Method selector, URL, headers and body editors, and the Send button

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};

use super::TextInput;
use crate::constants::URL_PLACEHOLDER;
use crate::messages::{AppCommand, FocusTarget};
use crate::models::{HttpMethod, Request};
use crate::theme::Theme;
use crate::ui::{method_color, panel_block};
use crate::utils::{format_headers, parse_headers};

#[derive(Debug, Clone)]
pub struct RequestPanel {
    method: HttpMethod,
    url: TextInput,
    headers: TextInput,
    body: TextInput,
}

impl Default for RequestPanel {
    fn default() -> Self {
        RequestPanel {
            method: HttpMethod::default(),
            url: TextInput::new().with_placeholder(URL_PLACEHOLDER),
            headers: TextInput::multiline()
                .with_placeholder("Content-Type: application/json\nAuthorization: Bearer token"),
            body: TextInput::multiline().with_placeholder(r#"{"key": "value"}"#),
        }
    }
}

impl RequestPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        self.url.value()
    }

    /// Build a request from the current field contents. Only method, URL,
    /// headers and body are filled in; id and name belong to the caller.
    pub fn get_request(&self) -> Request {
        Request {
            method: self.method,
            url: self.url.value().to_string(),
            headers: parse_headers(self.headers.value()),
            body: self.body.value().to_string(),
            ..Request::default()
        }
    }

    pub fn set_request(&mut self, request: &Request) {
        self.method = request.method;
        self.url.set_value(request.url.as_str());
        self.headers.set_value(format_headers(&request.headers));
        self.body.set_value(request.body.as_str());
    }

    pub fn clear(&mut self) {
        self.method = HttpMethod::default();
        self.url.clear();
        self.headers.clear();
        self.body.clear();
    }

    /// Keys for whichever of this panel's fields has focus
    pub fn handle_key(&mut self, focus: FocusTarget, key: &KeyEvent) -> Option<AppCommand> {
        match focus {
            FocusTarget::Url => match key.code {
                KeyCode::Up => {
                    self.method = self.method.prev();
                    None
                }
                KeyCode::Down => {
                    self.method = self.method.next();
                    None
                }
                KeyCode::Enter => Some(AppCommand::SendRequest),
                _ => {
                    self.url.handle_key(key);
                    None
                }
            },
            FocusTarget::Headers => {
                self.headers.handle_key(key);
                None
            }
            FocusTarget::Body => {
                self.body.handle_key(key);
                None
            }
            FocusTarget::SendButton => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => Some(AppCommand::SendRequest),
                _ => None,
            },
            FocusTarget::Collections | FocusTarget::Response => None,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focus: FocusTarget, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Method + URL
                Constraint::Fill(1),   // Headers
                Constraint::Fill(2),   // Body
                Constraint::Length(1), // Send button
            ])
            .split(area);

        let url_focused = focus == FocusTarget::Url;
        let method = self.method.as_str();
        let url_block = panel_block(" Request ", url_focused, theme).title_bottom(
            Line::from(Span::styled(" ↑/↓: method ", Style::default().fg(theme.muted)))
                .right_aligned(),
        );
        let url_inner = url_block.inner(chunks[0]);
        f.render_widget(url_block, chunks[0]);

        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(10), Constraint::Min(1)])
            .split(url_inner);
        let method_label = Paragraph::new(Line::from(vec![
            Span::styled(method, Style::default().fg(method_color(method)).bold()),
            Span::styled(" ▾", Style::default().fg(theme.muted)),
        ]));
        f.render_widget(method_label, row[0]);
        self.url.render(f, row[1], Block::default(), url_focused, theme);

        self.headers.render(
            f,
            chunks[1],
            panel_block(" Headers ", focus == FocusTarget::Headers, theme),
            focus == FocusTarget::Headers,
            theme,
        );
        self.body.render(
            f,
            chunks[2],
            panel_block(" Body ", focus == FocusTarget::Body, theme),
            focus == FocusTarget::Body,
            theme,
        );

        let button_style = if focus == FocusTarget::SendButton {
            theme.selected()
        } else {
            Style::default().fg(theme.foreground).bg(theme.muted)
        };
        let button_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(20),
                Constraint::Fill(1),
            ])
            .split(chunks[3])[1];
        f.render_widget(
            Paragraph::new("Send Request")
                .style(button_style)
                .alignment(Alignment::Center),
            button_area,
        );
    }
}
