use ratatui::{prelude::*, widgets::*};

use crate::theme::Theme;

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize, theme: &Theme) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme.muted))
        .highlight_style(Style::default().fg(theme.accent).bold())
        .divider("|")
}

/// Simple JSON syntax highlighting
pub fn highlight_json(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for line in text.lines() {
        let mut spans = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut escaped = false;
        let mut is_key = false;

        for (idx, c) in line.char_indices() {
            if in_string {
                current.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    let color = if is_key { theme.accent } else { theme.success };
                    spans.push(Span::styled(std::mem::take(&mut current), Style::default().fg(color)));
                    in_string = false;
                    is_key = false;
                }
                continue;
            }

            match c {
                '"' => {
                    flush_scalar(&mut spans, &mut current, theme);
                    in_string = true;
                    current.push(c);
                    // A key is a string followed by a colon
                    is_key = closing_quote(line, idx)
                        .map(|end| line[end + 1..].trim_start().starts_with(':'))
                        .unwrap_or(false);
                }
                ':' | ',' => {
                    flush_scalar(&mut spans, &mut current, theme);
                    spans.push(Span::styled(c.to_string(), Style::default().fg(theme.foreground)));
                }
                '{' | '}' | '[' | ']' => {
                    flush_scalar(&mut spans, &mut current, theme);
                    spans.push(Span::styled(c.to_string(), Style::default().fg(theme.warning)));
                }
                _ => current.push(c),
            }
        }

        if in_string {
            spans.push(Span::raw(current));
        } else {
            flush_scalar(&mut spans, &mut current, theme);
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Index of the quote closing the string that opens at `open`
fn closing_quote(line: &str, open: usize) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in line[open + 1..].char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(open + 1 + i),
            _ => escaped = false,
        }
    }
    None
}

/// Push a pending bare token, coloured when it is a number or literal
fn flush_scalar(spans: &mut Vec<Span<'static>>, current: &mut String, theme: &Theme) {
    if current.is_empty() {
        return;
    }
    let token = std::mem::take(current);
    let trimmed = token.trim();
    let style = if matches!(trimmed, "true" | "false" | "null") {
        Style::default().fg(Color::Magenta)
    } else if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() {
        Style::default().fg(theme.warning)
    } else {
        Style::default().fg(theme.foreground)
    };
    spans.push(Span::styled(token, style));
}

/// Status code color
pub fn status_color(code: u16, theme: &Theme) -> Color {
    match code {
        200..=299 => theme.success,
        300..=399 => theme.warning,
        400..=499 => Color::LightRed,
        500..=599 => theme.error,
        _ => theme.foreground,
    }
}

/// Method color
pub fn method_color(method: &str) -> Color {
    match method {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" => Color::Blue,
        "PATCH" => Color::Cyan,
        "DELETE" => Color::Red,
        "HEAD" => Color::Magenta,
        "OPTIONS" => Color::Gray,
        _ => Color::White,
    }
}

/// Block with the shared border/title look
pub fn panel_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(title)
        .title_style(theme.title_style())
}

pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
