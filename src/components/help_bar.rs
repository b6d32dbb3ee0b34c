use ratatui::{prelude::*, widgets::*};

use crate::config::KeybindingsConfig;
use crate::theme::Theme;

/// One-line shortcut summary shown under the main page
#[derive(Debug, Clone)]
pub struct HelpBar {
    entries: Vec<(String, &'static str)>,
}

impl Default for HelpBar {
    fn default() -> Self {
        Self::from_keybindings(&KeybindingsConfig::default())
    }
}

impl HelpBar {
    pub fn from_keybindings(keys: &KeybindingsConfig) -> Self {
        let entries = [
            (keys.send_request.as_str(), "Send"),
            (keys.save_request.as_str(), "Save"),
            (keys.new_request.as_str(), "New"),
            (keys.focus_url.as_str(), "URL"),
            ("Tab", "Navigate"),
            ("Ctrl+Q", "Quit"),
        ];
        // Unbound actions have an empty label
        HelpBar {
            entries: entries
                .into_iter()
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, action)| (key.to_string(), action))
                .collect(),
        }
    }

    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(|(key, action)| format!("{}: {}", key, action))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let mut spans = Vec::new();
        for (i, (key, action)) in self.entries.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(theme.muted)));
            }
            spans.push(Span::styled(key.clone(), Style::default().fg(theme.warning)));
            spans.push(Span::styled(format!(": {}", action), Style::default().fg(theme.foreground)));
        }
        f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
    }
}
