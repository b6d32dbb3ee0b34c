//! Colour themes selectable from the config file

use ratatui::style::{Color, Modifier, Style};

/// Colour scheme for the whole screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub title: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub muted: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Theme {
            name: "default",
            background: Color::Reset,
            foreground: Color::White,
            border: Color::Cyan,
            title: Color::Rgb(0, 255, 255),
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            selected_bg: Color::Cyan,
            selected_fg: Color::Black,
            muted: Color::DarkGray,
        }
    }

    pub fn dracula() -> Self {
        Theme {
            name: "dracula",
            background: Color::Rgb(40, 42, 54),
            foreground: Color::Rgb(248, 248, 242),
            border: Color::Rgb(189, 147, 249),
            title: Color::Rgb(139, 233, 253),
            accent: Color::Rgb(189, 147, 249),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(255, 184, 108),
            error: Color::Rgb(255, 85, 85),
            selected_bg: Color::Rgb(68, 71, 90),
            selected_fg: Color::Rgb(248, 248, 242),
            muted: Color::Rgb(98, 114, 164),
        }
    }

    /// Look a theme up by config name; unknown names get the default
    pub fn by_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            _ => Self::default_theme(),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    /// Border style for a panel, highlighted when it has focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.warning)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
