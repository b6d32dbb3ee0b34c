//! Global shortcuts: configured labels like "Ctrl+S" parsed into key bindings

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::KeybindingsConfig;
use crate::messages::AppCommand;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid key binding {0:?}")]
pub struct KeyParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        KeyBinding { code, modifiers }
    }

    /// Shift is folded into the key itself (uppercase chars, BackTab), so it
    /// is ignored for those codes
    fn normalize(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
        let mut modifiers = modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        match code {
            KeyCode::Char(c) => {
                modifiers.remove(KeyModifiers::SHIFT);
                (KeyCode::Char(c.to_ascii_lowercase()), modifiers)
            }
            KeyCode::BackTab => {
                modifiers.remove(KeyModifiers::SHIFT);
                (code, modifiers)
            }
            _ => (code, modifiers),
        }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        Self::normalize(self.code, self.modifiers) == Self::normalize(key.code, key.modifiers)
    }

    /// Both bindings fire on the same key press
    pub fn same_key(&self, other: &KeyBinding) -> bool {
        Self::normalize(self.code, self.modifiers) == Self::normalize(other.code, other.modifiers)
    }
}

impl FromStr for KeyBinding {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || KeyParseError(s.to_string());
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or_else(err)?;

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" | "meta" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return Err(err()),
            }
        }

        let lower = key.to_ascii_lowercase();
        let code = match lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "esc" | "escape" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            f if f.len() > 1 && f.starts_with('f') => {
                let n: u8 = f[1..].parse().map_err(|_| err())?;
                if !(1..=12).contains(&n) {
                    return Err(err());
                }
                KeyCode::F(n)
            }
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                    _ => return Err(err()),
                }
            }
        };

        Ok(KeyBinding { code, modifiers })
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) || self.code == KeyCode::BackTab {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Tab | KeyCode::BackTab => f.write_str("Tab"),
            KeyCode::Esc => f.write_str("Esc"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Shortcuts that can't be reconfigured
fn fixed_bindings() -> Vec<(KeyBinding, AppCommand)> {
    vec![
        (KeyBinding::new(KeyCode::Char('q'), KeyModifiers::CONTROL), AppCommand::Quit),
        // Intercepted before the keymap, listed so nothing else claims it
        (KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL), AppCommand::Quit),
        (KeyBinding::new(KeyCode::F(5), KeyModifiers::NONE), AppCommand::SendRequest),
        (KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE), AppCommand::FocusNext),
        (KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT), AppCommand::FocusPrev),
        (KeyBinding::new(KeyCode::Char('h'), KeyModifiers::CONTROL), AppCommand::FocusCollections),
        (KeyBinding::new(KeyCode::Char('l'), KeyModifiers::CONTROL), AppCommand::FocusResponse),
    ]
}

/// Shortcut table consulted before any widget sees a key
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(KeyBinding, AppCommand)>,
    labels: KeybindingsConfig,
}

impl Keymap {
    /// Build from configured labels. A label that doesn't parse, or that
    /// collides with a fixed shortcut or an earlier configured one, is
    /// replaced by its default with a warning. If the default is taken too
    /// the action is left without a shortcut.
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        let defaults = KeybindingsConfig::default();
        let mut bindings = fixed_bindings();

        let slots = [
            (&config.send_request, &defaults.send_request, "sendRequest", AppCommand::SendRequest),
            (&config.new_request, &defaults.new_request, "newRequest", AppCommand::NewRequest),
            (&config.save_request, &defaults.save_request, "saveRequest", AppCommand::ShowSaveDialog),
            (&config.focus_url, &defaults.focus_url, "focusURL", AppCommand::FocusUrl),
        ];

        let mut labels: [String; 4] = Default::default();
        for (i, (label, fallback, name, command)) in slots.into_iter().enumerate() {
            let taken = |binding: &KeyBinding| bindings.iter().any(|(b, _)| b.same_key(binding));

            let chosen = match label.parse::<KeyBinding>() {
                Ok(binding) if !taken(&binding) => Some((binding, label.clone())),
                Ok(_) => {
                    tracing::warn!(key = name, label = %label, fallback = %fallback, "Key binding already in use, using default");
                    None
                }
                Err(e) => {
                    tracing::warn!(key = name, error = %e, fallback = %fallback, "Using default key binding");
                    None
                }
            };
            let chosen = chosen.or_else(|| {
                let binding = fallback.parse::<KeyBinding>().ok().filter(|b| !taken(b));
                if binding.is_none() {
                    tracing::warn!(key = name, fallback = %fallback, "Default key binding already in use, action has no shortcut");
                }
                binding.map(|b| (b, fallback.clone()))
            });

            if let Some((binding, label)) = chosen {
                bindings.push((binding, command));
                labels[i] = label;
            }
        }

        let [send_request, new_request, save_request, focus_url] = labels;

        Keymap {
            bindings,
            labels: KeybindingsConfig {
                send_request,
                new_request,
                save_request,
                focus_url,
            },
        }
    }

    /// Labels actually in effect, after any fallbacks
    pub fn labels(&self) -> &KeybindingsConfig {
        &self.labels
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<AppCommand> {
        self.bindings
            .iter()
            .find(|(binding, _)| binding.matches(key))
            .map(|(_, command)| command.clone())
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeybindingsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_labels() {
        assert_eq!(
            "Ctrl+Enter".parse::<KeyBinding>(),
            Ok(KeyBinding::new(KeyCode::Enter, KeyModifiers::CONTROL))
        );
        assert_eq!(
            "ctrl+s".parse::<KeyBinding>(),
            Ok(KeyBinding::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            "Alt+F2".parse::<KeyBinding>(),
            Ok(KeyBinding::new(KeyCode::F(2), KeyModifiers::ALT))
        );
        assert!("Hyper+X".parse::<KeyBinding>().is_err());
        assert!("Ctrl+".parse::<KeyBinding>().is_err());
        assert!("F13".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn display_round_trips_common_labels() {
        for label in ["Ctrl+Enter", "Ctrl+N", "Ctrl+S", "Ctrl+U", "F5", "Shift+Tab"] {
            let binding: KeyBinding = label.parse().unwrap();
            assert_eq!(binding.to_string(), label);
        }
    }

    #[test]
    fn default_shortcuts_resolve() {
        let keymap = Keymap::default();
        let cases = [
            (key(KeyCode::Char('q'), KeyModifiers::CONTROL), AppCommand::Quit),
            (key(KeyCode::Char('n'), KeyModifiers::CONTROL), AppCommand::NewRequest),
            (key(KeyCode::Char('s'), KeyModifiers::CONTROL), AppCommand::ShowSaveDialog),
            (key(KeyCode::Enter, KeyModifiers::CONTROL), AppCommand::SendRequest),
            (key(KeyCode::F(5), KeyModifiers::NONE), AppCommand::SendRequest),
            (key(KeyCode::Tab, KeyModifiers::NONE), AppCommand::FocusNext),
            (key(KeyCode::BackTab, KeyModifiers::SHIFT), AppCommand::FocusPrev),
            (key(KeyCode::Char('h'), KeyModifiers::CONTROL), AppCommand::FocusCollections),
            (key(KeyCode::Char('l'), KeyModifiers::CONTROL), AppCommand::FocusResponse),
            (key(KeyCode::Char('u'), KeyModifiers::CONTROL), AppCommand::FocusUrl),
        ];
        for (event, expected) in cases {
            assert_eq!(keymap.resolve(&event), Some(expected), "{event:?}");
        }
    }

    #[test]
    fn plain_keys_are_not_shortcuts() {
        let keymap = Keymap::default();
        assert_eq!(keymap.resolve(&key(KeyCode::Char('s'), KeyModifiers::NONE)), None);
        assert_eq!(keymap.resolve(&key(KeyCode::Enter, KeyModifiers::NONE)), None);
        assert_eq!(keymap.resolve(&key(KeyCode::Char('S'), KeyModifiers::SHIFT)), None);
    }

    #[test]
    fn configured_labels_take_effect() {
        let config = KeybindingsConfig {
            send_request: "Alt+R".to_string(),
            ..KeybindingsConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('r'), KeyModifiers::ALT)),
            Some(AppCommand::SendRequest)
        );
        assert_eq!(keymap.resolve(&key(KeyCode::Enter, KeyModifiers::CONTROL)), None);
        assert_eq!(keymap.labels().send_request, "Alt+R");
    }

    #[test]
    fn bad_label_falls_back_to_default() {
        let config = KeybindingsConfig {
            save_request: "Ctrl+Nope".to_string(),
            ..KeybindingsConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(AppCommand::ShowSaveDialog)
        );
        assert_eq!(keymap.labels().save_request, "Ctrl+S");
    }

    #[test]
    fn label_taken_by_fixed_shortcut_falls_back() {
        let config = crate::config::Config::from_yaml("keybindings:\n  focusURL: Ctrl+L\n").unwrap();
        let keymap = Keymap::from_config(&config.keybindings);
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(AppCommand::FocusResponse)
        );
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(AppCommand::FocusUrl)
        );
        assert_eq!(keymap.labels().focus_url, "Ctrl+U");
    }

    #[test]
    fn duplicate_labels_keep_the_first() {
        let config = KeybindingsConfig {
            new_request: "Alt+X".to_string(),
            save_request: "alt+x".to_string(),
            ..KeybindingsConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('x'), KeyModifiers::ALT)),
            Some(AppCommand::NewRequest)
        );
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(AppCommand::ShowSaveDialog)
        );
        assert_eq!(keymap.labels().new_request, "Alt+X");
        assert_eq!(keymap.labels().save_request, "Ctrl+S");
    }

    #[test]
    fn action_whose_default_is_taken_has_no_shortcut() {
        // newRequest claims Ctrl+U, so focusURL can't use its own label or default
        let config = KeybindingsConfig {
            new_request: "Ctrl+U".to_string(),
            focus_url: "Tab".to_string(),
            ..KeybindingsConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.resolve(&key(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(AppCommand::NewRequest)
        );
        assert_eq!(
            keymap.resolve(&key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(AppCommand::FocusNext)
        );
        assert_eq!(keymap.labels().focus_url, "");
    }
}
