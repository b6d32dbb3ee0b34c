//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::models::Request;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    Key(KeyEvent),
    Resize,
    Quit,
}

/// Screen regions that can hold keyboard focus, in Tab order
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FocusTarget {
    #[default]
    Collections,
    Url,
    Headers,
    Body,
    SendButton,
    Response,
}

impl FocusTarget {
    pub const ORDER: [FocusTarget; 6] = [
        FocusTarget::Collections,
        FocusTarget::Url,
        FocusTarget::Headers,
        FocusTarget::Body,
        FocusTarget::SendButton,
        FocusTarget::Response,
    ];
}

/// Which page is on top. `Save` is the modal dialog over `Main`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Page {
    #[default]
    Main,
    Save,
}

/// Intent reported by a widget or a global shortcut, applied by the App layer
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Quit,
    NewRequest,
    ShowSaveDialog,
    SendRequest,
    FocusNext,
    FocusPrev,
    FocusCollections,
    FocusResponse,
    FocusUrl,
    SelectRequest(Request),
    DeleteRequest(i64),
    SaveRequest(String),
    CancelSave,
}

/// Convert a terminal key event into a UiEvent. Only presses are forwarded;
/// Ctrl+C always quits.
pub fn key_to_ui_event(key: KeyEvent) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    Some(UiEvent::Key(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(key_to_ui_event(key), Some(UiEvent::Quit)));
    }

    #[test]
    fn releases_are_ignored() {
        let key = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(key_to_ui_event(key).is_none());
    }

    #[test]
    fn plain_keys_pass_through() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(matches!(key_to_ui_event(key), Some(UiEvent::Key(k)) if k == key));
    }
}
