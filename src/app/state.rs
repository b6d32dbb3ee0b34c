//! App state - owns every widget, the store handle and the focus ring

use crossterm::event::KeyEvent;

use crate::app::focus::FocusRing;
use crate::app::keymap::Keymap;
use crate::components::{CollectionsList, HelpBar, RequestPanel, ResponseView, SaveDialog};
use crate::config::Config;
use crate::messages::{AppCommand, FocusTarget, Page, RenderState};
use crate::models::Request;
use crate::storage::Store;
use crate::theme::Theme;

/// Main application state. Only the App actor touches it.
pub struct AppState {
    pub config: Config,
    pub theme: Theme,
    pub keymap: Keymap,
    pub store: Box<dyn Store>,

    // Navigation
    pub page: Page,
    pub focus: FocusRing,

    // The request being edited; its id may lag behind `current_request_id`
    // until the next save
    pub current_request: Request,
    pub current_request_id: i64,

    // Widgets
    pub collections: CollectionsList,
    pub request_panel: RequestPanel,
    pub response_view: ResponseView,
    pub save_dialog: SaveDialog,
    pub help_bar: HelpBar,

    // Execution tagging
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,
}

impl AppState {
    pub fn new(config: Config, store: Box<dyn Store>) -> Self {
        let theme = Theme::by_name(&config.theme);
        let keymap = Keymap::from_config(&config.keybindings);
        let help_bar = HelpBar::from_keybindings(keymap.labels());

        let mut state = AppState {
            config,
            theme,
            keymap,
            store,
            page: Page::Main,
            focus: FocusRing::new(),
            current_request: Request::new(),
            current_request_id: 0,
            collections: CollectionsList::new(),
            request_panel: RequestPanel::new(),
            response_view: ResponseView::new(),
            save_dialog: SaveDialog::new(),
            help_bar,
            next_request_id: 1,
            pending_request_id: None,
        };
        state.reload_requests();
        state
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn focused(&self) -> FocusTarget {
        self.focus.current()
    }

    /// Route a key press. The Save page swallows everything; otherwise global
    /// shortcuts win over the focused widget.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        if self.page == Page::Save {
            return self.save_dialog.handle_key(&key);
        }

        if let Some(command) = self.keymap.resolve(&key) {
            return Some(command);
        }

        match self.focused() {
            FocusTarget::Collections => self.collections.handle_key(&key),
            FocusTarget::Response => {
                self.response_view.handle_key(&key);
                None
            }
            target => self.request_panel.handle_key(target, &key),
        }
    }

    /// Convert to render state for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            page: self.page,
            focus: self.focused(),
            theme: self.theme,
            collections: self.collections.clone(),
            request_panel: self.request_panel.clone(),
            response_view: self.response_view.clone(),
            save_dialog: self.save_dialog.clone(),
            help_bar: self.help_bar.clone(),
        }
    }
}
