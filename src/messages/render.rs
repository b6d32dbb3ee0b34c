//! Render state - data structure sent from App layer to UI for rendering

use crate::components::{CollectionsList, HelpBar, RequestPanel, ResponseView, SaveDialog};
use crate::messages::ui_events::{FocusTarget, Page};
use crate::theme::Theme;

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub page: Page,
    pub focus: FocusTarget,
    pub theme: Theme,

    // Widgets
    pub collections: CollectionsList,
    pub request_panel: RequestPanel,
    pub response_view: ResponseView,
    pub save_dialog: SaveDialog,
    pub help_bar: HelpBar,
}
