//! Screen widgets. Each one owns its display state, draws a single region and
//! turns key presses into `AppCommand`s for the App layer to apply.

pub mod collections_list;
pub mod help_bar;
pub mod request_panel;
pub mod response_view;
pub mod save_dialog;
pub mod text_input;

pub use collections_list::CollectionsList;
pub use help_bar::HelpBar;
pub use request_panel::RequestPanel;
pub use response_view::{ResponseTab, ResponseView};
pub use save_dialog::{SaveDialog, SaveField};
pub use text_input::TextInput;
