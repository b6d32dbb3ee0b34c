//! Command handlers - business logic for applying AppCommands and network results

use crate::app::AppState;
use crate::constants::DEFAULT_COLLECTION_ID;
use crate::messages::{AppCommand, FocusTarget, NetworkCommand, NetworkResponse, Page};
use crate::models::{HistoryEntry, Request, Response, SavedRequest};

const UNTITLED: &str = "Untitled Request";

impl AppState {
    /// Apply a command. `Quit` is handled by the actor before this point.
    pub fn apply(&mut self, command: AppCommand) -> Option<NetworkCommand> {
        match command {
            AppCommand::Quit => {}
            AppCommand::SendRequest => return self.prepare_request(),
            AppCommand::NewRequest => self.new_request(),
            AppCommand::ShowSaveDialog => self.show_save_dialog(),
            AppCommand::SaveRequest(name) => self.save_request(&name),
            AppCommand::CancelSave => self.cancel_save(),
            AppCommand::DeleteRequest(id) => self.delete_request(id),
            AppCommand::SelectRequest(request) => self.select_request(request),
            AppCommand::FocusNext => self.focus = self.focus.next(),
            AppCommand::FocusPrev => self.focus = self.focus.prev(),
            AppCommand::FocusCollections => self.focus_on(FocusTarget::Collections),
            AppCommand::FocusResponse => self.focus_on(FocusTarget::Response),
            AppCommand::FocusUrl => self.focus_on(FocusTarget::Url),
        }
        None
    }

    fn focus_on(&mut self, target: FocusTarget) {
        self.focus = self.focus.focus(target);
    }

    // ========================
    // Request lifecycle
    // ========================

    pub fn new_request(&mut self) {
        self.current_request = Request::new();
        self.current_request_id = 0;
        self.request_panel.clear();
        self.response_view.clear();
        self.focus_on(FocusTarget::Url);
    }

    pub fn select_request(&mut self, request: Request) {
        self.current_request_id = request.id;
        self.request_panel.set_request(&request);
        self.current_request = request;
        self.focus_on(FocusTarget::Url);
    }

    pub fn reload_requests(&mut self) {
        match self.store.get_all_requests() {
            Ok(requests) => self.collections.set_requests(requests),
            Err(e) => tracing::warn!(error = %e, "Failed to load saved requests"),
        }
    }

    // ========================
    // Save / delete
    // ========================

    pub fn show_save_dialog(&mut self) {
        if self.current_request.name.is_empty() {
            self.save_dialog.reset();
        } else {
            let name = self.current_request.name.clone();
            self.save_dialog.set_name(&name);
        }
        self.page = Page::Save;
    }

    pub fn save_request(&mut self, name: &str) {
        let mut request = self.request_panel.get_request();
        request.name = match name.trim() {
            "" => UNTITLED.to_string(),
            trimmed => trimmed.to_string(),
        };
        request.id = self.current_request_id;

        let saved = SavedRequest::from_request(&request, DEFAULT_COLLECTION_ID);
        match self.store.save_request(&saved) {
            Ok(id) => {
                tracing::info!(id, name = %request.name, "Saved request");
                request.id = id;
                self.current_request_id = id;
                self.current_request = request;
                self.reload_requests();
            }
            Err(e) => tracing::warn!(error = %e, "Failed to save request"),
        }

        self.page = Page::Main;
        self.focus_on(FocusTarget::Collections);
    }

    pub fn cancel_save(&mut self) {
        self.page = Page::Main;
        self.focus_on(FocusTarget::Url);
    }

    pub fn delete_request(&mut self, id: i64) {
        match self.store.delete_request(id) {
            Ok(()) => {
                tracing::info!(id, "Deleted request");
                if id == self.current_request_id {
                    self.new_request();
                }
            }
            Err(e) => tracing::warn!(id, error = %e, "Failed to delete request"),
        }
        self.reload_requests();
    }

    // ========================
    // Request sending
    // ========================

    /// Tag and emit an execution for the panel's request. An empty URL does
    /// nothing.
    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        let mut request = self.request_panel.get_request();
        if request.url.trim().is_empty() {
            return None;
        }
        request.id = self.current_request_id;
        request.name = self.current_request.name.clone();

        self.response_view.clear();
        self.response_view.set_loading();

        let id = self.next_id();
        self.pending_request_id = Some(id);
        tracing::debug!(id, url = %request.url, "Queued request");

        Some(NetworkCommand::Execute { id, request })
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        let NetworkResponse::Completed { id, request, response } = response;

        // Every completed execution is history, even one the user has moved past
        self.record_history(&request, &response);

        if self.pending_request_id != Some(id) {
            tracing::debug!(id, pending = ?self.pending_request_id, "Not displaying stale response");
            return;
        }
        self.pending_request_id = None;

        self.response_view.set_response(&response);
    }

    fn record_history(&mut self, request: &Request, response: &Response) {
        if !self.config.history.enabled || response.is_error() {
            return;
        }

        let entry = HistoryEntry::record(request, response);
        if let Err(e) = self.store.add_to_history(&entry) {
            tracing::warn!(error = %e, "Failed to record history");
            return;
        }

        let keep = self.config.history.max_items;
        if keep > 0 {
            if let Err(e) = self.store.prune_history(keep) {
                tracing::warn!(error = %e, "Failed to prune history");
            }
        }
    }
}
