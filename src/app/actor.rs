//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{AppCommand, NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop. Returns when quit is requested or the UI
    /// goes away; dropping `self` closes the render channel and the store.
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Send initial render state
        self.render();

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    // UI gone counts as quit
                    let quit = event.map_or(true, |event| self.handle_ui_event(event));
                    if quit {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.render();
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    self.render();
                }
            }
        }

        tracing::info!("App actor stopped");
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Quit => true,
            UiEvent::Resize => false,
            UiEvent::Key(key) => match self.state.handle_key(key) {
                Some(command) => self.handle_command(command),
                None => false,
            },
        }
    }

    fn handle_command(&mut self, command: AppCommand) -> bool {
        if command == AppCommand::Quit {
            return true;
        }
        if let Some(cmd) = self.state.apply(command) {
            // Show "Sending request..." before the call completes
            self.render();
            let _ = self.network_tx.send(cmd);
        }
        false
    }
}
