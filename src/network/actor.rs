//! Network actor - runs HTTP requests in the Tokio runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::execute;

/// Network actor that processes execute commands
pub struct NetworkActor {
    client: reqwest::Client,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: reqwest::Client, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { id, request }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, url = %request.url, method = %request.method, "Executing request");
                                let response = execute(&client, &request).await;
                                match &response.error {
                                    Some(error) => tracing::warn!(id, %error, "Request failed"),
                                    None => tracing::info!(
                                        id,
                                        status = response.status_code,
                                        elapsed_ms = response.duration.as_millis() as u64,
                                        "Request completed"
                                    ),
                                }
                                // App may already be gone during shutdown
                                let _ = response_tx.send(NetworkResponse::Completed { id, request, response });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => break,
                    }
                }

                // Reap finished tasks
                Some(result) = self.active_requests.join_next() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Request task panicked");
                    }
                }
            }
        }

        self.active_requests.abort_all();
        tracing::info!("Network actor stopped");
    }
}
