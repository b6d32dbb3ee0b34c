//! Network messages - communication between App and Network layers

use crate::models::{Request, Response};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Run one request; `id` tags the result so stale ones can be dropped
    Execute { id: u64, request: Request },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// An execution finished, successfully or not. Failures are carried in
    /// `response.error`.
    Completed {
        id: u64,
        request: Request,
        response: Response,
    },
}

impl NetworkResponse {
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
        }
    }
}
