//! Network layer - HTTP request execution
//!
//! The Network actor receives execute commands and sends back tagged
//! responses. Each request runs on its own task so the UI never waits.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::{build_client, execute};
