//! # TRexT
//!
//! A terminal HTTP client with saved request collections.
//!
//! ## Features
//! - HTTP methods: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS
//! - URL, header and body editors
//! - Saved requests grouped in collections (SQLite or PostgreSQL)
//! - Request history
//! - JSON pretty-printing and highlighting
//! - YAML config with themes and key bindings
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod components;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod network;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::Config;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Collection, HistoryEntry, HttpMethod, Request, Response, SavedRequest};
pub use network::NetworkActor;
pub use storage::{Store, StoreError};
