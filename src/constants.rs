//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name
pub const APP_NAME: &str = "trext";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under the user's home holding config, data and logs
pub const CONFIG_DIR: &str = ".config/trext";

pub const CONFIG_FILE: &str = "config.yaml";
pub const DATA_FILE: &str = "data.db";
pub const LOG_FILE: &str = "trext.log";

/// Collection every saved request is assigned to
pub const DEFAULT_COLLECTION_ID: i64 = 1;

/// Client-wide request timeout when the config doesn't say otherwise
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_HISTORY_MAX_ITEMS: usize = 100;

/// Content type applied to requests with a body and no explicit one
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Placeholder shown in the URL field
pub const URL_PLACEHOLDER: &str = "https://api.example.com/endpoint";
