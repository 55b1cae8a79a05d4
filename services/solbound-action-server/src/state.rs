//! Application state shared across handlers

use crate::config::ActionSettings;
use chrono::{DateTime, Utc};
use solbound_issuer::MintService;

/// Shared application state
pub struct AppState {
    /// The issuer, built once at startup
    pub service: MintService,
    /// Text returned by `GET`
    pub action: ActionSettings,
    /// Origin for the icon URL; falls back to the request origin
    pub public_base_url: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: MintService, action: ActionSettings, public_base_url: Option<String>) -> Self {
        Self {
            service,
            action,
            public_base_url: public_base_url.filter(|url| !url.trim().is_empty()),
            started_at: Utc::now(),
        }
    }
}
