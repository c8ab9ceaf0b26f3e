//! Tracker configuration.

use serde::{Deserialize, Serialize};

/// Tracker configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Whether the debug-only `reset_data` operation may run
    /// (env `RATINGS_ALLOW_RESET`, default: on in debug builds only).
    #[serde(default = "default_allow_reset")]
    pub allow_reset: bool,
}

fn default_allow_reset() -> bool {
    cfg!(debug_assertions)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let allow_reset = std::env::var("RATINGS_ALLOW_RESET")
            .ok()
            .and_then(|v| {
                let flag = parse_flag(&v);
                if flag.is_none() {
                    tracing::warn!(value = %v, "Ignoring unrecognized RATINGS_ALLOW_RESET");
                }
                flag
            })
            .unwrap_or_else(default_allow_reset);

        Self { allow_reset }
    }

    /// Enable or disable `reset_data`.
    #[must_use]
    pub fn with_allow_reset(mut self, allow: bool) -> Self {
        self.allow_reset = allow;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            allow_reset: default_allow_reset(),
        }
    }
}
