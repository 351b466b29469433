//! Application configuration — agent identity and session behavior.
//!
//! One optional YAML file; every field has a default, so a partial file
//! (or none at all) is fine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::session::liveness::DEFAULT_LIVENESS_WINDOW;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display name for the remote agent.
    pub agent_name: String,
    /// Seconds the agent may take to become available after session start.
    pub liveness_window_secs: u64,
    /// Whether the input bar accepts typed chat messages.
    pub supports_chat_input: bool,
    /// Show the "agent is listening" hint while the session has started
    /// but the timeline is still empty.
    pub pre_connect_hint: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent_name: "Agent".into(),
            liveness_window_secs: DEFAULT_LIVENESS_WINDOW.as_secs(),
            supports_chat_input: true,
            pre_connect_hint: true,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Load from `path` when given, falling back to defaults (with a log
    /// line) when the file is missing or malformed.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(p) => match Self::load(p) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("failed to load config from {}: {e}", p.display());
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    pub fn liveness_window(&self) -> Duration {
        Duration::from_secs(self.liveness_window_secs)
    }
}
