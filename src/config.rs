//! Project configuration
//!
//! `.ticketdesk/config.yaml` carries the static per-project settings: the
//! site names offered when filing a ticket, the default priority, and where
//! exports land. Everything has a default so the file is optional.

use crate::core::Priority;
use crate::error::{Result, TicketDeskError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-project settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Site names offered for the ticket `site` field
    pub sites: Vec<String>,
    /// Priority used when a new ticket does not specify one
    pub default_priority: Priority,
    /// Directory exports are written into, relative to the project root
    pub export_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sites: Vec::new(),
            default_priority: Priority::Medium,
            export_dir: "exports".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the store root, falling back to defaults
    /// when no config file exists
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("config.yaml");
        if !path.exists() {
            return Ok(Self::default());
        }
        config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| TicketDeskError::custom(format!("Invalid config: {e}")))
    }

    /// Write the configuration to the store root
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join("config.yaml");
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}
