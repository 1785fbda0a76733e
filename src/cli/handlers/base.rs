//! Shared handler context
//!
//! Encapsulates project discovery, storage (with batch-journal recovery),
//! configuration, and identity lookup so each command handler starts from
//! the same place.

use crate::auth::Authenticator;
use crate::cli::utils::{self, DATA_DIR};
use crate::config::AppConfig;
use crate::core::{TicketId, UserProfile};
use crate::error::{Result, TicketDeskError};
use crate::lifecycle::Lifecycle;
use crate::storage::{FileStorage, TicketRepository};
use std::path::PathBuf;

/// Context for handler operations
#[derive(Debug)]
pub struct HandlerContext {
    pub project_root: PathBuf,
    pub storage: FileStorage,
    pub config: AppConfig,
}

impl HandlerContext {
    /// Create a new handler context
    ///
    /// Resolves the project root, opens storage (rolling forward any
    /// interrupted batch commit), and loads the project configuration.
    pub fn new(project_dir: Option<&str>) -> Result<Self> {
        let project_root = utils::find_project_root(project_dir)?;
        let data_dir = project_root.join(DATA_DIR);
        let storage = FileStorage::open(&data_dir)?;
        let config = AppConfig::load(&data_dir)?;
        Ok(Self {
            project_root,
            storage,
            config,
        })
    }

    /// Authenticator over this project's store
    #[must_use]
    pub fn auth(&self) -> Authenticator<'_> {
        Authenticator::new(&self.storage)
    }

    /// Lifecycle manager over this project's store
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle<'_, FileStorage> {
        Lifecycle::new(&self.storage)
    }

    /// The signed-in user, or `NotSignedIn`
    pub fn current_user(&self) -> Result<UserProfile> {
        self.auth().current_user()
    }

    /// Resolve a ticket reference against the active set
    ///
    /// Accepts a full id or a unique id prefix.
    pub fn resolve_ticket(&self, reference: &str) -> Result<TicketId> {
        if let Ok(id) = TicketId::parse_str(reference) {
            return Ok(id);
        }
        let matches: Vec<TicketId> = self
            .storage
            .load_all()?
            .into_iter()
            .map(|t| t.id)
            .filter(|id| id.to_string().starts_with(reference))
            .collect();
        Self::unique_match(matches, reference)
    }

    /// Resolve a ticket reference against the trash set
    pub fn resolve_trashed(&self, reference: &str) -> Result<TicketId> {
        if let Ok(id) = TicketId::parse_str(reference) {
            return Ok(id);
        }
        let matches: Vec<TicketId> = self
            .storage
            .load_all_trashed()?
            .into_iter()
            .map(|t| t.ticket.id)
            .filter(|id| id.to_string().starts_with(reference))
            .collect();
        Self::unique_match(matches, reference)
    }

    fn unique_match(mut matches: Vec<TicketId>, reference: &str) -> Result<TicketId> {
        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(TicketDeskError::TicketNotFound {
                id: reference.to_string(),
            }),
            _ => Err(TicketDeskError::custom(format!(
                "Ambiguous ticket reference '{reference}' matches {} tickets",
                matches.len()
            ))),
        }
    }
}
