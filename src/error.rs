//! Error types for ticketdesk
//!
//! Every fallible operation in the crate returns [`Result`]. The variants map
//! onto the categories surfaced to the user: validation, permission,
//! authentication, not-found, and store failures.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TicketDeskError>;

/// All errors produced by ticketdesk
#[derive(Debug, Error)]
pub enum TicketDeskError {
    /// A required field is missing or an invariant does not hold
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The acting user is not allowed to perform the operation
    #[error("Insufficient permissions: {0}")]
    PermissionDenied(String),

    /// Password re-proof failed before a destructive operation
    #[error("Authentication failed: incorrect password")]
    AuthenticationFailed,

    /// No user is signed in
    #[error("Not signed in. Use 'ticketdesk login' first")]
    NotSignedIn,

    /// The ticket id is absent from the active set
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    /// No user profile matches the given email or id
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// An account with this email already exists
    #[error("An account already exists for {0}")]
    DuplicateUser(String),

    /// The current directory is not inside a ticketdesk project
    #[error("Project not initialized. Run 'ticketdesk init' first")]
    ProjectNotInitialized,

    /// The document store could not be read or written
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be parsed or serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else
    #[error("{0}")]
    Custom(String),
}

impl TicketDeskError {
    /// Create a custom error from any message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a permission error
    pub fn permission(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Whether this error should abort a staged destructive operation
    /// without touching any data
    #[must_use]
    pub const fn aborts_pending_action(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::PermissionDenied(_) | Self::NotSignedIn
        )
    }

    /// A next-step hint shown under the error message, when one exists
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotSignedIn => Some("Sign in with 'ticketdesk login <email>'"),
            Self::ProjectNotInitialized => Some("Run 'ticketdesk init' in the project directory"),
            Self::TicketNotFound { .. } => Some("List tickets with 'ticketdesk list'"),
            Self::AuthenticationFailed => Some("Check the password and try again"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TicketDeskError::TicketNotFound {
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Ticket not found: abc");

        let err = TicketDeskError::validation("client is required");
        assert_eq!(err.to_string(), "Validation failed: client is required");
    }

    #[test]
    fn test_aborts_pending_action() {
        assert!(TicketDeskError::AuthenticationFailed.aborts_pending_action());
        assert!(TicketDeskError::permission("admin only").aborts_pending_action());
        assert!(!TicketDeskError::custom("other").aborts_pending_action());
    }
}
