//! User profiles and roles
//!
//! Role gates destructive operations: only admins may delete or restore
//! tickets. Edit permission for regular users is scoped to tickets they
//! authored.

use crate::error::{Result, TicketDeskError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random user ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from its string form
    pub fn parse_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TicketDeskError::custom(format!("Invalid user ID: {s}")))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Whether this role may perform destructive operations
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Admin => "admin",
            Self::User => "user",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Role {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(TicketDeskError::custom(format!(
                "Invalid role: {s}. Valid values: admin, user"
            ))),
        }
    }
}

/// One account in the user collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Sign-in email, unique across profiles
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Internal employee identifier
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Role gating destructive operations
    pub role: Role,
    /// Argon2id password hash in PHC string format
    pub password_hash: String,
}

impl UserProfile {
    /// Whether this user may edit the given ticket
    ///
    /// Admins may edit anything; regular users only tickets they authored.
    #[must_use]
    pub fn can_edit(&self, author_id: &UserId) -> bool {
        self.role.is_admin() || self.id == *author_id
    }
}
