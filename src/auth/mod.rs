//! Local identity: sign-up, sign-in, sessions, and password re-proof
//!
//! Credentials live on the user profile as argon2id hashes. The session is a
//! marker file under the store root. [`Authenticator::reauthenticate`] is the
//! gate in front of destructive operations: it re-verifies the acting user's
//! password regardless of the session's validity.

use crate::core::{Role, UserId, UserProfile};
use crate::error::{Result, TicketDeskError};
use crate::storage::{FileStorage, ProfileRepository};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const SESSION_FILE: &str = "session.yaml";

/// The signed-in identity persisted between invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Local credential store and session manager
pub struct Authenticator<'a> {
    storage: &'a FileStorage,
}

impl<'a> Authenticator<'a> {
    /// Create an authenticator over the given store
    #[must_use]
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    fn session_path(&self) -> PathBuf {
        self.storage.root().join(SESSION_FILE)
    }

    /// Hash a password for storage
    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| TicketDeskError::custom(format!("Failed to hash password: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash
    fn verify_password(password: &str, stored: &str) -> Result<()> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| TicketDeskError::custom(format!("Corrupt password hash: {e}")))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| TicketDeskError::AuthenticationFailed)
    }

    /// Create a new account
    ///
    /// The first account in an empty user collection becomes an admin so a
    /// fresh project can be administered; every later account starts as a
    /// regular user.
    pub fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<UserProfile> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(TicketDeskError::validation("a valid email is required"));
        }
        if password.len() < 6 {
            return Err(TicketDeskError::validation(
                "password must be at least 6 characters",
            ));
        }
        if self.storage.find_by_email(email)?.is_some() {
            return Err(TicketDeskError::DuplicateUser(email.to_string()));
        }

        let role = if self.storage.load_all_profiles()?.is_empty() {
            Role::Admin
        } else {
            Role::User
        };

        let profile = UserProfile {
            id: UserId::new(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            employee_id: None,
            role,
            password_hash: Self::hash_password(password)?,
        };
        self.storage.save_profile(&profile)?;
        tracing::info!(email, %role, "account created");
        Ok(profile)
    }

    /// Sign in with email and password, persisting the session
    pub fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile> {
        let profile = self
            .storage
            .find_by_email(email)?
            .ok_or(TicketDeskError::AuthenticationFailed)?;
        Self::verify_password(password, &profile.password_hash)?;

        let session = Session {
            user_id: profile.id.clone(),
            email: profile.email.clone(),
            signed_in_at: Utc::now(),
        };
        fs::write(self.session_path(), serde_yaml::to_string(&session)?)?;
        Ok(profile)
    }

    /// Discard the current session
    pub fn sign_out(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// The profile of the signed-in user
    pub fn current_user(&self) -> Result<UserProfile> {
        let path = self.session_path();
        if !path.exists() {
            return Err(TicketDeskError::NotSignedIn);
        }
        let session: Session = serde_yaml::from_str(&fs::read_to_string(path)?)?;
        self.storage.load_profile(&session.user_id)
    }

    /// Re-prove the acting user's password before a destructive action
    ///
    /// Independent of the session: the stored hash is checked directly, and a
    /// mismatch is always `AuthenticationFailed`.
    pub fn reauthenticate(&self, user: &UserProfile, password: &str) -> Result<()> {
        Self::verify_password(password, &user.password_hash)
    }

    /// Change another account's role; admin only
    pub fn set_role(&self, acting: &UserProfile, email: &str, role: Role) -> Result<UserProfile> {
        if !acting.role.is_admin() {
            return Err(TicketDeskError::permission(
                "only an admin may change roles",
            ));
        }
        let mut profile = self
            .storage
            .find_by_email(email)?
            .ok_or_else(|| TicketDeskError::UserNotFound(email.to_string()))?;
        profile.role = role;
        self.storage.save_profile(&profile)?;
        Ok(profile)
    }
}
