//! File-backed document store
//!
//! One YAML document per record under a project-local `.ticketdesk/`
//! directory: `tickets/` holds the active set, `trash/` the soft-deleted set,
//! `users/` the profiles. Single-document writes go through a temp file and
//! rename so a reader never sees a half-written document. Multi-document
//! batches are journaled; see [`crate::storage::Batch`].

use crate::core::{Ticket, TicketId, TrashedTicket, UserId, UserProfile};
use crate::error::{Result, TicketDeskError};
use crate::storage::batch::{Batch, BatchCommit, BatchOp};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const JOURNAL_FILE: &str = "batch_journal.yaml";

/// File-backed storage rooted at a `.ticketdesk` directory
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage handle over an existing directory
    ///
    /// Does no I/O. Use [`FileStorage::open`] to also recover an interrupted
    /// batch commit, which every long-lived caller should do.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open storage and roll forward any interrupted batch commit
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self::new(root);
        storage.recover()?;
        Ok(storage)
    }

    /// Create the directory layout for a fresh project
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self::new(root);
        fs::create_dir_all(storage.tickets_dir())?;
        fs::create_dir_all(storage.trash_dir())?;
        fs::create_dir_all(storage.users_dir())?;
        Ok(storage)
    }

    /// Root directory of the store
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the active set
    #[must_use]
    pub fn tickets_dir(&self) -> PathBuf {
        self.root.join("tickets")
    }

    /// Directory holding the trash set
    #[must_use]
    pub fn trash_dir(&self) -> PathBuf {
        self.root.join("trash")
    }

    /// Directory holding user profiles
    #[must_use]
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    fn ticket_path(&self, id: &TicketId) -> PathBuf {
        self.tickets_dir().join(format!("{id}.yaml"))
    }

    fn trash_path(&self, id: &TicketId) -> PathBuf {
        self.trash_dir().join(format!("{id}.yaml"))
    }

    fn user_path(&self, id: &UserId) -> PathBuf {
        self.users_dir().join(format!("{id}.yaml"))
    }

    /// Write a document atomically: serialize to a temp file, then rename
    fn write_document<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4().simple()));
        let content = serde_yaml::to_string(value)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn read_document<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Remove a document, treating an already-missing file as done
    fn remove_document(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_collection<T: DeserializeOwned>(&self, dir: &Path) -> Result<Vec<T>> {
        let mut documents = Vec::new();
        if !dir.exists() {
            return Ok(documents);
        }
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
                documents.push(self.read_document(&path)?);
            }
        }
        Ok(documents)
    }

    // --- active set ---

    pub fn save_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.write_document(&self.ticket_path(&ticket.id), ticket)
    }

    pub fn load_ticket(&self, id: &TicketId) -> Result<Ticket> {
        let path = self.ticket_path(id);
        if !path.exists() {
            return Err(TicketDeskError::TicketNotFound { id: id.to_string() });
        }
        self.read_document(&path)
    }

    pub fn load_all_tickets(&self) -> Result<Vec<Ticket>> {
        self.read_collection(&self.tickets_dir())
    }

    pub fn delete_ticket(&self, id: &TicketId) -> Result<()> {
        self.remove_document(&self.ticket_path(id))
    }

    pub fn ticket_exists(&self, id: &TicketId) -> bool {
        self.ticket_path(id).exists()
    }

    // --- trash set ---

    pub fn save_trashed(&self, trashed: &TrashedTicket) -> Result<()> {
        self.write_document(&self.trash_path(&trashed.ticket.id), trashed)
    }

    pub fn load_trashed(&self, id: &TicketId) -> Result<TrashedTicket> {
        let path = self.trash_path(id);
        if !path.exists() {
            return Err(TicketDeskError::TicketNotFound { id: id.to_string() });
        }
        self.read_document(&path)
    }

    pub fn load_all_trashed(&self) -> Result<Vec<TrashedTicket>> {
        self.read_collection(&self.trash_dir())
    }

    pub fn delete_trashed(&self, id: &TicketId) -> Result<()> {
        self.remove_document(&self.trash_path(id))
    }

    pub fn trashed_exists(&self, id: &TicketId) -> bool {
        self.trash_path(id).exists()
    }

    // --- user profiles ---

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.write_document(&self.user_path(&profile.id), profile)
    }

    pub fn load_profile(&self, id: &UserId) -> Result<UserProfile> {
        let path = self.user_path(id);
        if !path.exists() {
            return Err(TicketDeskError::UserNotFound(id.to_string()));
        }
        self.read_document(&path)
    }

    pub fn load_all_profiles(&self) -> Result<Vec<UserProfile>> {
        self.read_collection(&self.users_dir())
    }

    pub fn find_profile_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let email = email.to_lowercase();
        Ok(self
            .load_all_profiles()?
            .into_iter()
            .find(|p| p.email.to_lowercase() == email))
    }

    // --- batch commit ---

    fn journal_path(&self) -> PathBuf {
        self.root.join(JOURNAL_FILE)
    }

    fn apply_batch(&self, batch: &Batch) -> Result<()> {
        for op in batch.ops() {
            match op {
                BatchOp::PutTrashed(trashed) => self.save_trashed(trashed)?,
                BatchOp::RemoveTicket(id) => self.delete_ticket(id)?,
                BatchOp::PutTicket(ticket) => self.save_ticket(ticket)?,
                BatchOp::RemoveTrashed(id) => self.delete_trashed(id)?,
            }
        }
        Ok(())
    }

    /// Complete an interrupted batch commit left behind by a crash
    ///
    /// All batch operations are idempotent (overwriting puts, missing-ok
    /// removes), so re-applying a partially applied journal is safe.
    pub fn recover(&self) -> Result<()> {
        let journal = self.journal_path();
        if !journal.exists() {
            return Ok(());
        }
        tracing::warn!("found interrupted batch commit, rolling forward");
        let batch: Batch = self.read_document(&journal)?;
        self.apply_batch(&batch)?;
        self.remove_document(&journal)
    }
}

impl BatchCommit for FileStorage {
    /// Commit a batch through the journal
    ///
    /// The journal lands on disk before any document is touched; if the
    /// process dies mid-apply the next [`FileStorage::open`] rolls the batch
    /// forward. A failure to persist the journal applies nothing.
    fn commit_batch(&self, batch: Batch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let journal = self.journal_path();
        self.write_document(&journal, &batch)?;
        self.apply_batch(&batch)?;
        self.remove_document(&journal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketBuilder;
    use chrono::Utc;
    use tempfile::TempDir;

    fn storage() -> (TempDir, FileStorage) {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::init(temp.path().join(".ticketdesk")).unwrap();
        (temp, storage)
    }

    fn ticket(client: &str) -> Ticket {
        TicketBuilder::new()
            .client(client)
            .description(format!("Issue at {client}"))
            .build()
    }

    #[test]
    fn test_save_and_load_ticket() {
        let (_temp, storage) = storage();
        let ticket = ticket("Acme");
        storage.save_ticket(&ticket).unwrap();

        let loaded = storage.load_ticket(&ticket.id).unwrap();
        assert_eq!(loaded, ticket);
    }

    #[test]
    fn test_load_missing_ticket() {
        let (_temp, storage) = storage();
        let err = storage.load_ticket(&TicketId::new()).unwrap_err();
        assert!(matches!(err, TicketDeskError::TicketNotFound { .. }));
    }

    #[test]
    fn test_delete_missing_ticket_is_noop() {
        let (_temp, storage) = storage();
        storage.delete_ticket(&TicketId::new()).unwrap();
    }

    #[test]
    fn test_trash_round_trip() {
        let (_temp, storage) = storage();
        let original = ticket("Acme");
        let trashed = TrashedTicket::new(original.clone(), Utc::now());
        storage.save_trashed(&trashed).unwrap();

        let loaded = storage.load_trashed(&original.id).unwrap();
        assert_eq!(loaded.ticket, original);
        assert!(storage.trashed_exists(&original.id));
    }

    #[test]
    fn test_find_profile_by_email_is_case_insensitive() {
        let (_temp, storage) = storage();
        let profile = UserProfile {
            id: UserId::new(),
            name: "Dana".to_string(),
            email: "Dana@Example.com".to_string(),
            phone: None,
            employee_id: None,
            role: crate::core::Role::User,
            password_hash: String::new(),
        };
        storage.save_profile(&profile).unwrap();

        let found = storage.find_profile_by_email("dana@example.com").unwrap();
        assert_eq!(found.map(|p| p.id), Some(profile.id));
        assert!(storage.find_profile_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_batch_moves_ticket_to_trash() {
        let (_temp, storage) = storage();
        let original = ticket("Acme");
        storage.save_ticket(&original).unwrap();

        let mut batch = Batch::new();
        batch.put_trashed(TrashedTicket::new(original.clone(), Utc::now()));
        batch.remove_ticket(original.id.clone());
        storage.commit_batch(batch).unwrap();

        assert!(!storage.ticket_exists(&original.id));
        assert!(storage.trashed_exists(&original.id));
    }

    #[test]
    fn test_recover_rolls_journal_forward() {
        let (_temp, storage) = storage();
        let original = ticket("Acme");
        storage.save_ticket(&original).unwrap();

        // Simulate a crash after the journal was persisted but before any
        // document was touched.
        let mut batch = Batch::new();
        batch.put_trashed(TrashedTicket::new(original.clone(), Utc::now()));
        batch.remove_ticket(original.id.clone());
        storage
            .write_document(&storage.journal_path(), &batch)
            .unwrap();

        let reopened = FileStorage::open(storage.root().to_path_buf()).unwrap();
        assert!(!reopened.ticket_exists(&original.id));
        assert!(reopened.trashed_exists(&original.id));
        assert!(!reopened.journal_path().exists());
    }

    #[test]
    fn test_empty_batch_leaves_no_journal() {
        let (_temp, storage) = storage();
        storage.commit_batch(Batch::new()).unwrap();
        assert!(!storage.journal_path().exists());
    }
}
