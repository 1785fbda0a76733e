use crate::core::{Ticket, TicketId, TrashedTicket, UserId, UserProfile};
use crate::error::Result;
use crate::storage::batch::BatchCommit;

/// Repository trait for the active ticket set
///
/// This trait defines the interface for storing and retrieving tickets,
/// allowing for different storage implementations.
pub trait TicketRepository: Send + Sync {
    /// Saves a ticket to the active set
    fn save(&self, ticket: &Ticket) -> Result<()>;

    /// Loads a ticket by ID
    fn load(&self, id: &TicketId) -> Result<Ticket>;

    /// Loads all active tickets
    fn load_all(&self) -> Result<Vec<Ticket>>;

    /// Deletes a ticket by ID; missing ids are a no-op
    fn delete(&self, id: &TicketId) -> Result<()>;

    /// Checks if a ticket exists by ID
    fn exists(&self, id: &TicketId) -> bool;

    /// Finds tickets matching a predicate
    fn find<F>(&self, predicate: F) -> Result<Vec<Ticket>>
    where
        F: Fn(&Ticket) -> bool;

    /// Counts tickets matching a predicate
    fn count<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&Ticket) -> bool;
}

/// Repository trait for the trash set
pub trait TrashRepository: Send + Sync {
    /// Saves a trashed ticket
    fn save_trashed(&self, trashed: &TrashedTicket) -> Result<()>;

    /// Loads a trashed ticket by ID
    fn load_trashed(&self, id: &TicketId) -> Result<TrashedTicket>;

    /// Loads all trashed tickets
    fn load_all_trashed(&self) -> Result<Vec<TrashedTicket>>;

    /// Deletes a trashed ticket by ID; missing ids are a no-op
    fn delete_trashed(&self, id: &TicketId) -> Result<()>;

    /// Checks if a trashed ticket exists by ID
    fn trashed_exists(&self, id: &TicketId) -> bool;
}

/// Repository trait for user profiles
pub trait ProfileRepository: Send + Sync {
    /// Saves a user profile
    fn save_profile(&self, profile: &UserProfile) -> Result<()>;

    /// Loads a profile by user ID
    fn load_profile(&self, id: &UserId) -> Result<UserProfile>;

    /// Loads all profiles
    fn load_all_profiles(&self) -> Result<Vec<UserProfile>>;

    /// Finds a profile by sign-in email, case-insensitive
    fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>>;
}

/// Combined repository trait
pub trait Repository:
    TicketRepository + TrashRepository + ProfileRepository + BatchCommit
{
}

/// Implementation of Repository for types that implement all parts
impl<T> Repository for T where
    T: TicketRepository + TrashRepository + ProfileRepository + BatchCommit
{
}

use super::file::FileStorage;

impl TicketRepository for FileStorage {
    fn save(&self, ticket: &Ticket) -> Result<()> {
        self.save_ticket(ticket)
    }

    fn load(&self, id: &TicketId) -> Result<Ticket> {
        self.load_ticket(id)
    }

    fn load_all(&self) -> Result<Vec<Ticket>> {
        self.load_all_tickets()
    }

    fn delete(&self, id: &TicketId) -> Result<()> {
        self.delete_ticket(id)
    }

    fn exists(&self, id: &TicketId) -> bool {
        self.ticket_exists(id)
    }

    fn find<F>(&self, predicate: F) -> Result<Vec<Ticket>>
    where
        F: Fn(&Ticket) -> bool,
    {
        let tickets = self.load_all_tickets()?;
        Ok(tickets.into_iter().filter(predicate).collect())
    }

    fn count<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&Ticket) -> bool,
    {
        let tickets = self.load_all_tickets()?;
        Ok(tickets.iter().filter(|t| predicate(t)).count())
    }
}

impl TrashRepository for FileStorage {
    fn save_trashed(&self, trashed: &TrashedTicket) -> Result<()> {
        Self::save_trashed(self, trashed)
    }

    fn load_trashed(&self, id: &TicketId) -> Result<TrashedTicket> {
        Self::load_trashed(self, id)
    }

    fn load_all_trashed(&self) -> Result<Vec<TrashedTicket>> {
        Self::load_all_trashed(self)
    }

    fn delete_trashed(&self, id: &TicketId) -> Result<()> {
        Self::delete_trashed(self, id)
    }

    fn trashed_exists(&self, id: &TicketId) -> bool {
        Self::trashed_exists(self, id)
    }
}

impl ProfileRepository for FileStorage {
    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        Self::save_profile(self, profile)
    }

    fn load_profile(&self, id: &UserId) -> Result<UserProfile> {
        Self::load_profile(self, id)
    }

    fn load_all_profiles(&self) -> Result<Vec<UserProfile>> {
        Self::load_all_profiles(self)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        self.find_profile_by_email(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Priority, Status, TicketBuilder};
    use tempfile::TempDir;

    fn create_test_ticket(client: &str) -> Ticket {
        TicketBuilder::new()
            .client(client)
            .description(format!("Test issue for {client}"))
            .build()
    }

    fn storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::init(temp_dir.path().join(".ticketdesk")).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_ticket_repository_save_and_load() {
        let (_temp, storage) = storage();
        let ticket = create_test_ticket("Acme");
        let id = ticket.id.clone();

        storage.save(&ticket).expect("Failed to save ticket");

        let loaded = storage.load(&id).expect("Failed to load ticket");
        assert_eq!(loaded.id, ticket.id);
        assert_eq!(loaded.client, ticket.client);
    }

    #[test]
    fn test_ticket_repository_load_all() {
        let (_temp, storage) = storage();

        let tickets: Vec<_> = (0..3)
            .map(|i| create_test_ticket(&format!("Client {i}")))
            .collect();

        for ticket in &tickets {
            storage.save(ticket).expect("Failed to save ticket");
        }

        let loaded = storage.load_all().expect("Failed to load all tickets");
        assert_eq!(loaded.len(), 3);
    }

    #[test]
    fn test_ticket_repository_delete() {
        let (_temp, storage) = storage();
        let ticket = create_test_ticket("Acme");
        let id = ticket.id.clone();

        storage.save(&ticket).expect("Failed to save ticket");
        assert!(storage.exists(&id));

        storage.delete(&id).expect("Failed to delete ticket");
        assert!(!storage.exists(&id));
    }

    #[test]
    fn test_ticket_repository_find_and_count() {
        let (_temp, storage) = storage();

        let mut urgent = create_test_ticket("Acme");
        urgent.priority = Priority::Urgent;

        let mut low = create_test_ticket("Globex");
        low.priority = Priority::Low;
        low.status = Status::Closed;

        storage.save(&urgent).expect("Failed to save ticket");
        storage.save(&low).expect("Failed to save ticket");

        let found = storage
            .find(|t| t.priority == Priority::Urgent)
            .expect("Failed to find tickets");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].client, "Acme");

        let open_count = storage
            .count(|t| t.status != Status::Closed)
            .expect("Failed to count tickets");
        assert_eq!(open_count, 1);
    }
}
