use super::{Priority, Status, Ticket, TicketId, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Builder for creating Ticket instances
#[derive(Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    client: Option<String>,
    site: Option<String>,
    description: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    team_member: Option<String>,
    technician: Option<String>,
    technician_phone: Option<String>,
    references: HashMap<String, String>,
    notes: Option<String>,
    created_at: Option<DateTime<Utc>>,
    issue_started_at: Option<DateTime<Utc>>,
    issue_ended_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    closed_by: Option<UserId>,
    author_id: Option<UserId>,
    author_email: Option<String>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket ID
    #[must_use]
    pub fn id(mut self, id: TicketId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the client name
    #[must_use]
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Set the client site
    #[must_use]
    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the assigned team member
    #[must_use]
    pub fn team_member(mut self, team_member: impl Into<String>) -> Self {
        self.team_member = Some(team_member.into());
        self
    }

    /// Set the technician name
    #[must_use]
    pub fn technician(mut self, technician: impl Into<String>) -> Self {
        self.technician = Some(technician.into());
        self
    }

    /// Set the technician phone
    #[must_use]
    pub fn technician_phone(mut self, phone: impl Into<String>) -> Self {
        self.technician_phone = Some(phone.into());
        self
    }

    /// Add a cross-reference number
    #[must_use]
    pub fn reference(mut self, system: impl Into<String>, number: impl Into<String>) -> Self {
        self.references.insert(system.into(), number.into());
        self
    }

    /// Set all cross-reference numbers
    #[must_use]
    pub fn references(mut self, references: HashMap<String, String>) -> Self {
        self.references = references;
        self
    }

    /// Set free-text notes
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set `created_at` timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set `issue_started_at` timestamp
    #[must_use]
    pub const fn issue_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.issue_started_at = Some(started_at);
        self
    }

    /// Set `issue_ended_at` timestamp
    #[must_use]
    pub const fn issue_ended_at(mut self, ended_at: DateTime<Utc>) -> Self {
        self.issue_ended_at = Some(ended_at);
        self
    }

    /// Set `closed_at` and `closed_by` together
    #[must_use]
    pub fn closed(mut self, closed_at: DateTime<Utc>, closed_by: UserId) -> Self {
        self.closed_at = Some(closed_at);
        self.closed_by = Some(closed_by);
        self
    }

    /// Set the author
    #[must_use]
    pub fn author(mut self, author_id: UserId, author_email: impl Into<String>) -> Self {
        self.author_id = Some(author_id);
        self.author_email = Some(author_email.into());
        self
    }

    /// Build the ticket
    pub fn build(self) -> Ticket {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        Ticket {
            id: self.id.unwrap_or_default(),
            client: self.client.unwrap_or_default(),
            site: self.site,
            description: self.description.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            team_member: self.team_member,
            technician: self.technician,
            technician_phone: self.technician_phone,
            references: self.references,
            notes: self.notes,
            created_at,
            issue_started_at: self.issue_started_at.unwrap_or(created_at),
            issue_ended_at: self.issue_ended_at,
            closed_at: self.closed_at,
            closed_by: self.closed_by,
            author_id: self.author_id.unwrap_or_default(),
            author_email: self.author_email.unwrap_or_default(),
        }
    }
}
