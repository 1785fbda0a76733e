//! Ticket lifecycle manager
//!
//! Mediates every transition a ticket can undergo between the active set,
//! the trash set, and erasure, and enforces the authorization gates:
//!
//! ```text
//!         create
//!           │
//!           ▼
//!       [ACTIVE] ──update──► [ACTIVE]
//!           │
//!           │ soft delete (admin, after password re-proof)
//!           ▼
//!       [TRASHED] ──restore──► [ACTIVE]
//!           │
//!           │ permanent delete (admin, after password re-proof)
//!           ▼
//!       [ERASED]
//! ```
//!
//! Destructive transitions go through a two-phase pattern: a
//! [`PendingDeletion`] is staged by [`Lifecycle::request_delete`] and consumed
//! exactly once by [`Lifecycle::confirm_delete`], which checks the admin role,
//! then re-proves the acting user's password, and only then mutates data.

use crate::auth::Authenticator;
use crate::core::{Status, Ticket, TicketBuilder, TicketId, TrashedTicket, UserId, UserProfile};
use crate::error::{Result, TicketDeskError};
use crate::storage::{Batch, Repository};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Fields supplied when creating a ticket
#[derive(Debug, Clone, Default)]
pub struct TicketDraft {
    pub client: String,
    pub site: Option<String>,
    pub description: String,
    pub status: Status,
    pub priority: crate::core::Priority,
    pub team_member: Option<String>,
    pub technician: Option<String>,
    pub technician_phone: Option<String>,
    pub references: HashMap<String, String>,
    pub notes: Option<String>,
    /// Defaults to "now" when not supplied
    pub issue_started_at: Option<DateTime<Utc>>,
}

/// Field changes merged into an existing ticket by [`Lifecycle::update`]
///
/// `created_at`, `issue_started_at` and authorship are immutable and have no
/// counterpart here. `closed_at`/`closed_by` are only honored together, and
/// only on a transition into Closed.
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub client: Option<String>,
    pub site: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<crate::core::Priority>,
    pub team_member: Option<String>,
    pub technician: Option<String>,
    pub technician_phone: Option<String>,
    /// Inserted into the ticket's reference map, overwriting per key
    pub references: HashMap<String, String>,
    pub notes: Option<String>,
    pub issue_ended_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by: Option<UserId>,
}

/// A staged destructive operation, constructed on request and consumed
/// exactly once on confirm (or dropped on cancel)
#[derive(Debug)]
pub struct PendingDeletion {
    ticket_ids: Vec<TicketId>,
    permanent: bool,
    requested_by: UserId,
}

impl PendingDeletion {
    /// Ids staged for deletion
    #[must_use]
    pub fn ticket_ids(&self) -> &[TicketId] {
        &self.ticket_ids
    }

    /// Whether this request erases from trash rather than moving to it
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        self.permanent
    }

    /// Who staged the request
    #[must_use]
    pub fn requested_by(&self) -> &UserId {
        &self.requested_by
    }
}

/// Ticket lifecycle manager over a repository
pub struct Lifecycle<'a, S> {
    store: &'a S,
}

impl<'a, S: Repository> Lifecycle<'a, S> {
    /// Create a lifecycle manager over the given store
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Insert a new ticket into the active set
    ///
    /// Requires only an authenticated author. Creation and issue-start
    /// timestamps are stamped here; issue-start falls back to "now" when the
    /// draft leaves it unset.
    pub fn create(&self, draft: TicketDraft, author: &UserProfile) -> Result<Ticket> {
        let now = Utc::now();
        let mut builder = TicketBuilder::new()
            .client(draft.client)
            .description(draft.description)
            .status(draft.status)
            .priority(draft.priority)
            .references(draft.references)
            .created_at(now)
            .issue_started_at(draft.issue_started_at.unwrap_or(now))
            .author(author.id.clone(), author.email.clone());
        if let Some(site) = draft.site {
            builder = builder.site(site);
        }
        if let Some(team_member) = draft.team_member {
            builder = builder.team_member(team_member);
        }
        if let Some(technician) = draft.technician {
            builder = builder.technician(technician);
        }
        if let Some(phone) = draft.technician_phone {
            builder = builder.technician_phone(phone);
        }
        if let Some(notes) = draft.notes {
            builder = builder.notes(notes);
        }
        let ticket = builder.build();
        ticket.validate()?;
        self.store.save(&ticket)?;
        tracing::info!(id = %ticket.id, client = %ticket.client, "ticket created");
        Ok(ticket)
    }

    /// Merge changes into an existing active ticket
    ///
    /// Only the ticket's author or an admin may edit. A status transition
    /// into Closed stamps `closed_at`/`closed_by` (unless the caller supplied
    /// both) and records the issue end time if it is still missing; a
    /// transition out of Closed clears all three. The write either fully
    /// applies or, on any validation failure, does not apply at all.
    pub fn update(
        &self,
        id: &TicketId,
        changes: TicketChanges,
        acting: &UserProfile,
    ) -> Result<Ticket> {
        let current = self.store.load(id)?;
        if !acting.can_edit(&current.author_id) {
            return Err(TicketDeskError::permission(
                "only the ticket's author or an admin may edit it",
            ));
        }

        let was_closed = current.is_closed();
        let mut updated = current;

        if let Some(client) = changes.client {
            updated.client = client;
        }
        if let Some(site) = changes.site {
            updated.site = Some(site);
        }
        if let Some(description) = changes.description {
            updated.description = description;
        }
        if let Some(status) = changes.status {
            updated.status = status;
        }
        if let Some(priority) = changes.priority {
            updated.priority = priority;
        }
        if let Some(team_member) = changes.team_member {
            updated.team_member = Some(team_member);
        }
        if let Some(technician) = changes.technician {
            updated.technician = Some(technician);
        }
        if let Some(phone) = changes.technician_phone {
            updated.technician_phone = Some(phone);
        }
        for (system, number) in changes.references {
            updated.references.insert(system, number);
        }
        if let Some(notes) = changes.notes {
            updated.notes = Some(notes);
        }
        if let Some(ended) = changes.issue_ended_at {
            updated.issue_ended_at = Some(ended);
        }

        if updated.is_closed() && !was_closed {
            let now = Utc::now();
            match (changes.closed_at, changes.closed_by) {
                (Some(at), Some(by)) => {
                    updated.closed_at = Some(at);
                    updated.closed_by = Some(by);
                },
                _ => {
                    updated.closed_at = Some(now);
                    updated.closed_by = Some(acting.id.clone());
                },
            }
            if updated.issue_ended_at.is_none() {
                updated.issue_ended_at = Some(now);
            }
        } else if !updated.is_closed() && was_closed {
            updated.closed_at = None;
            updated.closed_by = None;
            updated.issue_ended_at = None;
        }

        updated.validate()?;
        self.store.save(&updated)?;
        Ok(updated)
    }

    /// Stage a soft or permanent deletion without performing it
    pub fn request_delete(
        &self,
        ticket_ids: Vec<TicketId>,
        permanent: bool,
        acting: &UserProfile,
    ) -> PendingDeletion {
        PendingDeletion {
            ticket_ids,
            permanent,
            requested_by: acting.id.clone(),
        }
    }

    /// Consume a staged deletion after re-proving the acting user's password
    ///
    /// The admin check runs before re-authentication is attempted; a failed
    /// re-proof aborts with no data mutation. Returns how many tickets were
    /// affected.
    pub fn confirm_delete(
        &self,
        pending: PendingDeletion,
        password: &str,
        acting: &UserProfile,
        auth: &Authenticator<'_>,
    ) -> Result<usize> {
        if !acting.role.is_admin() {
            return Err(TicketDeskError::permission(
                "only an admin may delete tickets",
            ));
        }
        auth.reauthenticate(acting, password)?;
        if pending.permanent {
            self.permanent_delete(&pending.ticket_ids)
        } else {
            self.soft_delete(&pending.ticket_ids)
        }
    }

    /// Move tickets from the active set into the trash set
    ///
    /// Every resolved id is copied to trash with `deleted_at = now` and
    /// removed from the active set in one atomic batch; ids not present in
    /// the active set are silently skipped. Any other load failure (an
    /// unreadable or corrupt document) aborts before the batch is committed.
    /// Returns how many were moved.
    pub fn soft_delete(&self, ticket_ids: &[TicketId]) -> Result<usize> {
        let now = Utc::now();
        let mut batch = Batch::new();
        let mut moved = 0;
        for id in ticket_ids {
            let ticket = match self.store.load(id) {
                Ok(ticket) => ticket,
                Err(TicketDeskError::TicketNotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            batch.put_trashed(TrashedTicket::new(ticket, now));
            batch.remove_ticket(id.clone());
            moved += 1;
        }
        self.store.commit_batch(batch)?;
        tracing::info!(count = moved, "tickets moved to trash");
        Ok(moved)
    }

    /// Erase tickets from the trash set
    ///
    /// An id still present in the active set means an earlier soft delete
    /// was violated upstream; it is logged and skipped, never erased from
    /// the active set. Ids absent from trash are a no-op.
    pub fn permanent_delete(&self, ticket_ids: &[TicketId]) -> Result<usize> {
        let mut batch = Batch::new();
        let mut erased = 0;
        for id in ticket_ids {
            if self.store.exists(id) {
                tracing::warn!(
                    %id,
                    "permanent delete requested for a ticket still in the active set; skipping"
                );
                continue;
            }
            if self.store.trashed_exists(id) {
                batch.remove_trashed(id.clone());
                erased += 1;
            }
        }
        self.store.commit_batch(batch)?;
        tracing::info!(count = erased, "tickets permanently deleted");
        Ok(erased)
    }

    /// Move a ticket from the trash set back into the active set
    ///
    /// Drops `deleted_at`; all other fields come back exactly as they were.
    /// A no-op returning `None` when the id is not in trash. No
    /// re-authentication: restoring recovers data rather than destroying it.
    pub fn restore(&self, id: &TicketId) -> Result<Option<Ticket>> {
        if !self.store.trashed_exists(id) {
            return Ok(None);
        }
        let trashed = self.store.load_trashed(id)?;
        let ticket = trashed.into_ticket();

        let mut batch = Batch::new();
        batch.put_ticket(ticket.clone());
        batch.remove_trashed(id.clone());
        self.store.commit_batch(batch)?;
        tracing::info!(%id, "ticket restored from trash");
        Ok(Some(ticket))
    }

    /// Close a ticket directly, without the general update path
    ///
    /// Available to any authenticated user on a ticket that is not already
    /// closed, but only once the issue end time has been recorded (via
    /// [`Lifecycle::update`]); closing an issue whose end was never logged is
    /// a validation error.
    pub fn close(&self, id: &TicketId, acting: &UserProfile) -> Result<Ticket> {
        let mut ticket = self.store.load(id)?;
        if ticket.is_closed() {
            return Err(TicketDeskError::validation("ticket is already closed"));
        }
        if ticket.issue_ended_at.is_none() {
            return Err(TicketDeskError::validation(
                "record the issue end time before closing",
            ));
        }
        ticket.status = Status::Closed;
        ticket.closed_at = Some(Utc::now());
        ticket.closed_by = Some(acting.id.clone());
        self.store.save(&ticket)?;
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Priority;
    use crate::storage::TicketRepository;
    use crate::test_utils::{TEST_PASSWORD, TestProject};

    fn fixture() -> TestProject {
        TestProject::new()
    }

    fn draft(client: &str) -> TicketDraft {
        TicketDraft {
            client: client.to_string(),
            description: format!("Issue reported by {client}"),
            ..TicketDraft::default()
        }
    }

    #[test]
    fn test_create_stamps_timestamps() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);

        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();
        assert_eq!(ticket.author_id, fx.user.id);
        assert_eq!(ticket.author_email, fx.user.email);
        assert!(ticket.closed_at.is_none());
        assert_eq!(ticket.issue_started_at, ticket.created_at);
        assert!(fx.storage.exists(&ticket.id));
    }

    #[test]
    fn test_create_rejects_missing_required_fields() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);

        let mut empty_client = draft("Acme");
        empty_client.client = String::new();
        assert!(matches!(
            lifecycle.create(empty_client, &fx.user),
            Err(TicketDeskError::Validation(_))
        ));

        let mut empty_description = draft("Acme");
        empty_description.description = String::new();
        assert!(matches!(
            lifecycle.create(empty_description, &fx.user),
            Err(TicketDeskError::Validation(_))
        ));
    }

    #[test]
    fn test_update_permission_gate() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);

        // user2 is neither admin nor the author
        let auth = Authenticator::new(&fx.storage);
        let user2 = auth
            .sign_up("other@example.com", TEST_PASSWORD, "Other")
            .unwrap();

        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();
        let changes = TicketChanges {
            priority: Some(Priority::High),
            ..TicketChanges::default()
        };

        let err = lifecycle
            .update(&ticket.id, changes.clone(), &user2)
            .unwrap_err();
        assert!(matches!(err, TicketDeskError::PermissionDenied(_)));

        // stored ticket unchanged
        let stored = fx.storage.load(&ticket.id).unwrap();
        assert_eq!(stored, ticket);

        // author and admin both may edit
        assert!(lifecycle.update(&ticket.id, changes.clone(), &fx.user).is_ok());
        assert!(lifecycle.update(&ticket.id, changes, &fx.admin).is_ok());
    }

    #[test]
    fn test_update_unknown_id() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let err = lifecycle
            .update(&TicketId::new(), TicketChanges::default(), &fx.admin)
            .unwrap_err();
        assert!(matches!(err, TicketDeskError::TicketNotFound { .. }));
    }

    #[test]
    fn test_close_stamping_on_update() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();

        let before = Utc::now();
        let closed = lifecycle
            .update(
                &ticket.id,
                TicketChanges {
                    status: Some(Status::Closed),
                    ..TicketChanges::default()
                },
                &fx.user,
            )
            .unwrap();

        assert!(closed.closed_at.unwrap() >= before);
        assert_eq!(closed.closed_by, Some(fx.user.id.clone()));
        assert!(closed.issue_ended_at.is_some());

        // transitioning back out of Closed clears the stamps together
        let reopened = lifecycle
            .update(
                &ticket.id,
                TicketChanges {
                    status: Some(Status::InProgress),
                    ..TicketChanges::default()
                },
                &fx.user,
            )
            .unwrap();
        assert!(reopened.closed_at.is_none());
        assert!(reopened.closed_by.is_none());
        assert!(reopened.issue_ended_at.is_none());
    }

    #[test]
    fn test_close_stamping_respects_caller_supplied_pair() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();

        let supplied_at = Utc::now() - chrono::Duration::hours(1);
        let closed = lifecycle
            .update(
                &ticket.id,
                TicketChanges {
                    status: Some(Status::Closed),
                    closed_at: Some(supplied_at),
                    closed_by: Some(fx.admin.id.clone()),
                    ..TicketChanges::default()
                },
                &fx.user,
            )
            .unwrap();
        assert_eq!(closed.closed_at, Some(supplied_at));
        assert_eq!(closed.closed_by, Some(fx.admin.id.clone()));
    }

    #[test]
    fn test_update_rejects_end_before_start() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();

        let err = lifecycle
            .update(
                &ticket.id,
                TicketChanges {
                    issue_ended_at: Some(ticket.issue_started_at - chrono::Duration::minutes(5)),
                    ..TicketChanges::default()
                },
                &fx.user,
            )
            .unwrap_err();
        assert!(matches!(err, TicketDeskError::Validation(_)));

        let stored = fx.storage.load(&ticket.id).unwrap();
        assert_eq!(stored, ticket);
    }

    #[test]
    fn test_soft_delete_moves_atomically() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let t1 = lifecycle.create(draft("Acme"), &fx.user).unwrap();
        let t2 = lifecycle.create(draft("Globex"), &fx.user).unwrap();

        let moved = lifecycle
            .soft_delete(&[t1.id.clone(), t2.id.clone(), TicketId::new()])
            .unwrap();
        assert_eq!(moved, 2);

        for id in [&t1.id, &t2.id] {
            assert!(!fx.storage.exists(id));
            assert!(fx.storage.trashed_exists(id));
        }
        let trashed = fx.storage.load_trashed(&t1.id).unwrap();
        assert_eq!(trashed.ticket, t1);
    }

    #[test]
    fn test_soft_delete_surfaces_corrupt_documents() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();

        let path = fx.storage.tickets_dir().join(format!("{}.yaml", ticket.id));
        std::fs::write(&path, "client: [unterminated").unwrap();

        let err = lifecycle
            .soft_delete(std::slice::from_ref(&ticket.id))
            .unwrap_err();
        assert!(matches!(err, TicketDeskError::Serialization(_)));
        assert!(!fx.storage.trashed_exists(&ticket.id));
    }

    #[test]
    fn test_restore_is_inverse_of_soft_delete() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let original = lifecycle.create(draft("Acme"), &fx.user).unwrap();

        lifecycle.soft_delete(std::slice::from_ref(&original.id)).unwrap();
        let restored = lifecycle.restore(&original.id).unwrap().unwrap();

        assert_eq!(restored, original);
        assert!(fx.storage.exists(&original.id));
        assert!(!fx.storage.trashed_exists(&original.id));
    }

    #[test]
    fn test_restore_unknown_id_is_noop() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        assert!(lifecycle.restore(&TicketId::new()).unwrap().is_none());
    }

    #[test]
    fn test_permanent_delete_is_terminal() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();
        let id = ticket.id.clone();

        lifecycle.soft_delete(std::slice::from_ref(&id)).unwrap();
        assert_eq!(lifecycle.permanent_delete(std::slice::from_ref(&id)).unwrap(), 1);

        assert!(!fx.storage.exists(&id));
        assert!(!fx.storage.trashed_exists(&id));

        // both operations are no-ops on an erased id
        assert!(lifecycle.restore(&id).unwrap().is_none());
        assert_eq!(lifecycle.permanent_delete(std::slice::from_ref(&id)).unwrap(), 0);
    }

    #[test]
    fn test_permanent_delete_skips_active_id() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();

        let erased = lifecycle
            .permanent_delete(std::slice::from_ref(&ticket.id))
            .unwrap();
        assert_eq!(erased, 0);
        assert!(fx.storage.exists(&ticket.id));
    }

    #[test]
    fn test_confirm_delete_gates() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let auth = Authenticator::new(&fx.storage);
        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();

        // non-admin fails before re-authentication is attempted
        let pending = lifecycle.request_delete(vec![ticket.id.clone()], false, &fx.user);
        let err = lifecycle
            .confirm_delete(pending, TEST_PASSWORD, &fx.user, &auth)
            .unwrap_err();
        assert!(matches!(err, TicketDeskError::PermissionDenied(_)));
        assert!(fx.storage.exists(&ticket.id));

        // wrong password aborts with no mutation
        let pending = lifecycle.request_delete(vec![ticket.id.clone()], false, &fx.admin);
        let err = lifecycle
            .confirm_delete(pending, "wrong", &fx.admin, &auth)
            .unwrap_err();
        assert!(matches!(err, TicketDeskError::AuthenticationFailed));
        assert!(fx.storage.exists(&ticket.id));
        assert!(!fx.storage.trashed_exists(&ticket.id));

        // correct password performs the soft delete
        let pending = lifecycle.request_delete(vec![ticket.id.clone()], false, &fx.admin);
        let moved = lifecycle
            .confirm_delete(pending, TEST_PASSWORD, &fx.admin, &auth)
            .unwrap();
        assert_eq!(moved, 1);
        assert!(!fx.storage.exists(&ticket.id));
        assert!(fx.storage.trashed_exists(&ticket.id));
    }

    #[test]
    fn test_close_requires_recorded_end_time() {
        let fx = fixture();
        let lifecycle = Lifecycle::new(&fx.storage);
        let ticket = lifecycle.create(draft("Acme"), &fx.user).unwrap();

        let err = lifecycle.close(&ticket.id, &fx.user).unwrap_err();
        assert!(matches!(err, TicketDeskError::Validation(_)));

        // record the end time via update, then close succeeds for any user
        lifecycle
            .update(
                &ticket.id,
                TicketChanges {
                    issue_ended_at: Some(Utc::now()),
                    ..TicketChanges::default()
                },
                &fx.user,
            )
            .unwrap();

        let closed = lifecycle.close(&ticket.id, &fx.admin).unwrap();
        assert_eq!(closed.status, Status::Closed);
        assert_eq!(closed.closed_by, Some(fx.admin.id.clone()));

        // closing twice is a validation error
        let err = lifecycle.close(&ticket.id, &fx.admin).unwrap_err();
        assert!(matches!(err, TicketDeskError::Validation(_)));
    }
}
