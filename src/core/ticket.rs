//! Ticket domain types
//!
//! A [`Ticket`] is one reported issue for a client site. Tickets live in the
//! active set until an admin soft-deletes them into the trash set (becoming a
//! [`TrashedTicket`]), from which they are either restored or permanently
//! erased. A ticket is never in both sets at once.

use crate::core::UserId;
use crate::error::{Result, TicketDeskError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a ticket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Generate a new random ticket ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a ticket ID from its string form
    pub fn parse_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TicketDeskError::custom(format!("Invalid ticket ID: {s}")))
    }

    /// Short prefix for display in lists
    #[must_use]
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Newly reported, no work started
    #[default]
    Open,
    /// Being worked on
    InProgress,
    /// Formally closed in-system
    Closed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Status {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in-progress" | "in_progress" | "inprogress" | "doing" => Ok(Self::InProgress),
            "closed" | "done" => Ok(Self::Closed),
            _ => Err(TicketDeskError::custom(format!(
                "Invalid status: {s}. Valid values: open, in-progress, closed"
            ))),
        }
    }
}

/// Ticket priority, ordered low to urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Priority {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" | "critical" => Ok(Self::Urgent),
            _ => Err(TicketDeskError::custom(format!(
                "Invalid priority: {s}. Valid values: low, medium, high, urgent"
            ))),
        }
    }
}

/// One reported issue
///
/// The cross-reference numbers that apply to a ticket depend on the site
/// (Fiix, PCS, customer-supplied numbers), so they live in an open
/// `references` map instead of fixed columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier, assigned on creation
    pub id: TicketId,
    /// Client name (required)
    pub client: String,
    /// Client site / location
    #[serde(default)]
    pub site: Option<String>,
    /// Free-text description of the issue (required)
    pub description: String,
    /// Current status
    pub status: Status,
    /// Priority level
    pub priority: Priority,
    /// Team member the ticket is assigned to
    #[serde(default)]
    pub team_member: Option<String>,
    /// On-site technician name
    #[serde(default)]
    pub technician: Option<String>,
    /// On-site technician phone
    #[serde(default)]
    pub technician_phone: Option<String>,
    /// External cross-reference numbers, keyed by system name
    #[serde(default)]
    pub references: HashMap<String, String>,
    /// Additional free-text notes
    #[serde(default)]
    pub notes: Option<String>,
    /// When the record was created; set once, never edited
    pub created_at: DateTime<Utc>,
    /// When the reported issue began
    pub issue_started_at: DateTime<Utc>,
    /// When the issue was resolved on-site, if it has been
    #[serde(default)]
    pub issue_ended_at: Option<DateTime<Utc>>,
    /// When the ticket was formally closed in-system; paired with `closed_by`
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Who closed the ticket; paired with `closed_at`
    #[serde(default)]
    pub closed_by: Option<UserId>,
    /// Creating user's id; set once, never edited
    pub author_id: UserId,
    /// Creating user's email; set once, never edited
    pub author_email: String,
}

impl Ticket {
    /// Whether the ticket has been formally closed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == Status::Closed
    }

    /// Elapsed time of the issue
    ///
    /// Grows with the wall clock while `issue_ended_at` is unset; frozen at
    /// `issue_ended_at - issue_started_at` once the end time is recorded.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Utc::now())
    }

    /// Elapsed time as observed at `now`; split out so tests can pin the clock
    #[must_use]
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        match self.issue_ended_at {
            Some(end) => end - self.issue_started_at,
            None => now - self.issue_started_at,
        }
    }

    /// Check the ticket's internal invariants
    ///
    /// Required fields are present and the issue end time, when recorded, is
    /// not before the start time. `closed_at`/`closed_by` pairing is enforced
    /// by the lifecycle manager, not here, because a half-stamped record must
    /// never be constructed in the first place.
    pub fn validate(&self) -> Result<()> {
        if self.client.trim().is_empty() {
            return Err(TicketDeskError::validation("client is required"));
        }
        if self.description.trim().is_empty() {
            return Err(TicketDeskError::validation("description is required"));
        }
        if let Some(end) = self.issue_ended_at {
            if end < self.issue_started_at {
                return Err(TicketDeskError::validation(
                    "issue end time cannot be before the start time",
                ));
            }
        }
        Ok(())
    }
}

/// A soft-deleted ticket, living in the trash set
///
/// Produced only by moving a [`Ticket`] out of the active set; consumed by
/// restoring it (which drops `deleted_at`) or by permanent erasure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrashedTicket {
    /// The full ticket as it was at deletion time
    #[serde(flatten)]
    pub ticket: Ticket,
    /// When the ticket was moved to trash
    pub deleted_at: DateTime<Utc>,
}

impl TrashedTicket {
    /// Wrap a ticket for the trash set
    #[must_use]
    pub fn new(ticket: Ticket, deleted_at: DateTime<Utc>) -> Self {
        Self { ticket, deleted_at }
    }

    /// Unwrap back into an active ticket, dropping `deleted_at`
    #[must_use]
    pub fn into_ticket(self) -> Ticket {
        self.ticket
    }
}

/// Format a duration as a short human-readable string, e.g. "3h 02m 11s"
#[must_use]
pub fn format_elapsed(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketBuilder;

    #[test]
    fn test_status_round_trip() {
        for s in ["open", "in-progress", "closed"] {
            let status: Status = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!("bogus".parse::<Status>().is_err());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_elapsed_frozen_after_end() {
        let start = Utc::now() - Duration::hours(2);
        let end = start + Duration::minutes(30);
        let ticket = TicketBuilder::new()
            .client("Acme")
            .description("Inverter fault")
            .issue_started_at(start)
            .issue_ended_at(end)
            .build();

        let now = Utc::now();
        assert_eq!(ticket.elapsed_at(now), Duration::minutes(30));
        assert_eq!(
            ticket.elapsed_at(now + Duration::seconds(10)),
            Duration::minutes(30)
        );
    }

    #[test]
    fn test_elapsed_grows_while_open() {
        let start = Utc::now();
        let ticket = TicketBuilder::new()
            .client("Acme")
            .description("Inverter fault")
            .issue_started_at(start)
            .build();

        let t1 = ticket.elapsed_at(start + Duration::seconds(1));
        let t2 = ticket.elapsed_at(start + Duration::seconds(2));
        assert!(t2 > t1);
    }

    #[test]
    fn test_validate_requires_client_and_description() {
        let ticket = TicketBuilder::new().description("something broke").build();
        assert!(matches!(
            ticket.validate(),
            Err(TicketDeskError::Validation(_))
        ));

        let ticket = TicketBuilder::new().client("Acme").build();
        assert!(matches!(
            ticket.validate(),
            Err(TicketDeskError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let start = Utc::now();
        let ticket = TicketBuilder::new()
            .client("Acme")
            .description("Inverter fault")
            .issue_started_at(start)
            .issue_ended_at(start - Duration::minutes(1))
            .build();
        assert!(ticket.validate().is_err());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::seconds(42)), "42s");
        assert_eq!(format_elapsed(Duration::seconds(125)), "2m 05s");
        assert_eq!(format_elapsed(Duration::seconds(7331)), "2h 02m 11s");
    }
}
