//! Client-side filter, sort, and search over an in-memory ticket list
//!
//! Everything here is a linear scan and a comparator: the list views load a
//! whole collection and shape it locally.

use crate::core::{Priority, Status, Ticket};
use crate::error::{Result, TicketDeskError};
use regex::Regex;

/// A search term, either a plain case-insensitive substring or a regex
#[derive(Debug, Clone)]
pub enum SearchTerm {
    Plain(String),
    Pattern(Regex),
}

impl SearchTerm {
    /// Build a search term; `use_regex` compiles the input as a pattern
    pub fn new(term: &str, use_regex: bool) -> Result<Self> {
        if use_regex {
            let pattern = Regex::new(term)
                .map_err(|e| TicketDeskError::custom(format!("Invalid search pattern: {e}")))?;
            Ok(Self::Pattern(pattern))
        } else {
            Ok(Self::Plain(term.to_lowercase()))
        }
    }

    fn matches_text(&self, text: &str) -> bool {
        match self {
            Self::Plain(term) => text.to_lowercase().contains(term),
            Self::Pattern(pattern) => pattern.is_match(text),
        }
    }

    /// Whether any searchable field of the ticket matches
    ///
    /// Searches the same fields the list view displays: client, description,
    /// cross-reference numbers, team member, and technician.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.matches_text(&ticket.client) || self.matches_text(&ticket.description) {
            return true;
        }
        if ticket
            .references
            .values()
            .any(|number| self.matches_text(number))
        {
            return true;
        }
        [&ticket.team_member, &ticket.technician]
            .into_iter()
            .flatten()
            .any(|field| self.matches_text(field))
    }
}

/// Sort options for ticket lists
#[derive(Debug, Clone, Copy, Default)]
pub enum SortBy {
    #[default]
    Created,
    Client,
    Status,
    Priority,
    IssueEnded,
}

impl std::str::FromStr for SortBy {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "client" => Ok(Self::Client),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "ended" | "issue-ended" => Ok(Self::IssueEnded),
            _ => Err(TicketDeskError::custom(format!(
                "Invalid sort key: {s}. Valid values: created, client, status, priority, ended"
            ))),
        }
    }
}

/// Combined filter/sort/search applied to a loaded ticket list
#[derive(Debug, Clone, Default)]
pub struct TicketQuery {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub team_member: Option<String>,
    pub search: Option<SearchTerm>,
    pub sort_by: SortBy,
    pub reverse: bool,
    pub limit: Option<usize>,
}

impl TicketQuery {
    /// Apply all filters, the sort, and the limit
    #[must_use]
    pub fn apply(&self, tickets: Vec<Ticket>) -> Vec<Ticket> {
        let filtered: Vec<Ticket> = tickets
            .into_iter()
            .filter(|ticket| self.matches(ticket))
            .collect();

        let mut sorted = self.sort(filtered);
        if let Some(limit) = self.limit {
            sorted.truncate(limit);
        }
        sorted
    }

    /// Check if a ticket matches all filter criteria
    fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if ticket.priority != priority {
                return false;
            }
        }
        if let Some(ref member) = self.team_member {
            let matches = ticket
                .team_member
                .as_ref()
                .is_some_and(|m| m.to_lowercase().contains(&member.to_lowercase()));
            if !matches {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            if !search.matches(ticket) {
                return false;
            }
        }
        true
    }

    /// Sort tickets according to sort criteria
    ///
    /// Missing values (un-ended tickets under the `ended` key) always sort
    /// last regardless of direction, matching how the list view renders them.
    fn sort(&self, mut tickets: Vec<Ticket>) -> Vec<Ticket> {
        tickets.sort_by(|a, b| {
            let ordering = match self.sort_by {
                SortBy::Created => a.created_at.cmp(&b.created_at),
                SortBy::Client => a.client.cmp(&b.client),
                SortBy::Status => a.status.cmp(&b.status),
                // Higher priority first
                SortBy::Priority => b.priority.cmp(&a.priority),
                SortBy::IssueEnded => {
                    return match (a.issue_ended_at, b.issue_ended_at) {
                        (None, None) => std::cmp::Ordering::Equal,
                        (None, Some(_)) => std::cmp::Ordering::Greater,
                        (Some(_), None) => std::cmp::Ordering::Less,
                        (Some(x), Some(y)) => {
                            let ord = x.cmp(&y);
                            if self.reverse { ord.reverse() } else { ord }
                        },
                    };
                },
            };
            if self.reverse { ordering.reverse() } else { ordering }
        });
        tickets
    }
}
