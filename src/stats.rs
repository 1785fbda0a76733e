//! Dashboard aggregation over the active ticket list

use crate::core::{Priority, Ticket, format_elapsed};
use chrono::Duration;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate counts for the dashboard view
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    /// High or urgent tickets that are not yet closed
    pub high_priority_open: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    /// Average issue duration across tickets with a recorded end, in seconds
    pub avg_resolution_seconds: Option<i64>,
}

impl DashboardStats {
    /// Compute stats from a loaded ticket list
    #[must_use]
    pub fn compute(tickets: &[Ticket]) -> Self {
        let mut by_status = BTreeMap::new();
        let mut by_priority = BTreeMap::new();
        let mut open = 0;
        let mut closed = 0;
        let mut high_priority_open = 0;
        let mut resolved_total = Duration::zero();
        let mut resolved_count = 0i64;

        for ticket in tickets {
            *by_status.entry(ticket.status.to_string()).or_insert(0) += 1;
            *by_priority.entry(ticket.priority.to_string()).or_insert(0) += 1;

            if ticket.is_closed() {
                closed += 1;
            } else {
                open += 1;
                if ticket.priority >= Priority::High {
                    high_priority_open += 1;
                }
            }

            if let Some(end) = ticket.issue_ended_at {
                resolved_total += end - ticket.issue_started_at;
                resolved_count += 1;
            }
        }

        let avg_resolution_seconds = (resolved_count > 0)
            .then(|| resolved_total.num_seconds() / resolved_count);

        Self {
            total: tickets.len(),
            open,
            closed,
            high_priority_open,
            by_status,
            by_priority,
            avg_resolution_seconds,
        }
    }

    /// Average resolution time as a display string, if any ticket resolved
    #[must_use]
    pub fn avg_resolution_display(&self) -> Option<String> {
        self.avg_resolution_seconds
            .map(|secs| format_elapsed(Duration::seconds(secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Status, TicketBuilder};
    use chrono::Utc;

    #[test]
    fn test_compute() {
        let start = Utc::now();
        let tickets = vec![
            TicketBuilder::new()
                .client("Acme")
                .description("a")
                .status(Status::Open)
                .priority(Priority::Urgent)
                .build(),
            TicketBuilder::new()
                .client("Globex")
                .description("b")
                .status(Status::InProgress)
                .priority(Priority::Low)
                .build(),
            TicketBuilder::new()
                .client("Initech")
                .description("c")
                .status(Status::Closed)
                .priority(Priority::High)
                .issue_started_at(start)
                .issue_ended_at(start + Duration::minutes(30))
                .build(),
        ];

        let stats = DashboardStats::compute(&tickets);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.open, 2);
        assert_eq!(stats.closed, 1);
        // the urgent open ticket counts; the closed high one does not
        assert_eq!(stats.high_priority_open, 1);
        assert_eq!(stats.by_status.get("open"), Some(&1));
        assert_eq!(stats.by_priority.get("low"), Some(&1));
        assert_eq!(stats.avg_resolution_seconds, Some(1800));
        assert_eq!(stats.avg_resolution_display().as_deref(), Some("30m 00s"));
    }

    #[test]
    fn test_compute_empty() {
        let stats = DashboardStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.avg_resolution_seconds.is_none());
    }
}
