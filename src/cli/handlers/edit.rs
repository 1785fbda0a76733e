//! `edit` command: merge field changes into a ticket

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::cli::utils::{parse_reference, parse_timestamp};
use crate::core::{Priority, Status};
use crate::error::Result;
use crate::lifecycle::TicketChanges;
use std::collections::HashMap;

#[allow(clippy::too_many_arguments)]
pub fn handle_edit(
    ticket_ref: &str,
    client: Option<String>,
    site: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    team_member: Option<String>,
    technician: Option<String>,
    technician_phone: Option<String>,
    references: &[String],
    notes: Option<String>,
    ended: Option<String>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let acting = ctx.current_user()?;
    let id = ctx.resolve_ticket(ticket_ref)?;

    let mut reference_map = HashMap::new();
    for entry in references {
        let (system, number) = parse_reference(entry)?;
        reference_map.insert(system, number);
    }

    let changes = TicketChanges {
        client,
        site,
        description,
        status: status.as_deref().map(str::parse::<Status>).transpose()?,
        priority: priority.as_deref().map(str::parse::<Priority>).transpose()?,
        team_member,
        technician,
        technician_phone,
        references: reference_map,
        notes,
        issue_ended_at: ended.as_deref().map(parse_timestamp).transpose()?,
        ..TicketChanges::default()
    };

    let updated = ctx.lifecycle().update(&id, changes, &acting)?;
    if output.is_json() {
        output.print_json(&updated)?;
    } else {
        output.success(&format!("Updated ticket {}", updated.id.short()));
        if updated.is_closed() {
            output.info("Ticket is now closed");
        }
    }
    Ok(())
}
