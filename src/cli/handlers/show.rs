//! `show` command: one ticket in full

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::core::{Ticket, format_elapsed};
use crate::error::Result;
use crate::storage::TicketRepository;

fn render_detail(ticket: &Ticket, output: &OutputFormatter) {
    output.info(&format!("Ticket:      {}", ticket.id));
    output.info(&format!("Client:      {}", ticket.client));
    if let Some(ref site) = ticket.site {
        output.info(&format!("Site:        {site}"));
    }
    output.info(&format!("Status:      {}", ticket.status));
    output.info(&format!("Priority:    {}", ticket.priority));
    if let Some(ref member) = ticket.team_member {
        output.info(&format!("Assigned:    {member}"));
    }
    if let Some(ref technician) = ticket.technician {
        let phone = ticket
            .technician_phone
            .as_deref()
            .map(|p| format!(" ({p})"))
            .unwrap_or_default();
        output.info(&format!("Technician:  {technician}{phone}"));
    }
    if !ticket.references.is_empty() {
        let mut refs: Vec<String> = ticket
            .references
            .iter()
            .map(|(system, number)| format!("{system}={number}"))
            .collect();
        refs.sort();
        output.info(&format!("References:  {}", refs.join(", ")));
    }
    output.info(&format!("Created:     {}", ticket.created_at.to_rfc3339()));
    output.info(&format!(
        "Issue start: {}",
        ticket.issue_started_at.to_rfc3339()
    ));
    if let Some(end) = ticket.issue_ended_at {
        output.info(&format!("Issue end:   {}", end.to_rfc3339()));
    }
    output.info(&format!("Elapsed:     {}", format_elapsed(ticket.elapsed())));
    if let Some(closed_at) = ticket.closed_at {
        output.info(&format!("Closed:      {}", closed_at.to_rfc3339()));
    }
    output.info(&format!("Author:      {}", ticket.author_email));
    output.info(&format!("Description:\n{}", ticket.description));
    if let Some(ref notes) = ticket.notes {
        output.info(&format!("Notes:\n{notes}"));
    }
}

pub fn handle_show(
    ticket_ref: &str,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_ticket(ticket_ref)?;
    let ticket = ctx.storage.load(&id)?;

    if output.is_json() {
        output.print_json(&ticket)?;
    } else {
        render_detail(&ticket, output);
    }
    Ok(())
}
