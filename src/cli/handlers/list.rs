//! `list` command: filter, search, and sort the active set

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::core::{Priority, Status, Ticket, format_elapsed};
use crate::error::Result;
use crate::query::{SearchTerm, SortBy, TicketQuery};
use crate::storage::TicketRepository;

/// Build a query from the shared list/export filter arguments
#[allow(clippy::too_many_arguments)]
pub fn build_query(
    status: Option<&str>,
    priority: Option<&str>,
    team_member: Option<String>,
    search: Option<&str>,
    use_regex: bool,
    sort: &str,
    reverse: bool,
    limit: Option<usize>,
) -> Result<TicketQuery> {
    Ok(TicketQuery {
        status: status.map(str::parse::<Status>).transpose()?,
        priority: priority.map(str::parse::<Priority>).transpose()?,
        team_member,
        search: search.map(|term| SearchTerm::new(term, use_regex)).transpose()?,
        sort_by: sort.parse::<SortBy>()?,
        reverse,
        limit,
    })
}

/// Render one ticket as a list row
pub fn render_row(ticket: &Ticket) -> String {
    let site = ticket.site.as_deref().unwrap_or("-");
    let member = ticket.team_member.as_deref().unwrap_or("-");
    format!(
        "{}  {:<11}  {:<7}  {:<20}  {:<15}  {:<12}  {}",
        ticket.id.short(),
        ticket.status.to_string(),
        ticket.priority.to_string(),
        truncate(&ticket.client, 20),
        truncate(site, 15),
        truncate(member, 12),
        format_elapsed(ticket.elapsed()),
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_list(
    status: Option<&str>,
    priority: Option<&str>,
    team_member: Option<String>,
    search: Option<&str>,
    use_regex: bool,
    sort: &str,
    reverse: bool,
    limit: Option<usize>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let query = build_query(
        status,
        priority,
        team_member,
        search,
        use_regex,
        sort,
        reverse,
        limit,
    )?;
    let tickets = query.apply(ctx.storage.load_all()?);

    if output.is_json() {
        return output.print_json(&tickets);
    }
    if tickets.is_empty() {
        output.info("No tickets found");
        return Ok(());
    }
    output.info(&format!(
        "{:<8}  {:<11}  {:<7}  {:<20}  {:<15}  {:<12}  {}",
        "ID", "STATUS", "PRIO", "CLIENT", "SITE", "MEMBER", "ELAPSED"
    ));
    for ticket in &tickets {
        output.info(&render_row(ticket));
    }
    output.info(&format!("\n{} ticket(s)", tickets.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketBuilder;

    #[test]
    fn test_build_query_rejects_bad_values() {
        assert!(build_query(Some("bogus"), None, None, None, false, "created", false, None).is_err());
        assert!(build_query(None, Some("bogus"), None, None, false, "created", false, None).is_err());
        assert!(build_query(None, None, None, None, false, "bogus", false, None).is_err());
        assert!(build_query(None, None, None, Some("(bad"), true, "created", false, None).is_err());
    }

    #[test]
    fn test_render_row_contains_key_fields() {
        let ticket = TicketBuilder::new()
            .client("Acme")
            .site("North Array")
            .description("Inverter fault")
            .build();
        let row = render_row(&ticket);
        assert!(row.contains(&ticket.id.short()));
        assert!(row.contains("Acme"));
        assert!(row.contains("North Array"));
    }
}
