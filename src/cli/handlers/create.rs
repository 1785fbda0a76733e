//! `new` command: file a ticket

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::cli::utils::{parse_reference, parse_timestamp};
use crate::core::Priority;
use crate::error::Result;
use crate::lifecycle::TicketDraft;
use std::collections::HashMap;

#[allow(clippy::too_many_arguments)]
pub fn handle_new(
    client: String,
    description: String,
    site: Option<String>,
    priority: Option<String>,
    team_member: Option<String>,
    technician: Option<String>,
    technician_phone: Option<String>,
    references: &[String],
    notes: Option<String>,
    started: Option<String>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let author = ctx.current_user()?;

    let priority = match priority {
        Some(p) => p.parse::<Priority>()?,
        None => ctx.config.default_priority,
    };
    let mut reference_map = HashMap::new();
    for entry in references {
        let (system, number) = parse_reference(entry)?;
        reference_map.insert(system, number);
    }
    if let Some(ref site) = site {
        if !ctx.config.sites.is_empty() && !ctx.config.sites.contains(site) {
            output.warning(&format!("Site '{site}' is not in the configured site list"));
        }
    }

    let draft = TicketDraft {
        client,
        site,
        description,
        priority,
        team_member: Some(team_member.unwrap_or_else(|| author.name.clone())),
        technician,
        technician_phone,
        references: reference_map,
        notes,
        issue_started_at: started.as_deref().map(parse_timestamp).transpose()?,
        ..TicketDraft::default()
    };

    let ticket = ctx.lifecycle().create(draft, &author)?;
    if output.is_json() {
        output.print_json(&ticket)?;
    } else {
        output.success(&format!(
            "Created ticket {} for {}",
            ticket.id.short(),
            ticket.client
        ));
    }
    Ok(())
}
