//! `trash` command: list soft-deleted tickets

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::error::Result;

pub fn handle_trash(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let mut trashed = ctx.storage.load_all_trashed()?;
    trashed.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));

    if output.is_json() {
        return output.print_json(&trashed);
    }
    if trashed.is_empty() {
        output.info("Trash is empty");
        return Ok(());
    }
    output.info(&format!(
        "{:<8}  {:<20}  {:<25}  {}",
        "ID", "CLIENT", "DELETED", "DESCRIPTION"
    ));
    for entry in &trashed {
        let description: String = entry.ticket.description.chars().take(40).collect();
        output.info(&format!(
            "{}  {:<20}  {:<25}  {}",
            entry.ticket.id.short(),
            entry.ticket.client,
            entry.deleted_at.to_rfc3339(),
            description,
        ));
    }
    output.info(&format!("\n{} ticket(s) in trash", trashed.len()));
    Ok(())
}
