//! `export` and `import` commands
//!
//! Export writes the filtered active set to a file; import reads the same
//! CSV/JSON/YAML shape back into the active set.

use super::base::HandlerContext;
use super::list::build_query;
use crate::cli::OutputFormatter;
use crate::error::Result;
use crate::export::{ExportFormat, validate_import};
use crate::storage::TicketRepository;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

pub fn handle_export(
    format: &str,
    output_path: Option<String>,
    status: Option<&str>,
    priority: Option<&str>,
    search: Option<&str>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let format = format.parse::<ExportFormat>()?;
    let query = build_query(status, priority, None, search, false, "created", false, None)?;
    let tickets = query.apply(ctx.storage.load_all()?);
    let rendered = format.export(&tickets)?;

    let path = match output_path {
        Some(path) => PathBuf::from(path),
        None => {
            let dir = ctx.project_root.join(&ctx.config.export_dir);
            fs::create_dir_all(&dir)?;
            dir.join(format!(
                "tickets-{}.{}",
                Utc::now().format("%Y%m%d-%H%M%S"),
                format.extension()
            ))
        },
    };
    fs::write(&path, rendered)?;

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "exported": tickets.len(),
            "path": path.display().to_string(),
        }))?;
    } else {
        output.success(&format!(
            "Exported {} ticket(s) to {}",
            tickets.len(),
            path.display()
        ));
    }
    Ok(())
}

pub fn handle_import(
    file: &str,
    format: Option<&str>,
    dry_run: bool,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let acting = ctx.current_user()?;

    let path = PathBuf::from(file);
    let format = match format {
        Some(name) => name.parse::<ExportFormat>()?,
        None => ExportFormat::from_path(&path)?,
    };
    let content = fs::read_to_string(&path)?;
    let mut tickets = format.parse(&content)?;

    for ticket in &mut tickets {
        // the CSV shape drops authorship and the closer's id; attribute
        // both to the importing user
        if ticket.author_email.is_empty() {
            ticket.author_id = acting.id.clone();
            ticket.author_email = acting.email.clone();
        }
        if ticket.is_closed() && ticket.closed_by.is_none() {
            ticket.closed_by = Some(acting.id.clone());
            if ticket.closed_at.is_none() {
                ticket.closed_at = Some(ticket.issue_ended_at.unwrap_or_else(Utc::now));
            }
        }
    }
    validate_import(&tickets)?;

    let mut imported = 0;
    let mut skipped = 0;
    for ticket in &tickets {
        if ctx.storage.exists(&ticket.id) || ctx.storage.trashed_exists(&ticket.id) {
            tracing::warn!(id = %ticket.id, "ticket already present; skipping import");
            skipped += 1;
            continue;
        }
        if !dry_run {
            ctx.storage.save(ticket)?;
        }
        imported += 1;
    }

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "imported": imported,
            "skipped": skipped,
            "dry_run": dry_run,
        }))?;
    } else if dry_run {
        output.success(&format!(
            "Dry run: {imported} ticket(s) would be imported, {skipped} skipped"
        ));
    } else {
        output.success(&format!("Imported {imported} ticket(s), skipped {skipped}"));
    }
    Ok(())
}
