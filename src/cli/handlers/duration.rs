//! `duration` command: elapsed issue time, optionally live

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::core::format_elapsed;
use crate::error::Result;
use crate::storage::TicketRepository;
use std::io::Write;

pub fn handle_duration(
    ticket_ref: &str,
    follow: bool,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let id = ctx.resolve_ticket(ticket_ref)?;
    let ticket = ctx.storage.load(&id)?;

    if !follow || ticket.issue_ended_at.is_some() {
        if output.is_json() {
            output.print_json(&serde_json::json!({
                "id": ticket.id.to_string(),
                "elapsed_seconds": ticket.elapsed().num_seconds(),
                "ended": ticket.issue_ended_at.is_some(),
            }))?;
        } else {
            output.info(&format_elapsed(ticket.elapsed()));
        }
        return Ok(());
    }

    // refresh in place until the end time lands on disk
    loop {
        let current = ctx.storage.load(&id)?;
        print!("\r{}    ", format_elapsed(current.elapsed()));
        std::io::stdout().flush()?;
        if current.issue_ended_at.is_some() {
            println!();
            output.info("Issue end time recorded; duration is final");
            return Ok(());
        }
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}
