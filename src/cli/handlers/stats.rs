//! `stats` command: dashboard aggregates over the active set

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::error::Result;
use crate::stats::DashboardStats;
use crate::storage::TicketRepository;

pub fn handle_stats(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let tickets = ctx.storage.load_all()?;
    let stats = DashboardStats::compute(&tickets);

    if output.is_json() {
        return output.print_json(&stats);
    }

    output.info(&format!("Total tickets:       {}", stats.total));
    output.info(&format!("Open:                {}", stats.open));
    output.info(&format!("Closed:              {}", stats.closed));
    output.info(&format!("High priority open:  {}", stats.high_priority_open));

    output.info("\nBy status:");
    for (status, count) in &stats.by_status {
        output.info(&format!("  {status:<12} {count}"));
    }
    output.info("\nBy priority:");
    for (priority, count) in &stats.by_priority {
        output.info(&format!("  {priority:<12} {count}"));
    }
    if let Some(avg) = stats.avg_resolution_display() {
        output.info(&format!("\nAverage issue duration: {avg}"));
    }
    Ok(())
}
