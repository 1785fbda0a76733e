//! `close` command

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::core::format_elapsed;
use crate::error::Result;

pub fn handle_close(
    ticket_ref: &str,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let acting = ctx.current_user()?;
    let id = ctx.resolve_ticket(ticket_ref)?;

    let closed = ctx.lifecycle().close(&id, &acting)?;
    if output.is_json() {
        output.print_json(&closed)?;
    } else {
        output.success(&format!(
            "Closed ticket {} (issue duration {})",
            closed.id.short(),
            format_elapsed(closed.elapsed())
        ));
    }
    Ok(())
}
