//! `delete` and `restore` commands
//!
//! Deletion is two-phase: the request is staged, the user confirms the
//! ticket list, and the staged request is only consumed after the acting
//! admin re-proves their password.

use super::base::HandlerContext;
use crate::cli::OutputFormatter;
use crate::core::TicketId;
use crate::error::{Result, TicketDeskError};
use dialoguer::{Confirm, Password};

#[allow(clippy::fn_params_excessive_bools)]
pub fn handle_delete(
    ticket_refs: &[String],
    permanent: bool,
    password: Option<String>,
    skip_confirm: bool,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    if ticket_refs.is_empty() {
        return Err(TicketDeskError::validation("no tickets specified"));
    }
    let ctx = HandlerContext::new(project_dir)?;
    let acting = ctx.current_user()?;

    let ids: Vec<TicketId> = ticket_refs
        .iter()
        .map(|reference| {
            if permanent {
                ctx.resolve_trashed(reference)
            } else {
                ctx.resolve_ticket(reference)
            }
        })
        .collect::<Result<_>>()?;

    if !skip_confirm {
        let action = if permanent {
            "PERMANENTLY delete"
        } else {
            "move to trash"
        };
        let confirmed = Confirm::new()
            .with_prompt(format!("{action} {} ticket(s)?", ids.len()))
            .default(false)
            .interact()
            .map_err(|e| TicketDeskError::custom(format!("Failed to read confirmation: {e}")))?;
        if !confirmed {
            output.info("Cancelled");
            return Ok(());
        }
    }

    let lifecycle = ctx.lifecycle();
    let pending = lifecycle.request_delete(ids, permanent, &acting);
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password (confirm destructive action)")
            .interact()
            .map_err(|e| TicketDeskError::custom(format!("Failed to read password: {e}")))?,
    };

    let count = lifecycle.confirm_delete(pending, &password, &acting, &ctx.auth())?;
    if output.is_json() {
        output.print_json(&serde_json::json!({
            "deleted": count,
            "permanent": permanent,
        }))?;
    } else if permanent {
        output.success(&format!("{count} ticket(s) permanently deleted."));
    } else {
        output.success(&format!("{count} ticket(s) moved to trash."));
    }
    Ok(())
}

pub fn handle_restore(
    ticket_ref: &str,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    // restoring recovers data, so it only needs a signed-in user
    ctx.current_user()?;
    let id = ctx.resolve_trashed(ticket_ref)?;

    match ctx.lifecycle().restore(&id)? {
        Some(ticket) => {
            if output.is_json() {
                output.print_json(&ticket)?;
            } else {
                output.success(&format!(
                    "Restored ticket {} for {}",
                    ticket.id.short(),
                    ticket.client
                ));
            }
            Ok(())
        },
        None => Err(TicketDeskError::TicketNotFound {
            id: ticket_ref.to_string(),
        }),
    }
}
