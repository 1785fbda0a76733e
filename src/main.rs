//! ticketdesk - Support-ticket tracker CLI
//!
//! Entry point: parses command-line arguments and dispatches to the
//! command handlers.

use clap::Parser;
use std::process;
use ticketdesk::cli::{Cli, Commands, OutputFormatter, UserCommands, handlers};
use ticketdesk::error::Result;

fn main() {
    let cli = Cli::parse();
    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Run the CLI application with the parsed arguments
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    }
    dispatch_command(cli.command, cli.project.as_deref(), formatter)
}

fn dispatch_command(
    command: Commands,
    project: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        Commands::Init => handlers::handle_init(project, formatter),
        Commands::Signup {
            email,
            name,
            password,
        } => handlers::handle_signup(&email, &name, password, project, formatter),
        Commands::Login { email, password } => {
            handlers::handle_login(&email, password, project, formatter)
        },
        Commands::Logout => handlers::handle_logout(project, formatter),
        Commands::Whoami => handlers::handle_whoami(project, formatter),
        Commands::New {
            client,
            description,
            site,
            priority,
            team_member,
            technician,
            technician_phone,
            references,
            notes,
            started,
        } => handlers::handle_new(
            client,
            description,
            site,
            priority,
            team_member,
            technician,
            technician_phone,
            &references,
            notes,
            started,
            project,
            formatter,
        ),
        Commands::Edit {
            ticket,
            client,
            site,
            description,
            status,
            priority,
            team_member,
            technician,
            technician_phone,
            references,
            notes,
            ended,
        } => handlers::handle_edit(
            &ticket,
            client,
            site,
            description,
            status,
            priority,
            team_member,
            technician,
            technician_phone,
            &references,
            notes,
            ended,
            project,
            formatter,
        ),
        Commands::Close { ticket } => handlers::handle_close(&ticket, project, formatter),
        Commands::List {
            status,
            priority,
            team_member,
            search,
            regex,
            sort,
            reverse,
            limit,
        } => handlers::handle_list(
            status.as_deref(),
            priority.as_deref(),
            team_member,
            search.as_deref(),
            regex,
            &sort,
            reverse,
            limit,
            project,
            formatter,
        ),
        Commands::Show { ticket } => handlers::handle_show(&ticket, project, formatter),
        Commands::Delete {
            tickets,
            permanent,
            password,
            yes,
        } => handlers::handle_delete(&tickets, permanent, password, yes, project, formatter),
        Commands::Restore { ticket } => handlers::handle_restore(&ticket, project, formatter),
        Commands::Trash => handlers::handle_trash(project, formatter),
        Commands::Stats => handlers::handle_stats(project, formatter),
        Commands::Export {
            format,
            output,
            status,
            priority,
            search,
        } => handlers::handle_export(
            &format,
            output,
            status.as_deref(),
            priority.as_deref(),
            search.as_deref(),
            project,
            formatter,
        ),
        Commands::Import {
            file,
            format,
            dry_run,
        } => handlers::handle_import(&file, format.as_deref(), dry_run, project, formatter),
        Commands::Duration { ticket, follow } => {
            handlers::handle_duration(&ticket, follow, project, formatter)
        },
        Commands::User { command } => match command {
            UserCommands::List => handlers::handle_user_list(project, formatter),
            UserCommands::SetRole { email, role } => {
                handlers::handle_user_set_role(&email, &role, project, formatter)
            },
        },
    }
}

/// Handle errors and display them to the user
fn handle_error(error: &ticketdesk::error::TicketDeskError, formatter: &OutputFormatter) {
    formatter.error(&error.to_string());
    if let Some(suggestion) = error.suggestion() {
        formatter.info(&format!("  {suggestion}"));
    }
    if formatter.is_json() {
        let _ = formatter.print_json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let _cli = Cli::parse_from(["ticketdesk", "init"]);
        let _cli = Cli::parse_from(["ticketdesk", "list", "--status", "open"]);
        let _cli = Cli::parse_from([
            "ticketdesk",
            "new",
            "--client",
            "Acme",
            "--description",
            "Inverter fault",
        ]);
        let _cli = Cli::parse_from(["ticketdesk", "delete", "abc123", "--permanent", "-y"]);
    }
}
