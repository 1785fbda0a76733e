//! Command-line interface: argument definitions and handlers

pub mod handlers;
pub mod output;
pub mod utils;

pub use output::OutputFormatter;

use clap::{Parser, Subcommand};

/// Support-ticket tracker with soft delete, restore, and password-gated
/// destructive actions
#[derive(Parser)]
#[command(name = "ticketdesk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory (defaults to the current directory)
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a ticketdesk project in the current directory
    Init,

    /// Create an account (the first account becomes admin)
    Signup {
        /// Sign-in email
        email: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in
    Login {
        /// Sign-in email
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create a new ticket
    New {
        /// Client name
        #[arg(long)]
        client: String,
        /// Issue description
        #[arg(long)]
        description: String,
        /// Client site
        #[arg(long)]
        site: Option<String>,
        /// Priority: low, medium, high, urgent
        #[arg(long)]
        priority: Option<String>,
        /// Assigned team member (defaults to the signed-in user's name)
        #[arg(long)]
        team_member: Option<String>,
        /// On-site technician name
        #[arg(long)]
        technician: Option<String>,
        /// On-site technician phone
        #[arg(long)]
        technician_phone: Option<String>,
        /// Cross-reference numbers, repeatable, as system=number
        #[arg(long = "reference", value_name = "SYSTEM=NUMBER")]
        references: Vec<String>,
        /// Additional notes
        #[arg(long)]
        notes: Option<String>,
        /// When the issue started (defaults to now)
        #[arg(long)]
        started: Option<String>,
    },

    /// Edit an existing ticket
    Edit {
        /// Ticket id or unique id prefix
        ticket: String,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        site: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Status: open, in-progress, closed
        #[arg(long)]
        status: Option<String>,
        /// Priority: low, medium, high, urgent
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        team_member: Option<String>,
        #[arg(long)]
        technician: Option<String>,
        #[arg(long)]
        technician_phone: Option<String>,
        /// Cross-reference numbers, repeatable, as system=number
        #[arg(long = "reference", value_name = "SYSTEM=NUMBER")]
        references: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
        /// When the issue ended
        #[arg(long)]
        ended: Option<String>,
    },

    /// Close a ticket whose issue end time has been recorded
    Close {
        /// Ticket id or unique id prefix
        ticket: String,
    },

    /// List active tickets
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,
        /// Filter by team member (substring)
        #[arg(long)]
        team_member: Option<String>,
        /// Search client, description, references, team member, technician
        #[arg(long)]
        search: Option<String>,
        /// Treat the search term as a regular expression
        #[arg(long)]
        regex: bool,
        /// Sort key: created, client, status, priority, ended
        #[arg(long, default_value = "created")]
        sort: String,
        /// Reverse the sort direction
        #[arg(long)]
        reverse: bool,
        /// Show at most this many tickets
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one ticket in full
    Show {
        /// Ticket id or unique id prefix
        ticket: String,
    },

    /// Move tickets to trash, or erase them from trash with --permanent
    /// (admin only; requires password confirmation)
    Delete {
        /// Ticket ids or unique id prefixes
        tickets: Vec<String>,
        /// Erase from the trash set instead of moving to it
        #[arg(long)]
        permanent: bool,
        /// Password for confirmation (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Skip the interactive confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Restore a ticket from trash into the active set
    Restore {
        /// Ticket id or unique id prefix
        ticket: String,
    },

    /// List trashed tickets
    Trash,

    /// Show dashboard statistics for the active set
    Stats,

    /// Export the (optionally filtered) active set to a file
    Export {
        /// Output format: csv, json, yaml
        #[arg(long, default_value = "csv")]
        format: String,
        /// Output file (defaults into the configured export directory)
        #[arg(long)]
        output: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,
        /// Search before exporting
        #[arg(long)]
        search: Option<String>,
    },

    /// Import tickets from a previously exported file into the active set
    Import {
        /// File to import
        file: String,
        /// Input format: csv, json, yaml (inferred from the extension when
        /// omitted)
        #[arg(long)]
        format: Option<String>,
        /// Parse and validate without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show a ticket's elapsed time, optionally live-updating
    Duration {
        /// Ticket id or unique id prefix
        ticket: String,
        /// Refresh once per second until the issue end time is recorded
        #[arg(short, long)]
        follow: bool,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List all accounts
    List,

    /// Change an account's role (admin only)
    SetRole {
        /// Account email
        email: String,
        /// New role: admin or user
        role: String,
    },
}
