//! Command handlers
//!
//! One module per command family. Every handler takes its parsed arguments,
//! the optional `--project` override, and the output formatter, and returns
//! a `Result` for `main` to report.

mod auth;
mod base;
mod close;
mod create;
mod delete;
mod duration;
mod edit;
mod export;
mod init;
mod list;
mod show;
mod stats;
mod trash;
mod user;

pub use auth::{handle_login, handle_logout, handle_signup, handle_whoami};
pub use base::HandlerContext;
pub use close::handle_close;
pub use create::handle_new;
pub use delete::{handle_delete, handle_restore};
pub use duration::handle_duration;
pub use edit::handle_edit;
pub use export::{handle_export, handle_import};
pub use init::handle_init;
pub use list::handle_list;
pub use show::handle_show;
pub use stats::handle_stats;
pub use trash::handle_trash;
pub use user::{handle_user_list, handle_user_set_role};
