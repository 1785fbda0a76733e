//! ticketdesk - Support-ticket tracking for field service teams
//!
//! This crate provides a file-backed ticket tracker with:
//! - A soft-delete lifecycle: active tickets move to a trash set before any
//!   permanent erasure, and can be restored intact
//! - Password re-proof in front of every destructive operation
//! - Local accounts with admin/user roles
//! - Filtering, search, dashboard statistics, and export

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod lifecycle;
pub mod query;
pub mod stats;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{Result, TicketDeskError};
