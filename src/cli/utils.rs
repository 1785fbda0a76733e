//! Shared CLI utilities: project discovery, argument parsing helpers

use crate::error::{Result, TicketDeskError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};

/// Name of the project data directory
pub const DATA_DIR: &str = ".ticketdesk";

/// Find the project root by walking up from the starting directory until a
/// `.ticketdesk` directory appears
pub fn find_project_root(start: Option<&str>) -> Result<PathBuf> {
    let start = match start {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    let mut dir: Option<&Path> = Some(start.as_path());
    while let Some(current) = dir {
        if current.join(DATA_DIR).is_dir() {
            return Ok(current.to_path_buf());
        }
        dir = current.parent();
    }
    Err(TicketDeskError::ProjectNotInitialized)
}

/// Parse a user-supplied timestamp
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM`, or a bare date (midnight UTC).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(TicketDeskError::custom(format!(
        "Invalid timestamp: '{input}'. Use RFC 3339, 'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD'"
    )))
}

/// Parse `system=number` cross-reference arguments
pub fn parse_reference(input: &str) -> Result<(String, String)> {
    input
        .split_once('=')
        .map(|(system, number)| (system.trim().to_string(), number.trim().to_string()))
        .filter(|(system, number)| !system.is_empty() && !number.is_empty())
        .ok_or_else(|| {
            TicketDeskError::custom(format!(
                "Invalid reference: '{input}'. Use the form system=number, e.g. fiix=F-1234"
            ))
        })
}
