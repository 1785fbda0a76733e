//! `init` command: create the project data directory

use crate::cli::OutputFormatter;
use crate::cli::utils::DATA_DIR;
use crate::config::AppConfig;
use crate::error::{Result, TicketDeskError};
use crate::storage::FileStorage;
use std::path::PathBuf;

/// Initialize a ticketdesk project
pub fn handle_init(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let root = match project_dir {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    let data_dir = root.join(DATA_DIR);
    if data_dir.exists() {
        return Err(TicketDeskError::custom(format!(
            "Project already initialized at {}",
            data_dir.display()
        )));
    }

    FileStorage::init(&data_dir)?;
    AppConfig::default().save(&data_dir)?;

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "initialized": data_dir.display().to_string(),
        }))?;
    } else {
        output.success(&format!("Initialized ticketdesk project at {}", root.display()));
        output.info("Create the first account with 'ticketdesk signup' (it becomes admin)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_store_and_config() {
        let temp = TempDir::new().unwrap();
        let output = OutputFormatter::new(false, true);

        handle_init(temp.path().to_str(), &output).unwrap();
        assert!(temp.path().join(DATA_DIR).join("tickets").is_dir());
        assert!(temp.path().join(DATA_DIR).join("config.yaml").is_file());

        // a second init is refused
        assert!(handle_init(temp.path().to_str(), &output).is_err());
    }
}
