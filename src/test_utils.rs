//! Test utilities for ticketdesk
//!
//! Common fixtures to reduce duplication in test code across the codebase.

#![cfg(test)]

use crate::auth::Authenticator;
use crate::core::{Priority, Status, Ticket, TicketBuilder, UserProfile};
use crate::storage::{FileStorage, TicketRepository};
use std::path::PathBuf;
use tempfile::TempDir;

pub const TEST_PASSWORD: &str = "hunter22";

/// Test fixture for creating a temporary project
pub struct TestProject {
    pub temp_dir: TempDir,
    pub project_root: PathBuf,
    pub storage: FileStorage,
    pub admin: UserProfile,
    pub user: UserProfile,
}

impl TestProject {
    /// Create an initialized project with an admin and a regular user
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let project_root = temp_dir.path().to_path_buf();
        let storage =
            FileStorage::init(project_root.join(".ticketdesk")).expect("Failed to init storage");

        let auth = Authenticator::new(&storage);
        let admin = auth
            .sign_up("admin@example.com", TEST_PASSWORD, "Admin")
            .expect("Failed to create admin");
        let user = auth
            .sign_up("user@example.com", TEST_PASSWORD, "User")
            .expect("Failed to create user");

        Self {
            temp_dir,
            project_root,
            storage,
            admin,
            user,
        }
    }

    /// Create a test project with sample tickets authored by the regular user
    pub fn with_sample_tickets() -> Self {
        let project = Self::new();
        let tickets = vec![
            project.build_ticket("Acme", "Inverter fault", Priority::High, Status::Open),
            project.build_ticket("Globex", "Module string down", Priority::Medium, Status::InProgress),
            project.build_ticket("Initech", "Comms outage", Priority::Low, Status::Open),
        ];
        for ticket in tickets {
            project.storage.save(&ticket).expect("Failed to save ticket");
        }
        project
    }

    /// Get the project root as a string
    pub fn root_path_str(&self) -> &str {
        self.project_root.to_str().expect("Invalid path")
    }

    /// Build a ticket authored by the regular user without saving it
    pub fn build_ticket(
        &self,
        client: &str,
        description: &str,
        priority: Priority,
        status: Status,
    ) -> Ticket {
        TicketBuilder::new()
            .client(client)
            .description(description)
            .priority(priority)
            .status(status)
            .author(self.user.id.clone(), self.user.email.clone())
            .build()
    }

    /// Create and save a ticket
    pub fn create_ticket(&self, client: &str) -> Ticket {
        let ticket = self.build_ticket(client, "Reported issue", Priority::Medium, Status::Open);
        self.storage.save(&ticket).expect("Failed to save ticket");
        ticket
    }
}
