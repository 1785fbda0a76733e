//! Export and import of ticket lists
//!
//! Client-side only: export renders whatever list the caller has in memory
//! to CSV, JSON, or YAML; import parses the same shapes back into tickets
//! for the caller to insert.

use crate::core::{Ticket, TicketId};
use crate::error::{Result, TicketDeskError};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    /// Get file extension for the format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Infer the format from a file path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                TicketDeskError::custom(format!(
                    "Cannot infer format from '{}'; pass --format",
                    path.display()
                ))
            })?
            .parse()
    }

    /// Render tickets in this format
    pub fn export(self, tickets: &[Ticket]) -> Result<String> {
        match self {
            Self::Csv => export_csv(tickets),
            Self::Json => Ok(serde_json::to_string_pretty(tickets)?),
            Self::Yaml => Ok(serde_yaml::to_string(tickets)?),
        }
    }

    /// Parse tickets from content in this format
    pub fn parse(self, content: &str) -> Result<Vec<Ticket>> {
        match self {
            Self::Csv => import_csv(content),
            Self::Json => Ok(serde_json::from_str(content)?),
            Self::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(TicketDeskError::custom(format!(
                "Invalid export format: {s}. Valid values: csv, json, yaml"
            ))),
        }
    }
}

/// Export tickets to CSV
fn export_csv(tickets: &[Ticket]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer
        .write_record([
            "id",
            "client",
            "site",
            "description",
            "status",
            "priority",
            "team_member",
            "technician",
            "references",
            "created_at",
            "issue_started_at",
            "issue_ended_at",
            "closed_at",
        ])
        .map_err(|e| TicketDeskError::custom(format!("Failed to write CSV header: {e}")))?;

    for ticket in tickets {
        let mut references: Vec<String> = ticket
            .references
            .iter()
            .map(|(system, number)| format!("{system}:{number}"))
            .collect();
        references.sort();

        writer
            .write_record([
                ticket.id.to_string(),
                ticket.client.clone(),
                ticket.site.clone().unwrap_or_default(),
                ticket.description.clone(),
                ticket.status.to_string(),
                ticket.priority.to_string(),
                ticket.team_member.clone().unwrap_or_default(),
                ticket.technician.clone().unwrap_or_default(),
                references.join(";"),
                ticket.created_at.to_rfc3339(),
                ticket.issue_started_at.to_rfc3339(),
                ticket
                    .issue_ended_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default(),
                ticket.closed_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ])
            .map_err(|e| TicketDeskError::custom(format!("Failed to write CSV record: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| TicketDeskError::custom(format!("Failed to flush CSV: {e}")))?;

    String::from_utf8(
        writer
            .into_inner()
            .map_err(|e| TicketDeskError::custom(format!("Failed to get CSV data: {e}")))?,
    )
    .map_err(|e| TicketDeskError::custom(format!("Invalid UTF-8 in CSV: {e}")))
}

fn parse_optional_timestamp(field: &str, column: &str) -> Result<Option<DateTime<Utc>>> {
    if field.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(field)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| {
            TicketDeskError::custom(format!("Invalid {column} timestamp '{field}': {e}"))
        })
}

/// Parse tickets from the CSV shape written by [`export_csv`]
fn import_csv(content: &str) -> Result<Vec<Ticket>> {
    use crate::core::{Priority, Status, TicketBuilder};

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let mut tickets = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| TicketDeskError::custom(format!("Failed to read CSV record: {e}")))?;
        let field = |i: usize| record.get(i).unwrap_or_default().trim();

        let mut builder = TicketBuilder::new().client(field(1)).description(field(3));
        if !field(0).is_empty() {
            builder = builder.id(TicketId::parse_str(field(0))?);
        }
        if !field(2).is_empty() {
            builder = builder.site(field(2));
        }
        if !field(4).is_empty() {
            builder = builder.status(field(4).parse::<Status>()?);
        }
        if !field(5).is_empty() {
            builder = builder.priority(field(5).parse::<Priority>()?);
        }
        if !field(6).is_empty() {
            builder = builder.team_member(field(6));
        }
        if !field(7).is_empty() {
            builder = builder.technician(field(7));
        }
        for entry in field(8).split(';').filter(|s| !s.is_empty()) {
            let (system, number) = entry.split_once(':').ok_or_else(|| {
                TicketDeskError::custom(format!("Invalid reference entry '{entry}'"))
            })?;
            builder = builder.reference(system, number);
        }
        if let Some(created) = parse_optional_timestamp(field(9), "created_at")? {
            builder = builder.created_at(created);
        }
        if let Some(started) = parse_optional_timestamp(field(10), "issue_started_at")? {
            builder = builder.issue_started_at(started);
        }
        if let Some(ended) = parse_optional_timestamp(field(11), "issue_ended_at")? {
            builder = builder.issue_ended_at(ended);
        }

        let mut ticket = builder.build();
        // the CSV shape carries no closed_by column; the import handler
        // completes the pair for closed tickets
        ticket.closed_at = parse_optional_timestamp(field(12), "closed_at")?;
        tickets.push(ticket);
    }
    Ok(tickets)
}

/// Validate a parsed import before anything is written
///
/// Rejects an empty import, duplicate ids within the file, and any ticket
/// that fails its own invariants.
pub fn validate_import(tickets: &[Ticket]) -> Result<()> {
    if tickets.is_empty() {
        return Err(TicketDeskError::validation(
            "no tickets found in import data",
        ));
    }
    let mut seen = std::collections::HashSet::new();
    for ticket in tickets {
        if !seen.insert(ticket.id.clone()) {
            return Err(TicketDeskError::validation(format!(
                "duplicate ticket id in import data: {}",
                ticket.id
            )));
        }
        ticket.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Priority, Status, TicketBuilder};

    fn sample() -> Vec<Ticket> {
        vec![
            TicketBuilder::new()
                .client("Acme")
                .site("North Array")
                .description("Inverter fault, string 3")
                .status(Status::Open)
                .priority(Priority::High)
                .reference("fiix", "F-100")
                .build(),
        ]
    }

    #[test]
    fn test_csv_export() {
        let csv = ExportFormat::Csv.export(&sample()).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("id,client,site"));
        let row = lines.next().unwrap();
        assert!(row.contains("Acme"));
        assert!(row.contains("\"Inverter fault, string 3\""));
        assert!(row.contains("fiix:F-100"));
    }

    #[test]
    fn test_json_export_round_trips() {
        let tickets = sample();
        let json = ExportFormat::Json.export(&tickets).unwrap();
        let parsed: Vec<Ticket> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tickets);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("YML".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/tickets.json")).unwrap(),
            ExportFormat::Json
        );
        assert!(ExportFormat::from_path(Path::new("tickets")).is_err());
    }

    #[test]
    fn test_csv_parse_reads_export_shape() {
        let original = sample();
        let csv = ExportFormat::Csv.export(&original).unwrap();
        let parsed = ExportFormat::Csv.parse(&csv).unwrap();

        assert_eq!(parsed.len(), 1);
        let ticket = &parsed[0];
        assert_eq!(ticket.id, original[0].id);
        assert_eq!(ticket.client, "Acme");
        assert_eq!(ticket.site.as_deref(), Some("North Array"));
        assert_eq!(ticket.status, Status::Open);
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(
            ticket.references.get("fiix").map(String::as_str),
            Some("F-100")
        );
        assert_eq!(ticket.created_at, original[0].created_at);
    }

    #[test]
    fn test_csv_parse_rejects_bad_fields() {
        let bad_status =
            "id,client,site,description,status,priority,team_member,technician,references,\
             created_at,issue_started_at,issue_ended_at,closed_at\n\
             ,Acme,,Fault,bogus,,,,,,,,\n";
        assert!(ExportFormat::Csv.parse(bad_status).is_err());

        let bad_timestamp =
            "id,client,site,description,status,priority,team_member,technician,references,\
             created_at,issue_started_at,issue_ended_at,closed_at\n\
             ,Acme,,Fault,open,,,,,yesterday,,,\n";
        assert!(ExportFormat::Csv.parse(bad_timestamp).is_err());
    }

    #[test]
    fn test_validate_import() {
        let tickets = sample();
        assert!(validate_import(&tickets).is_ok());
        assert!(validate_import(&[]).is_err());

        // duplicate ids within one file
        let duplicated = vec![tickets[0].clone(), tickets[0].clone()];
        assert!(validate_import(&duplicated).is_err());

        // an invalid ticket is rejected before anything is written
        let unnamed = vec![TicketBuilder::new().description("Fault").build()];
        assert!(validate_import(&unnamed).is_err());
    }
}
