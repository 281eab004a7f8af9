use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::intake::extraction::extract_known_skills;
use crate::session::IntakeSession;

/// Flat snapshot of what the user submitted, emitted after each analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDataExport {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub extracted_skills: Vec<String>,
    pub selected_skills: Vec<String>,
    pub target_positions: Vec<String>,
    pub job_types: Vec<String>,
    pub location_preferences: Vec<String>,
}

impl UserDataExport {
    pub fn from_session(session: &IntakeSession) -> Self {
        Self {
            name: session.full_name.clone(),
            email: session.email.clone(),
            contact: session.contact.clone(),
            extracted_skills: extract_known_skills(&session.raw_resume_text),
            selected_skills: session.skills.clone(),
            target_positions: session.target_positions.clone(),
            job_types: session.selected_job_types.clone(),
            location_preferences: session.preferred_locations.clone(),
        }
    }
}

/// Logs the export and, when `path` is set, writes it there as pretty JSON.
/// Write failures are logged and otherwise ignored.
pub async fn emit_export(export: &UserDataExport, path: Option<&Path>) {
    match serde_json::to_string(export) {
        Ok(line) => info!(target: "cvlens::export", "User data export: {line}"),
        Err(e) => warn!("Could not serialize user data export: {e}"),
    }

    if let Some(path) = path {
        if let Err(e) = write_export(export, path).await {
            warn!("Error saving user data export: {e:#}");
        }
    }
}

async fn write_export(export: &UserDataExport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(export)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!("User data exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> IntakeSession {
        let mut s = IntakeSession::new();
        s.full_name = "Jane Doe".into();
        s.email = "jane@example.com".into();
        s.raw_resume_text = "Built services with Docker and PostgreSQL".into();
        s.skills = vec!["Rust".into()];
        s.selected_job_types = vec!["Full Time".into()];
        s.preferred_locations = vec!["Remote".into()];
        s
    }

    #[test]
    fn test_from_session() {
        let export = UserDataExport::from_session(&session());
        assert_eq!(export.name, "Jane Doe");
        assert_eq!(export.selected_skills, vec!["Rust"]);
        assert_eq!(export.job_types, vec!["Full Time"]);
        assert_eq!(export.location_preferences, vec!["Remote"]);
        assert!(export.extracted_skills.contains(&"Docker".to_string()));
        assert!(export.extracted_skills.contains(&"PostgreSQL".to_string()));
    }

    #[tokio::test]
    async fn test_emit_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_data_export.json");
        let export = UserDataExport::from_session(&session());

        emit_export(&export, Some(&path)).await;

        let written = std::fs::read_to_string(&path).unwrap();
        let back: UserDataExport = serde_json::from_str(&written).unwrap();
        assert_eq!(back, export);
    }

    #[tokio::test]
    async fn test_emit_export_ignores_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("export.json");
        emit_export(&UserDataExport::from_session(&session()), Some(&path)).await;
        assert!(!path.exists());
    }
}
