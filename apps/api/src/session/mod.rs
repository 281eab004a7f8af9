pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::FieldLimits;
use crate::intake::validation::{validate_location, validate_preference};
use crate::models::profile::{JobPreferences, LocalAnalysis, PersonalDetails, NOT_SPECIFIED};
use crate::models::resume::ResumeLinks;

pub use store::{RedisSessionStore, SessionStore};

/// Everything one user has entered or had extracted during an intake.
/// Loaded from the session store at the start of each request and saved back at the end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeSession {
    pub id: Uuid,
    #[serde(default)]
    pub raw_resume_text: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub target_positions: Vec<String>,
    #[serde(default)]
    pub selected_job_types: Vec<String>,
    #[serde(default)]
    pub selected_job_level: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub analyzed_data: Option<LocalAnalysis>,
    #[serde(default)]
    pub backend_data: Option<Value>,
    #[serde(default)]
    pub extracted_single_location: Option<String>,
    #[serde(default)]
    pub extracted_links: ResumeLinks,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub resume_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IntakeSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            raw_resume_text: String::new(),
            full_name: String::new(),
            contact: String::new(),
            email: String::new(),
            preferred_locations: Vec::new(),
            target_positions: Vec::new(),
            selected_job_types: Vec::new(),
            selected_job_level: String::new(),
            skills: Vec::new(),
            analyzed_data: None,
            backend_data: None,
            extracted_single_location: None,
            extracted_links: ResumeLinks::default(),
            document_id: None,
            resume_file_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_analyzed(&self) -> bool {
        self.analyzed_data.is_some()
    }

    pub fn personal_details(&self) -> PersonalDetails {
        PersonalDetails {
            full_name: self.full_name.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
        }
    }

    pub fn job_preferences(&self) -> JobPreferences {
        JobPreferences {
            preferred_locations: self.preferred_locations.clone(),
            target_positions: self.target_positions.clone(),
            job_types: self.selected_job_types.clone(),
            job_level: self.selected_job_level.clone(),
            skills: self.skills.clone(),
        }
    }

    /// Copies extracted fields into the form.
    ///
    /// Name, contact and email are overwritten unconditionally. The extracted
    /// location only seeds `preferred_locations` when the user has not chosen any.
    pub fn apply_analysis(&mut self, analysis: &LocalAnalysis) {
        self.full_name = analysis.name.clone();
        self.contact = analysis.phone.clone();
        self.email = analysis.email.clone();

        let location = analysis.preferred_location.clone();
        if self.preferred_locations.is_empty() && location != NOT_SPECIFIED {
            self.preferred_locations = vec![location.clone()];
        }
        self.extracted_single_location = Some(location);
    }

    pub fn add_custom_location(&mut self, raw: &str, limits: &FieldLimits) -> Result<String, String> {
        add_custom_entry(
            &mut self.preferred_locations,
            raw,
            limits.max_locations,
            validate_location,
            "Location",
        )
    }

    pub fn add_custom_skill(&mut self, raw: &str, limits: &FieldLimits) -> Result<String, String> {
        add_custom_entry(
            &mut self.skills,
            raw,
            limits.max_skills,
            validate_preference,
            "Skill",
        )
    }

    pub fn clear_resume(&mut self) {
        self.raw_resume_text.clear();
        self.extracted_links = ResumeLinks::default();
        self.resume_file_name = None;
    }
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new()
    }
}

fn add_custom_entry(
    list: &mut Vec<String>,
    raw: &str,
    max: usize,
    validate: fn(&str) -> Result<(), String>,
    label: &str,
) -> Result<String, String> {
    let entry = raw.trim();
    if entry.is_empty() {
        return Err(format!("{label} must not be empty"));
    }
    validate(entry)?;
    if list.iter().any(|existing| existing == entry) {
        return Err(format!("{label} already added!"));
    }
    if list.len() >= max {
        return Err(format!("You can select at most {max} {}s", label.to_lowercase()));
    }
    list.push(entry.to_string());
    Ok(entry.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn analysis(location: &str) -> LocalAnalysis {
        LocalAnalysis {
            name: "Jane Doe".into(),
            phone: "555-123-4567".into(),
            email: "jane@example.com".into(),
            preferred_location: location.into(),
            position_matches: BTreeMap::new(),
        }
    }

    #[test]
    fn test_apply_analysis_seeds_empty_locations() {
        let mut session = IntakeSession::new();
        session.apply_analysis(&analysis("Austin, TX"));
        assert_eq!(session.full_name, "Jane Doe");
        assert_eq!(session.contact, "555-123-4567");
        assert_eq!(session.preferred_locations, vec!["Austin, TX"]);
        assert_eq!(session.extracted_single_location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn test_apply_analysis_keeps_user_locations() {
        let mut session = IntakeSession::new();
        session.preferred_locations = vec!["Remote".into()];
        session.apply_analysis(&analysis("Austin, TX"));
        assert_eq!(session.preferred_locations, vec!["Remote"]);
    }

    #[test]
    fn test_apply_analysis_ignores_not_specified() {
        let mut session = IntakeSession::new();
        session.apply_analysis(&analysis(NOT_SPECIFIED));
        assert!(session.preferred_locations.is_empty());
        assert_eq!(session.extracted_single_location.as_deref(), Some(NOT_SPECIFIED));
    }

    #[test]
    fn test_add_custom_location_rejects_duplicate() {
        let mut session = IntakeSession::new();
        let limits = FieldLimits::default();
        assert_eq!(
            session.add_custom_location("  Boston, MA ", &limits).unwrap(),
            "Boston, MA"
        );
        assert_eq!(
            session.add_custom_location("Boston, MA", &limits).unwrap_err(),
            "Location already added!"
        );
    }

    #[test]
    fn test_add_custom_location_rejects_course_name() {
        let mut session = IntakeSession::new();
        let err = session
            .add_custom_location("Computer Science", &FieldLimits::default())
            .unwrap_err();
        assert!(err.contains("course/subject name"));
        assert!(session.preferred_locations.is_empty());
    }

    #[test]
    fn test_add_custom_skill_respects_limit() {
        let mut session = IntakeSession::new();
        let limits = FieldLimits {
            max_skills: 1,
            ..FieldLimits::default()
        };
        session.add_custom_skill("Rust", &limits).unwrap();
        let err = session.add_custom_skill("Go", &limits).unwrap_err();
        assert_eq!(err, "You can select at most 1 skills");
    }

    #[test]
    fn test_clear_resume_drops_text_and_links() {
        let mut session = IntakeSession::new();
        session.raw_resume_text = "resume".into();
        session.extracted_links.other.push("https://example.com".into());
        session.clear_resume();
        assert!(session.raw_resume_text.is_empty());
        assert!(session.extracted_links.is_empty());
    }

    #[test]
    fn test_session_json_roundtrip_tolerates_missing_fields() {
        let session = IntakeSession::new();
        let mut json = serde_json::to_value(&session).unwrap();
        json.as_object_mut().unwrap().remove("skills");
        let back: IntakeSession = serde_json::from_value(json).unwrap();
        assert!(back.skills.is_empty());
        assert_eq!(back.id, session.id);
    }
}
