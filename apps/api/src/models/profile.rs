use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder written by local analysis when a field has no match.
pub const NOT_FOUND: &str = "Not found";
/// Placeholder for an extracted location with no match.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Default `user_id` sent in the fallback analysis request.
pub const DEFAULT_USER_ID: &str = "cvlens_user";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonalDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
}

impl PersonalDetails {
    pub fn is_complete(&self) -> bool {
        !self.full_name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobPreferences {
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub target_positions: Vec<String>,
    #[serde(default)]
    pub job_types: Vec<String>,
    #[serde(default)]
    pub job_level: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl JobPreferences {
    /// Locations and skills are the two selections analysis cannot run without.
    pub fn is_valid(&self) -> bool {
        !self.preferred_locations.is_empty() && !self.skills.is_empty()
    }
}

/// Result of the regex-based fallback extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalAnalysis {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub preferred_location: String,
    pub position_matches: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecommendation {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub date_posted: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub application_url: String,
}

/// Flat request body used when the primary webhook call fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub full_name: String,
    pub contact: String,
    pub email: String,
    pub target_positions: Vec<String>,
    pub job_types: Vec<String>,
    pub job_level: String,
    pub preferences: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub timestamp: String,
    pub user_id: String,
}

impl AnalysisRequest {
    pub fn new(
        resume_text: String,
        details: PersonalDetails,
        prefs: JobPreferences,
        timestamp: String,
    ) -> Self {
        Self {
            resume_text,
            full_name: details.full_name,
            contact: details.contact,
            email: details.email,
            target_positions: prefs.target_positions,
            job_types: prefs.job_types,
            job_level: prefs.job_level,
            preferences: prefs.skills,
            preferred_locations: prefs.preferred_locations,
            timestamp,
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

/// Response envelope of the fallback analysis endpoint.
/// Every field is optional on the wire; a missing `success` reads as failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub timestamp: String,
}

impl AnalysisResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error_message: Some(message.into()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_details_complete_requires_name() {
        let mut details = PersonalDetails::default();
        assert!(!details.is_complete());
        details.full_name = "   ".into();
        assert!(!details.is_complete());
        details.full_name = "Jane Doe".into();
        assert!(details.is_complete());
    }

    #[test]
    fn test_preferences_valid_needs_locations_and_skills() {
        let mut prefs = JobPreferences {
            preferred_locations: vec!["Remote".into()],
            ..Default::default()
        };
        assert!(!prefs.is_valid());
        prefs.skills.push("Python".into());
        assert!(prefs.is_valid());
    }

    #[test]
    fn test_analysis_response_missing_success_is_failure() {
        let resp: AnalysisResponse = serde_json::from_str(r#"{"data": {"a": 1}}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.data.unwrap()["a"], 1);
    }

    #[test]
    fn test_analysis_request_maps_skills_to_preferences() {
        let req = AnalysisRequest::new(
            "text".into(),
            PersonalDetails {
                full_name: "Jane Doe".into(),
                ..Default::default()
            },
            JobPreferences {
                skills: vec!["Rust".into()],
                ..Default::default()
            },
            "2026-01-01T00:00:00Z".into(),
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["preferences"][0], "Rust");
        assert_eq!(json["user_id"], DEFAULT_USER_ID);
        assert_eq!(json["full_name"], "Jane Doe");
    }
}
