use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::models::profile::AnalysisRequest;
use crate::session::IntakeSession;

/// Body sent to the primary analysis webhook.
pub fn build_user_payload(session: &IntakeSession, now: DateTime<Utc>) -> Value {
    json!({
        "resume_text": session.raw_resume_text,
        "full_name": session.full_name,
        "email": session.email,
        "contact": session.contact,
        "preferred_locations": session.preferred_locations,
        "target_positions": session.target_positions,
        "skills": session.skills,
        "selected_job_types": session.selected_job_types,
        "selected_job_level": session.selected_job_level,
        "resume_file_name": session.resume_file_name.clone().unwrap_or_default(),
        "document_id": session.document_id.clone().unwrap_or_default(),
        "timestamp": now.to_rfc3339(),
    })
}

/// Body sent to the fallback endpoint when the primary call fails.
pub fn build_analysis_request(session: &IntakeSession, now: DateTime<Utc>) -> AnalysisRequest {
    AnalysisRequest::new(
        session.raw_resume_text.clone(),
        session.personal_details(),
        session.job_preferences(),
        now.to_rfc3339(),
    )
}

/// Minimal body used when probing whether a URL accepts POSTs.
pub fn connectivity_probe_payload() -> Value {
    json!({
        "test": true,
        "message": "URL connectivity test",
    })
}
