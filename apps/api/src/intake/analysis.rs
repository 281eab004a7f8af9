use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::config::FieldLimits;
use crate::document_store::{DocumentStore, PROFILES_COLLECTION};
use crate::errors::AppError;
use crate::intake::display::{summarize_webhook_response, WebhookSummary};
use crate::intake::export::{emit_export, UserDataExport};
use crate::intake::extraction::analyze_resume_local;
use crate::intake::validation::validate_form_before_analysis;
use crate::models::profile::LocalAnalysis;
use crate::session::IntakeSession;
use crate::webhook::WebhookClient;

pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill in all required fields before analysis.";

/// Reply keys that carry profile fields.
const PROFILE_KEYS: &[&str] = &["name", "email", "phone", "contact", "preferred_location", "location"];

/// Where the fields written to the form came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Webhook,
    Local,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis: LocalAnalysis,
    pub source: AnalysisSource,
    pub backend_data: Option<Value>,
    pub webhook_summary: Option<WebhookSummary>,
    pub profile_id: Option<String>,
    pub warnings: Vec<String>,
}

/// Document written to the `profiles` collection after each analysis.
fn profile_document(session: &IntakeSession) -> Value {
    json!({
        "session_id": session.id,
        "personal_details": session.personal_details(),
        "job_preferences": session.job_preferences(),
        "analysis": session.analyzed_data,
        "backend_data": session.backend_data,
        "resume_document_id": session.document_id,
        "resume_file_name": session.resume_file_name,
        "extracted_links": session.extracted_links,
        "updated_at": Utc::now(),
    })
}

/// Profile fields of a webhook reply.
///
/// The reply is either the field object itself or `{"success": .., "data": {..}}`.
/// `None` when the reply says `success: false` or names none of [`PROFILE_KEYS`].
fn webhook_fields(reply: &Value) -> Option<&Map<String, Value>> {
    if reply.get("success").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    let fields = match reply.get("data") {
        Some(Value::Object(data)) => data,
        _ => reply.as_object()?,
    };
    PROFILE_KEYS
        .iter()
        .any(|&key| text_field(fields, &[key]).is_some())
        .then_some(fields)
}

fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Overlays webhook fields on `analysis`. Fields the reply omits keep their extracted value.
fn merge_webhook_fields(mut analysis: LocalAnalysis, fields: &Map<String, Value>) -> LocalAnalysis {
    if let Some(name) = text_field(fields, &["name"]) {
        analysis.name = name;
    }
    if let Some(email) = text_field(fields, &["email"]) {
        analysis.email = email;
    }
    if let Some(phone) = text_field(fields, &["phone", "contact"]) {
        analysis.phone = phone;
    }
    if let Some(location) = text_field(fields, &["preferred_location", "location"]) {
        analysis.preferred_location = location;
    }
    if let Some(Value::Object(matches)) = fields.get("position_matches") {
        for (position, score) in matches {
            if let Some(score) = score.as_u64() {
                analysis.position_matches.insert(position.clone(), score.min(100) as u32);
            }
        }
    }
    analysis
}

/// Full analysis of a session.
///
/// Fields from a successful webhook reply drive the form. Local extraction is
/// the fallback when every attempt failed or the reply carried no fields.
/// Only an incomplete form is an error; webhook, storage and export failures
/// are reported as warnings.
pub async fn run_analysis(
    session: &mut IntakeSession,
    webhook: &WebhookClient,
    documents: &dyn DocumentStore,
    limits: &FieldLimits,
    export_path: Option<&Path>,
) -> Result<AnalysisOutcome, AppError> {
    if !validate_form_before_analysis(session, limits) {
        return Err(AppError::Validation(INCOMPLETE_FORM_MESSAGE.to_string()));
    }
    info!("Analyzing session {}", session.id);

    let webhook_outcome = webhook.send_with_fallback(session, Utc::now()).await;
    let mut warnings = webhook_outcome.warnings;
    session.backend_data = webhook_outcome.data.clone();

    let local = analyze_resume_local(&session.raw_resume_text, &session.target_positions);
    let (analysis, source) = match webhook_outcome.data.as_ref().and_then(webhook_fields) {
        Some(fields) => (merge_webhook_fields(local, fields), AnalysisSource::Webhook),
        None => {
            if let Some(reply) = &webhook_outcome.data {
                if reply.get("success").and_then(Value::as_bool) == Some(false) {
                    let reason = reply
                        .get("error_message")
                        .and_then(Value::as_str)
                        .unwrap_or("no error message returned");
                    warn!("Webhook reported failure for session {}: {reason}", session.id);
                    warnings.push(format!("Webhook analysis failed: {reason}"));
                    warnings.push("Continuing with local analysis...".to_string());
                }
            }
            (local, AnalysisSource::Local)
        }
    };
    info!("Session {} analysed from {source:?} data", session.id);
    session.apply_analysis(&analysis);
    session.analyzed_data = Some(analysis.clone());
    session.touch();

    let profile_id = match documents
        .save(PROFILES_COLLECTION, &session.id.to_string(), &profile_document(session))
        .await
    {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Failed to save profile for session {}: {e}", session.id);
            warnings.push(format!("Profile could not be saved to the database: {e}"));
            None
        }
    };

    emit_export(&UserDataExport::from_session(session), export_path).await;

    Ok(AnalysisOutcome {
        analysis,
        source,
        webhook_summary: webhook_outcome.data.as_ref().map(summarize_webhook_response),
        backend_data: webhook_outcome.data,
        profile_id,
        warnings,
    })
}
