//! Axum route handlers for the intake API.
//!
//! Each session-scoped handler loads the session, applies one step of the
//! intake and saves it back before responding.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::config::FieldLimits;
use crate::document_store::COLLECTIONS;
use crate::errors::AppError;
use crate::intake::analysis::{run_analysis, AnalysisOutcome};
use crate::intake::display::{
    format_char_count, render_links_markdown, render_recommendations_markdown, resume_preview,
};
use crate::intake::recommendations::{generate_job_recommendations, resume_tips, RecommendationInput};
use crate::intake::upload::{process_upload, UploadOutcome};
use crate::intake::validation::{
    enforce_max_counts, validate_all, validate_email, validate_phone, ValidationReport,
};
use crate::models::catalog::{
    all_standard_preferences, JOB_LEVELS, JOB_TYPES, STANDARD_LOCATIONS, STANDARD_POSITIONS,
};
use crate::models::profile::JobRecommendation;
use crate::models::resume::DocumentRow;
use crate::session::IntakeSession;
use crate::state::AppState;
use crate::webhook::UrlProbe;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session: IntakeSession,
    pub resume_preview: String,
    pub resume_char_count: String,
    pub links_markdown: String,
    pub details_complete: bool,
    pub preferences_valid: bool,
    pub analyzed: bool,
}

impl SessionView {
    fn from_session(session: IntakeSession) -> Self {
        Self {
            resume_preview: resume_preview(&session.raw_resume_text),
            resume_char_count: format_char_count(session.raw_resume_text.chars().count()),
            links_markdown: render_links_markdown(&session.extracted_links),
            details_complete: session.personal_details().is_complete(),
            preferences_valid: session.job_preferences().is_valid(),
            analyzed: session.is_analyzed(),
            session,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub locations: &'static [&'static str],
    pub positions: &'static [&'static str],
    pub job_types: &'static [&'static str],
    pub job_levels: &'static [&'static str],
    pub skills: Vec<&'static str>,
    pub limits: FieldLimits,
}

#[derive(Debug, Deserialize)]
pub struct WebhookStatusQuery {
    #[serde(default)]
    pub probe: bool,
}

#[derive(Debug, Serialize)]
pub struct WebhookStatusResponse {
    pub url: String,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probes: Option<Vec<UrlProbe>>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsUpdate {
    pub full_name: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub resume_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreferencesUpdate {
    pub preferred_locations: Option<Vec<String>>,
    pub target_positions: Option<Vec<String>>,
    pub job_types: Option<Vec<String>>,
    pub job_level: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct AddEntryResponse {
    pub added: String,
    pub entries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<JobRecommendation>,
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub tips: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_session(state: &AppState, id: Uuid) -> Result<IntakeSession, AppError> {
    state
        .sessions
        .load(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

async fn save_session(state: &AppState, session: &mut IntakeSession) -> Result<(), AppError> {
    session.touch();
    state.sessions.save(session).await
}

fn require_analysis(session: &IntakeSession) -> Result<(), AppError> {
    if session.is_analyzed() {
        Ok(())
    } else {
        Err(AppError::UnprocessableEntity(
            "Run an analysis before requesting results.".to_string(),
        ))
    }
}

fn check_choices(values: &[String], allowed: &[&str], label: &str) -> Result<(), AppError> {
    match values.iter().find(|v| !allowed.contains(&v.as_str())) {
        Some(bad) => Err(AppError::Validation(format!(
            "'{bad}' is not a valid {label}. Allowed: {}",
            allowed.join(", ")
        ))),
        None => Ok(()),
    }
}

fn check_collection(collection: &str) -> Result<(), AppError> {
    if COLLECTIONS.contains(&collection) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unknown collection '{collection}'. Expected one of: {}",
            COLLECTIONS.join(", ")
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/catalog
pub async fn handle_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        locations: STANDARD_LOCATIONS,
        positions: STANDARD_POSITIONS,
        job_types: JOB_TYPES,
        job_levels: JOB_LEVELS,
        skills: all_standard_preferences(),
        limits: state.config.limits,
    })
}

/// GET /api/v1/webhook/status
///
/// `?probe=true` also tries every configured alternative URL.
pub async fn handle_webhook_status(
    State(state): State<AppState>,
    Query(query): Query<WebhookStatusQuery>,
) -> Json<WebhookStatusResponse> {
    let reachable = state.webhook.test_connection().await;
    let probes = if query.probe {
        Some(
            state
                .webhook
                .probe_urls(&state.config.webhook.alternative_urls)
                .await,
        )
    } else {
        None
    };
    Json(WebhookStatusResponse {
        url: state.webhook.url().to_string(),
        reachable,
        probes,
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let session = IntakeSession::new();
    state.sessions.save(&session).await?;
    info!("Created session {}", session.id);
    Ok((StatusCode::CREATED, Json(SessionView::from_session(session))))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = load_session(&state, id).await?;
    Ok(Json(SessionView::from_session(session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// PUT /api/v1/sessions/:id/details
///
/// Only the fields present in the body are changed. Email and phone must pass
/// their format checks; blank values are accepted.
pub async fn handle_update_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DetailsUpdate>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state, id).await?;

    if let Some(email) = req.email {
        let email = email.trim();
        validate_email(email).map_err(AppError::Validation)?;
        session.email = email.to_string();
    }
    if let Some(contact) = req.contact {
        let contact = contact.trim();
        validate_phone(contact).map_err(AppError::Validation)?;
        session.contact = contact.to_string();
    }
    if let Some(name) = req.full_name {
        session.full_name = name.trim().to_string();
    }
    if let Some(text) = req.resume_text {
        session.raw_resume_text = text;
    }

    save_session(&state, &mut session).await?;
    Ok(Json(SessionView::from_session(session)))
}

/// PUT /api/v1/sessions/:id/preferences
///
/// Replaces the given selections. Lists longer than the configured limits are truncated.
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PreferencesUpdate>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state, id).await?;

    if let Some(job_types) = req.job_types {
        check_choices(&job_types, JOB_TYPES, "job type")?;
        session.selected_job_types = job_types;
    }
    if let Some(level) = req.job_level {
        if !level.is_empty() {
            check_choices(std::slice::from_ref(&level), JOB_LEVELS, "job level")?;
        }
        session.selected_job_level = level;
    }
    if let Some(locations) = req.preferred_locations {
        session.preferred_locations = locations;
    }
    if let Some(positions) = req.target_positions {
        session.target_positions = positions;
    }
    if let Some(skills) = req.skills {
        session.skills = skills;
    }
    enforce_max_counts(&mut session, &state.config.limits);

    save_session(&state, &mut session).await?;
    Ok(Json(SessionView::from_session(session)))
}

/// POST /api/v1/sessions/:id/locations
pub async fn handle_add_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<AddEntryResponse>), AppError> {
    let mut session = load_session(&state, id).await?;
    let added = session
        .add_custom_location(&req.value, &state.config.limits)
        .map_err(AppError::Validation)?;
    save_session(&state, &mut session).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddEntryResponse {
            added,
            entries: session.preferred_locations,
        }),
    ))
}

/// POST /api/v1/sessions/:id/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<AddEntryResponse>), AppError> {
    let mut session = load_session(&state, id).await?;
    let added = session
        .add_custom_skill(&req.value, &state.config.limits)
        .map_err(AppError::Validation)?;
    save_session(&state, &mut session).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddEntryResponse {
            added,
            entries: session.skills,
        }),
    ))
}

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload; the file goes in the `resume` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadOutcome>, AppError> {
    let mut session = load_session(&state, id).await?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("resume") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("The resume field must be a file".to_string()))?;
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((file_name, bytes));
        break;
    }
    let (file_name, bytes) = upload
        .ok_or_else(|| AppError::Validation("Missing multipart field 'resume'".to_string()))?;

    let outcome = process_upload(&mut session, &file_name, bytes, state.documents.as_ref()).await?;
    save_session(&state, &mut session).await?;
    Ok(Json(outcome))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File exceeds maximum allowed size (10MB)".to_string())
    } else {
        AppError::Validation(format!("Invalid file upload: {}", e.body_text()))
    }
}

/// DELETE /api/v1/sessions/:id/resume
pub async fn handle_clear_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = load_session(&state, id).await?;
    session.clear_resume();
    save_session(&state, &mut session).await?;
    Ok(Json(SessionView::from_session(session)))
}

/// POST /api/v1/sessions/:id/validate
///
/// Invalid list entries are dropped from the session as a side effect.
pub async fn handle_validate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ValidationReport>, AppError> {
    let mut session = load_session(&state, id).await?;
    let report = validate_all(&mut session, &state.config.limits);
    save_session(&state, &mut session).await?;
    Ok(Json(report))
}

/// POST /api/v1/sessions/:id/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let mut session = load_session(&state, id).await?;
    let result = run_analysis(
        &mut session,
        &state.webhook,
        state.documents.as_ref(),
        &state.config.limits,
        state.config.export_path.as_deref(),
    )
    .await;
    // Filtering and truncation stick even when the form was incomplete.
    save_session(&state, &mut session).await?;
    Ok(Json(result?))
}

/// GET /api/v1/sessions/:id/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let session = load_session(&state, id).await?;
    require_analysis(&session)?;

    let input = RecommendationInput {
        target_positions: &session.target_positions,
        skills: &session.skills,
        locations: &session.preferred_locations,
    };
    let mut rng = StdRng::from_entropy();
    let recommendations = generate_job_recommendations(&input, &mut rng, Utc::now().date_naive());
    let markdown = render_recommendations_markdown(&recommendations);

    Ok(Json(RecommendationsResponse {
        recommendations,
        markdown,
    }))
}

/// GET /api/v1/sessions/:id/tips
pub async fn handle_tips(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TipsResponse>, AppError> {
    let session = load_session(&state, id).await?;
    require_analysis(&session)?;
    Ok(Json(TipsResponse {
        tips: resume_tips(),
    }))
}

/// GET /api/v1/documents/:collection
pub async fn handle_list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<DocumentRow>>, AppError> {
    check_collection(&collection)?;
    Ok(Json(state.documents.list(&collection).await?))
}

/// GET /api/v1/documents/:collection/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    check_collection(&collection)?;
    state
        .documents
        .get(&collection, &id)
        .await?
        .map(|row| Json(row.data))
        .ok_or_else(|| AppError::NotFound(format!("Document {collection}/{id} not found")))
}
