//! Resume upload pipeline: file checks, text extraction, cleaning, persistence
//! and local analysis.

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::document_store::{DocumentStore, RESUMES_COLLECTION};
use crate::errors::AppError;
use crate::intake::documents::{extract_document, ExtractedDocument, ExtractionError, FileKind};
use crate::intake::extraction::analyze_resume_local;
use crate::intake::resume_text::{clean_resume_text, derive_document_id, validate_resume_text};
use crate::intake::validation::{validate_file_upload, MAX_UPLOAD_BYTES};
use crate::models::profile::LocalAnalysis;
use crate::models::resume::{ResumeDocument, ResumeLinks, ResumeMetadata};
use crate::session::IntakeSession;

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub file_name: String,
    /// False when the text failed the resume checks; it is stored anyway.
    pub accepted: bool,
    pub char_count: usize,
    pub links: ResumeLinks,
    pub document_id: Option<String>,
    pub analysis: Option<LocalAnalysis>,
    pub warnings: Vec<String>,
}

/// Runs the whole upload against `session`, mutating it in place.
///
/// Hard failures (size, type, unreadable file) are errors and leave the session
/// untouched. A text that does not look like a resume is still stored, with the
/// reason returned as a warning and no analysis run.
pub async fn process_upload(
    session: &mut IntakeSession,
    file_name: &str,
    bytes: Bytes,
    documents: &dyn DocumentStore,
) -> Result<UploadOutcome, AppError> {
    if let Err(message) = validate_file_upload(file_name, bytes.len()) {
        return Err(if bytes.len() > MAX_UPLOAD_BYTES {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::Validation(message)
        });
    }

    let kind = FileKind::from_file_name(file_name)?;
    info!("Extracting {kind:?} resume '{file_name}' ({} bytes)", bytes.len());

    let ExtractedDocument { text, links } =
        tokio::task::spawn_blocking(move || extract_document(kind, &bytes))
            .await
            .map_err(|e| ExtractionError::Pdf(format!("extraction task failed: {e}")))??;

    let cleaned = clean_resume_text(&text);
    session.raw_resume_text = cleaned.clone();
    session.extracted_links = links.clone();
    session.touch();

    let mut outcome = UploadOutcome {
        file_name: file_name.to_string(),
        accepted: false,
        char_count: cleaned.chars().count(),
        links,
        document_id: None,
        analysis: None,
        warnings: Vec::new(),
    };

    if let Err(reason) = validate_resume_text(&cleaned) {
        warn!("Uploaded text for session {} rejected: {reason}", session.id);
        outcome.warnings.push(reason);
        return Ok(outcome);
    }
    outcome.accepted = true;

    let now = Utc::now();
    let document_id = derive_document_id(file_name, now.naive_utc());
    let document = ResumeDocument {
        filename: file_name.to_string(),
        links: outcome.links.clone(),
        metadata: ResumeMetadata {
            text_content: cleaned.clone(),
        },
        uploaded_at: now,
    };
    match documents
        .save(RESUMES_COLLECTION, &document_id, &serde_json::to_value(&document)?)
        .await
    {
        Ok(id) => {
            info!("Resume stored as {RESUMES_COLLECTION}/{id}");
            session.document_id = Some(id.clone());
            outcome.document_id = Some(id);
        }
        Err(e) => {
            warn!("Failed to store resume document: {e}");
            outcome
                .warnings
                .push(format!("Resume could not be saved to the database: {e}"));
        }
    }
    session.resume_file_name = Some(file_name.to_string());

    let analysis = analyze_resume_local(&cleaned, &session.target_positions);
    session.apply_analysis(&analysis);
    outcome.analysis = Some(analysis);

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::memory::MemoryDocumentStore;

    const RESUME: &str = "Jane Doe\njane@example.com | 555-123-4567\nAustin TX\n\n\
        Experience\nSoftware engineer building Rust services.\n\nEducation\nB.S. Computer Science\n\n\
        Skills\nRust, Python, Docker";

    #[tokio::test]
    async fn test_txt_upload_runs_analysis_and_stores_document() {
        let store = MemoryDocumentStore::default();
        let mut session = IntakeSession::new();

        let outcome = process_upload(&mut session, "Jane CV.txt", Bytes::from_static(RESUME.as_bytes()), &store)
            .await
            .unwrap();

        assert!(outcome.accepted);
        assert!(outcome.warnings.is_empty());
        assert_eq!(session.full_name, "Jane Doe");
        assert_eq!(session.email, "jane@example.com");
        assert_eq!(session.preferred_locations, vec!["Austin TX"]);
        assert_eq!(session.resume_file_name.as_deref(), Some("Jane CV.txt"));

        let id = session.document_id.clone().unwrap();
        assert!(id.starts_with("Jane_CV_"));
        let row = store.get(RESUMES_COLLECTION, &id).await.unwrap().unwrap();
        assert_eq!(row.data["filename"], "Jane CV.txt");
        assert!(row.data["metadata"]["text_content"]
            .as_str()
            .unwrap()
            .contains("Experience"));
    }

    #[tokio::test]
    async fn test_non_resume_text_is_kept_with_warning() {
        let store = MemoryDocumentStore::default();
        let mut session = IntakeSession::new();
        let text = "This is a shopping list with apples, bananas, bread and plenty of milk today.";

        let outcome = process_upload(&mut session, "list.txt", Bytes::copy_from_slice(text.as_bytes()), &store)
            .await
            .unwrap();

        assert!(!outcome.accepted);
        assert_eq!(
            outcome.warnings,
            vec!["Text doesn't appear to be a resume (missing common resume keywords)"]
        );
        assert!(!session.raw_resume_text.is_empty());
        assert!(session.document_id.is_none());
        assert!(session.analyzed_data.is_none());
        assert!(store.list(RESUMES_COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_becomes_warning() {
        let store = MemoryDocumentStore::failing();
        let mut session = IntakeSession::new();

        let outcome = process_upload(&mut session, "cv.txt", Bytes::from_static(RESUME.as_bytes()), &store)
            .await
            .unwrap();

        assert!(outcome.accepted);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(session.document_id.is_none());
        assert_eq!(session.full_name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_type() {
        let store = MemoryDocumentStore::default();
        let mut session = IntakeSession::new();
        let err = process_upload(&mut session, "cv.rtf", Bytes::from_static(b"text"), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(session.raw_resume_text.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let store = MemoryDocumentStore::default();
        let mut session = IntakeSession::new();
        let err = process_upload(&mut session, "cv.txt", Bytes::from(vec![b'a'; MAX_UPLOAD_BYTES + 1]), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn test_empty_file_is_extraction_error() {
        let store = MemoryDocumentStore::default();
        let mut session = IntakeSession::new();
        let err = process_upload(&mut session, "cv.txt", Bytes::new(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(ExtractionError::EmptyFile)));
    }
}
