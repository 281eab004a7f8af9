pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::intake::handlers;
use crate::intake::validation::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(handlers::handle_catalog))
        .route("/api/v1/webhook/status", get(handlers::handle_webhook_status))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/details",
            put(handlers::handle_update_details),
        )
        .route(
            "/api/v1/sessions/:id/preferences",
            put(handlers::handle_update_preferences),
        )
        .route(
            "/api/v1/sessions/:id/locations",
            post(handlers::handle_add_location),
        )
        .route("/api/v1/sessions/:id/skills", post(handlers::handle_add_skill))
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_upload_resume)
                .delete(handlers::handle_clear_resume)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/api/v1/sessions/:id/validate", post(handlers::handle_validate))
        .route("/api/v1/sessions/:id/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/sessions/:id/recommendations",
            get(handlers::handle_recommendations),
        )
        .route("/api/v1/sessions/:id/tips", get(handlers::handle_tips))
        // Stored documents
        .route(
            "/api/v1/documents/:collection",
            get(handlers::handle_list_documents),
        )
        .route(
            "/api/v1/documents/:collection/:id",
            get(handlers::handle_get_document),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, FieldLimits, WebhookConfig};
    use crate::document_store::memory::MemoryDocumentStore;
    use crate::session::store::memory::MemorySessionStore;
    use crate::webhook::WebhookClient;

    const BOUNDARY: &str = "cvlens-test-boundary";
    const RESUME: &str = "Jane Doe\njane@example.com | 555-123-4567\nDenver CO\n\n\
        Experience\nBackend engineer at a logistics company.\n\nEducation\nB.S. Physics\n\n\
        Skills\nRust, Go, PostgreSQL";

    fn app(server: &MockServer) -> Router {
        let webhook = WebhookConfig {
            url: server.url("/hook"),
            fallback_url: server.url("/fallback"),
            alternative_urls: vec![server.url("/hook")],
            timeout_secs: 5,
        };
        let config = Config {
            database_url: String::new(),
            redis_url: String::new(),
            webhook: webhook.clone(),
            session_ttl_secs: 60,
            limits: FieldLimits::default(),
            export_path: None,
            port: 0,
            rust_log: "info".to_string(),
        };
        build_router(AppState {
            webhook: WebhookClient::new(&webhook).unwrap(),
            config,
            sessions: Arc::new(MemorySessionStore::default()),
            documents: Arc::new(MemoryDocumentStore::default()),
        })
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn upload_request(uri: &str, file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/plain\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send(app, empty_request("POST", "/api/v1/sessions")).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start_async().await;
        let (status, body) = send(&app(&server), empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "cvlens");
    }

    #[tokio::test]
    async fn test_catalog_lists_options_and_limits() {
        let server = MockServer::start_async().await;
        let (status, body) = send(&app(&server), empty_request("GET", "/api/v1/catalog")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_types"].as_array().unwrap().len(), 4);
        assert_eq!(body["job_levels"].as_array().unwrap().len(), 3);
        assert_eq!(body["limits"]["max_skills"], 10);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let server = MockServer::start_async().await;
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app(&server), empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let server = MockServer::start_async().await;
        let app = app(&server);
        let id = create_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");

        let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_location_rejects_course_name() {
        let server = MockServer::start_async().await;
        let app = app(&server);
        let id = create_session(&app).await;

        let uri = format!("/api/v1/sessions/{id}/locations");
        let (status, body) = send(
            &app,
            json_request("POST", &uri, json!({"value": "Data Science"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(
            &app,
            json_request("POST", &uri, json!({"value": "Portland, OR"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["entries"], json!(["Portland, OR"]));
    }

    #[tokio::test]
    async fn test_details_are_trimmed_before_validation() {
        let server = MockServer::start_async().await;
        let app = app(&server);
        let id = create_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}/details");

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &uri,
                json!({"email": "jane@example.com ", "contact": " 555-123-4567\t"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["email"], "jane@example.com");
        assert_eq!(body["session"]["contact"], "555-123-4567");

        let (status, _) = send(
            &app,
            json_request("PUT", &uri, json!({"email": " not-an-email "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preferences_are_truncated_and_checked() {
        let server = MockServer::start_async().await;
        let app = app(&server);
        let id = create_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}/preferences");

        let skills: Vec<String> = (0..15).map(|i| format!("Skill {i}")).collect();
        let (status, body) = send(
            &app,
            json_request("PUT", &uri, json!({"skills": skills, "job_level": "Mid Level"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["skills"].as_array().unwrap().len(), 10);

        let (status, _) = send(
            &app,
            json_request("PUT", &uri, json!({"job_types": ["Gig"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let server = MockServer::start_async().await;
        let app = app(&server);
        let id = create_session(&app).await;

        let uri = format!("/api/v1/sessions/{id}/resume");
        let (status, body) = send(&app, upload_request(&uri, "cv.odt", RESUME)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("not supported"));
    }

    #[tokio::test]
    async fn test_upload_of_non_resume_text_is_kept_with_warning() {
        let server = MockServer::start_async().await;
        let app = app(&server);
        let id = create_session(&app).await;

        let uri = format!("/api/v1/sessions/{id}/resume");
        let text = "This is a shopping list with apples, bananas, bread and plenty of milk today.";
        let (status, body) = send(&app, upload_request(&uri, "list.txt", text)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["accepted"], false);
        assert_eq!(
            body["warnings"],
            json!(["Text doesn't appear to be a resume (missing common resume keywords)"])
        );
        assert!(body["document_id"].is_null());
        assert!(body["analysis"].is_null());

        let (_, body) = send(&app, empty_request("GET", &format!("/api/v1/sessions/{id}"))).await;
        assert_ne!(body["resume_char_count"], "0");
        assert!(body["session"]["raw_resume_text"]
            .as_str()
            .unwrap()
            .contains("shopping list"));
        assert_eq!(body["analyzed"], false);
    }

    #[tokio::test]
    async fn test_results_require_analysis() {
        let server = MockServer::start_async().await;
        let app = app(&server);
        let id = create_session(&app).await;

        for path in ["recommendations", "tips"] {
            let uri = format!("/api/v1/sessions/{id}/{path}");
            let (status, _) = send(&app, empty_request("GET", &uri)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn test_unknown_collection_is_rejected() {
        let server = MockServer::start_async().await;
        let app = app(&server);

        for uri in ["/api/v1/documents/secrets", "/api/v1/documents/secrets/abc"] {
            let (status, body) = send(&app, empty_request("GET", uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }

        let (status, _) = send(&app, empty_request("GET", "/api/v1/documents/resumes/abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_webhook_status_with_probe() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/hook");
                then.status(405);
            })
            .await;

        let (status, body) = send(
            &app(&server),
            empty_request("GET", "/api/v1/webhook/status?probe=true"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reachable"], true);
        assert_eq!(body["probes"][0]["via"], "GET");
    }

    #[tokio::test]
    async fn test_full_intake_flow() {
        let server = MockServer::start_async().await;
        let hook = server
            .mock_async(|when, then| {
                when.method(POST).path("/hook");
                then.status(200)
                    .json_body(json!({"success": true, "data": {"name": "Jane Doe"}}));
            })
            .await;
        let app = app(&server);
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            upload_request(&format!("/api/v1/sessions/{id}/resume"), "jane.txt", RESUME),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["accepted"], true);
        assert_eq!(body["analysis"]["email"], "jane@example.com");
        assert_eq!(body["analysis"]["name"], "Jane Doe");
        let document_id = body["document_id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/v1/sessions/{id}/preferences"),
                json!({"skills": ["Rust", "Go"], "target_positions": ["Backend Engineer"]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            empty_request("POST", &format!("/api/v1/sessions/{id}/analyze")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        hook.assert_async().await;
        assert_eq!(body["source"], "webhook");
        assert_eq!(body["analysis"]["name"], "Jane Doe");
        assert_eq!(body["analysis"]["email"], "jane@example.com");
        assert_eq!(body["analysis"]["preferred_location"], "Denver CO");
        assert_eq!(body["analysis"]["position_matches"]["Backend Engineer"], 75);

        let (status, body) = send(
            &app,
            empty_request("GET", &format!("/api/v1/sessions/{id}/recommendations")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let jobs = body["recommendations"].as_array().unwrap();
        assert!((8..=12).contains(&jobs.len()));
        assert_eq!(jobs[0]["location"], "Denver CO");
        assert!(body["markdown"].as_str().unwrap().contains("Job Recommendations"));

        let (_, body) = send(
            &app,
            empty_request("GET", &format!("/api/v1/sessions/{id}/tips")),
        )
        .await;
        assert_eq!(body["tips"].as_array().unwrap().len(), 5);

        let (status, body) = send(
            &app,
            empty_request("GET", &format!("/api/v1/documents/resumes/{document_id}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "jane.txt");

        let (_, body) = send(&app, empty_request("GET", "/api/v1/documents/profiles")).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}
