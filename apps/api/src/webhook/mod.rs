//! Webhook client: the only outbound HTTP in the service.
//!
//! Analysis is delegated to an automation workflow behind a webhook URL. Calls
//! are never retried. When the primary call fails, one request in the flat
//! fallback format is sent instead, and if that fails too the caller carries on
//! with local analysis.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::WebhookConfig;
use crate::models::profile::{AnalysisRequest, AnalysisResponse};
use crate::session::IntakeSession;

pub mod payload;

const CONNECTION_TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Request timeout - backend took too long to respond")]
    Timeout,

    #[error("Connection error - unable to reach backend service")]
    Connect,

    #[error("Backend error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON response from backend")]
    Parse,

    #[error("Webhook returned an empty response")]
    Empty,

    #[error("Request failed: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for WebhookError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WebhookError::Timeout
        } else if e.is_connect() {
            WebhookError::Connect
        } else if e.is_decode() {
            WebhookError::Parse
        } else {
            WebhookError::Http(e)
        }
    }
}

/// Result of probing one candidate webhook URL.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UrlProbe {
    pub url: String,
    pub reachable: bool,
    /// "GET" or "POST": whichever request succeeded, if any.
    pub via: Option<&'static str>,
}

/// Outcome of [`WebhookClient::send_with_fallback`]. `data` is `None` when both attempts failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookOutcome {
    pub data: Option<Value>,
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
    fallback_url: String,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            fallback_url: config.fallback_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POSTs `payload` to the primary URL. Only a 200 carrying non-empty JSON counts as success.
    pub async fn send_user_data(&self, payload: &Value) -> Result<Value, WebhookError> {
        post_json(&self.client, &self.url, payload).await
    }

    /// Sends the flat fallback request. Never fails: every error is folded into
    /// an unsuccessful [`AnalysisResponse`].
    pub async fn send_analysis_request(&self, request: &AnalysisRequest) -> AnalysisResponse {
        info!("Sending fallback analysis request to {}", self.fallback_url);

        let response = match self.client.post(&self.fallback_url).json(request).send().await {
            Ok(r) => r,
            Err(e) => return AnalysisResponse::failure(WebhookError::from(e).to_string()),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return AnalysisResponse::failure(WebhookError::from(e).to_string()),
        };
        debug!("Fallback webhook responded {status}: {body}");

        if status != StatusCode::OK {
            return AnalysisResponse::failure(
                WebhookError::Status {
                    status: status.as_u16(),
                    body,
                }
                .to_string(),
            );
        }

        serde_json::from_str::<AnalysisResponse>(&body)
            .unwrap_or_else(|_| AnalysisResponse::failure(WebhookError::Parse.to_string()))
    }

    /// GET with a short timeout. 405 counts as reachable since webhooks often only accept POST.
    pub async fn test_connection(&self) -> bool {
        get_reachable(&self.client, &self.url).await
    }

    /// Tries each URL with a GET, then with a small test POST.
    pub async fn probe_urls(&self, urls: &[String]) -> Vec<UrlProbe> {
        let test_body = payload::connectivity_probe_payload();
        let mut results = Vec::with_capacity(urls.len());

        for url in urls {
            let via = if get_reachable(&self.client, url).await {
                Some("GET")
            } else if post_json(&self.client, url, &test_body).await.is_ok() {
                Some("POST")
            } else {
                None
            };
            info!("Webhook probe {url}: {}", if via.is_some() { "ok" } else { "failed" });
            results.push(UrlProbe {
                url: url.clone(),
                reachable: via.is_some(),
                via,
            });
        }
        results
    }

    /// Primary call, then the fallback format. Failures become warnings.
    pub async fn send_with_fallback(
        &self,
        session: &IntakeSession,
        now: chrono::DateTime<chrono::Utc>,
    ) -> WebhookOutcome {
        let mut warnings = Vec::new();

        let body = payload::build_user_payload(session, now);
        match self.send_user_data(&body).await {
            Ok(data) => {
                info!("Primary webhook accepted session {}", session.id);
                return WebhookOutcome {
                    data: Some(data),
                    warnings,
                };
            }
            Err(e) => {
                warn!("Primary webhook failed for session {}: {e}", session.id);
                warnings.push(format!("Webhook failed ({e}), trying fallback method..."));
            }
        }

        let request = payload::build_analysis_request(session, now);
        let response = self.send_analysis_request(&request).await;
        if response.success {
            info!("Fallback webhook accepted session {}", session.id);
            return WebhookOutcome {
                data: response.data,
                warnings,
            };
        }

        let reason = response
            .error_message
            .unwrap_or_else(|| "no error message returned".to_string());
        warn!("Fallback webhook failed for session {}: {reason}", session.id);
        warnings.push(format!("Webhook processing failed: {reason}"));
        warnings.push("Continuing with local analysis...".to_string());
        WebhookOutcome {
            data: None,
            warnings,
        }
    }
}

async fn post_json(client: &Client, url: &str, payload: &Value) -> Result<Value, WebhookError> {
    let body = serde_json::to_vec(payload).map_err(|_| WebhookError::Parse)?;
    info!("POST {url} ({} bytes)", body.len());

    let response = client
        .post(url)
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    debug!("Webhook responded {status}: {text}");

    if status != StatusCode::OK {
        return Err(WebhookError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    let value: Value = serde_json::from_str(&text).map_err(|_| WebhookError::Parse)?;
    if is_empty_json(&value) {
        return Err(WebhookError::Empty);
    }
    Ok(value)
}

async fn get_reachable(client: &Client, url: &str) -> bool {
    match client.get(url).timeout(CONNECTION_TEST_TIMEOUT).send().await {
        Ok(r) => matches!(r.status(), StatusCode::OK | StatusCode::METHOD_NOT_ALLOWED),
        Err(e) => {
            debug!("GET {url} failed: {e}");
            false
        }
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}
