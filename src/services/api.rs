//! Verification Service Client
//!
//! HTTP implementation of the [`VerificationBackend`] seam over reqwest.
//! This module is the decode boundary: every response is folded into a
//! typed outcome or a core error here, and nothing above it ever sees a
//! status code or a loose JSON field. Upload responses in particular never
//! escape as errors: each failure mode becomes an
//! [`UploadOutcome::Rejected`] variant.
//!
//! The session rides on an HTTP-only cookie set by the service. The cookie
//! jar is primed from the session store at construction and the store is
//! refreshed whenever a login response sets cookies.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::SET_COOKIE;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use ledgerlens_core::{
    AnalysisReport, CoreError, CoreResult, Identity, InvoiceFile, InvoiceSummary, RejectReason,
    UploadOutcome, VerificationBackend,
};

use crate::storage::session_store::SessionStore;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the verification service
    pub base_url: String,
    /// Request timeout duration
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for the verification service.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    store: SessionStore,
}

impl ApiClient {
    /// Creates a new client, priming the cookie jar from the session store.
    pub fn new(config: ApiClientConfig, store: SessionStore) -> CoreResult<Self> {
        let base = normalize_base_url(&config.base_url)?;

        let jar = Arc::new(Jar::default());
        for cookie in store.load() {
            jar.add_cookie_str(&cookie, &base);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .cookie_provider(jar)
            .build()
            .map_err(|e| CoreError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, base, store })
    }

    fn endpoint(&self, path: &str) -> CoreResult<Url> {
        self.base
            .join(path)
            .map_err(|e| CoreError::config(format!("Invalid endpoint path '{path}': {e}")))
    }

    async fn get_decoded<T: DeserializeOwned>(&self, path: &str, what: &str) -> CoreResult<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;
        decode_json_response(status, &body, what)
    }
}

#[async_trait]
impl VerificationBackend for ApiClient {
    async fn upload_invoice(&self, file: &InvoiceFile, force_recheck: bool) -> UploadOutcome {
        let url = match self.endpoint("invoices/upload") {
            Ok(url) => url,
            Err(e) => return UploadOutcome::rejected_with(RejectReason::Network, e.to_string()),
        };

        let part = Part::bytes(file.contents.clone()).file_name(file.name.clone());
        let part = match part.mime_str(&file.mime) {
            Ok(part) => part,
            Err(e) => {
                return UploadOutcome::rejected_with(
                    RejectReason::Validation,
                    format!("Invalid MIME type '{}': {}", file.mime, e),
                )
            }
        };
        let mut form = Form::new().part("file", part);
        if force_recheck {
            form = form.text("force_recheck", "true");
        }

        debug!(file = %file.name, force_recheck, "uploading invoice");
        let response = match self.http.post(url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => return UploadOutcome::rejected_with(RejectReason::Network, e.to_string()),
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return UploadOutcome::rejected_with(RejectReason::Network, e.to_string()),
        };
        decode_upload_response(status, &body)
    }

    async fn analyze_invoice(&self, invoice_id: i64) -> CoreResult<AnalysisReport> {
        let url = self.endpoint(&format!("invoices/{invoice_id}/analyze"))?;
        debug!(invoice_id, "requesting analysis");
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;
        decode_json_response(status, &body, "analysis report")
    }

    async fn list_invoices(&self) -> CoreResult<Vec<InvoiceSummary>> {
        self.get_decoded("invoices/", "invoice list").await
    }

    async fn current_identity(&self) -> CoreResult<Option<Identity>> {
        let url = self.endpoint("auth/me")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;
        let status = response.status().as_u16();
        if status == 401 {
            return Ok(None);
        }
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;
        let me: MeResponse = decode_json_response(status, &body, "identity")?;
        Ok(Some(me.into_identity()))
    }

    async fn login(&self, email: &str, password: &str) -> CoreResult<()> {
        let url = self.endpoint("auth/login")?;
        let payload = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok().map(String::from))
            .collect();
        let body = response.text().await.unwrap_or_default();

        if status == 401 {
            let detail = error_detail(&body).unwrap_or_else(|| "Invalid credentials".to_string());
            return Err(CoreError::auth(detail));
        }
        if !(200..300).contains(&status) {
            return Err(server_error(status, &body));
        }

        if !cookies.is_empty() {
            if let Err(e) = self.store.save(&cookies) {
                warn!("failed to persist session cookies: {e}");
            }
        }
        Ok(())
    }

    async fn register(&self, email: &str, password: &str, display_name: &str) -> CoreResult<()> {
        let url = self.endpoint("auth/register")?;
        let payload = serde_json::json!({
            "email": email,
            "password": password,
            "full_name": display_name,
        });
        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        if !(200..300).contains(&status) {
            return Err(server_error(status, &body));
        }
        Ok(())
    }

    async fn logout(&self) -> CoreResult<()> {
        let url = self.endpoint("auth/logout")?;
        let result = self.http.post(url).send().await;

        // The stored session is forgotten regardless of what the network said.
        if let Err(e) = self.store.clear() {
            warn!("failed to clear stored session: {e}");
        }

        let response = result.map_err(|e| CoreError::network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        if !(200..300).contains(&status) && status != 401 {
            return Err(server_error(status, &body));
        }
        Ok(())
    }
}

// ============================================================================
// Wire shapes & decoding
// ============================================================================

#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    invoice_id: i64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    file_hash: Option<String>,
    #[serde(default)]
    file_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    id: i64,
    email: String,
    #[serde(default)]
    full_name: Option<String>,
}

impl MeResponse {
    fn into_identity(self) -> Identity {
        let display_name = self.full_name.unwrap_or_else(|| self.email.clone());
        Identity {
            id: self.id,
            email: self.email,
            display_name,
        }
    }
}

fn normalize_base_url(raw: &str) -> CoreResult<Url> {
    // A trailing slash makes Url::join treat the last segment as a directory.
    let mut normalized = raw.trim().trim_end_matches('/').to_string();
    normalized.push('/');
    Url::parse(&normalized)
        .map_err(|e| CoreError::config(format!("Invalid API base URL '{raw}': {e}")))
}

fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok().map(|e| e.detail)
}

fn server_error(status: u16, body: &str) -> CoreError {
    match error_detail(body) {
        Some(detail) => CoreError::server(detail),
        None => CoreError::server(format!("service returned status {status}")),
    }
}

/// Folds one upload response into an outcome. Total: every status code and
/// body shape maps to exactly one variant.
fn decode_upload_response(status: u16, body: &str) -> UploadOutcome {
    if status == 401 {
        return UploadOutcome::rejected(RejectReason::AuthExpired);
    }
    if !(200..300).contains(&status) {
        let reason = if (400..500).contains(&status) {
            RejectReason::Validation
        } else {
            RejectReason::ServerError
        };
        return match error_detail(body) {
            Some(detail) => UploadOutcome::rejected_with(reason, detail),
            None => UploadOutcome::rejected_with(
                RejectReason::ServerError,
                format!("service returned status {status}"),
            ),
        };
    }

    let parsed: UploadResponseBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return UploadOutcome::rejected_with(
                RejectReason::ServerError,
                format!("unusable response body: {e}"),
            )
        }
    };

    match parsed.status.as_deref() {
        Some("duplicate") => UploadOutcome::Duplicate {
            invoice_id: parsed.invoice_id,
            prior_file_hash: parsed.file_hash.unwrap_or_default(),
        },
        _ => UploadOutcome::Stored {
            invoice_id: parsed.invoice_id,
            file_hash: parsed.file_hash.unwrap_or_default(),
            file_type: parsed.file_type.unwrap_or_default(),
        },
    }
}

/// Decodes a non-upload JSON response, mapping 401 / refusals / unusable
/// bodies onto the core error taxonomy.
fn decode_json_response<T: DeserializeOwned>(status: u16, body: &str, what: &str) -> CoreResult<T> {
    if status == 401 {
        return Err(CoreError::auth("session expired"));
    }
    if !(200..300).contains(&status) {
        return Err(server_error(status, body));
    }
    serde_json::from_str(body).map_err(|e| CoreError::parse(format!("Failed to parse {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_core::Rejection;

    #[test]
    fn test_normalize_base_url_adds_trailing_slash() {
        let url = normalize_base_url("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
        let url = normalize_base_url("http://localhost:8000///").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_normalize_base_url_rejects_garbage() {
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn test_endpoint_joining() {
        let store = SessionStore::at_path(std::env::temp_dir().join("ll-api-test-session.json"));
        let client = ApiClient::new(
            ApiClientConfig {
                base_url: "http://localhost:8000/api".to_string(),
                ..Default::default()
            },
            store,
        )
        .unwrap();
        let url = client.endpoint("invoices/upload").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/invoices/upload");
    }

    #[test]
    fn test_decode_upload_stored() {
        let body = r#"{"invoice_id": 9, "status": "stored", "file_hash": "xyz", "file_type": "pdf"}"#;
        let outcome = decode_upload_response(200, body);
        assert_eq!(
            outcome,
            UploadOutcome::Stored {
                invoice_id: 9,
                file_hash: "xyz".into(),
                file_type: "pdf".into(),
            }
        );
    }

    #[test]
    fn test_decode_upload_duplicate() {
        let body = r#"{"invoice_id": 7, "status": "duplicate", "file_hash": "abc"}"#;
        let outcome = decode_upload_response(200, body);
        assert_eq!(
            outcome,
            UploadOutcome::Duplicate {
                invoice_id: 7,
                prior_file_hash: "abc".into(),
            }
        );
    }

    #[test]
    fn test_decode_upload_unknown_status_counts_as_stored() {
        let body = r#"{"invoice_id": 5, "status": "queued", "file_hash": "h", "file_type": "pdf"}"#;
        assert!(decode_upload_response(200, body).is_stored());
    }

    #[test]
    fn test_decode_upload_401() {
        let outcome = decode_upload_response(401, "");
        assert!(outcome.is_auth_expired());
    }

    #[test]
    fn test_decode_upload_structured_error() {
        let outcome = decode_upload_response(400, r#"{"detail": "Empty file"}"#);
        assert_eq!(
            outcome,
            UploadOutcome::Rejected(Rejection::with_detail(RejectReason::Validation, "Empty file"))
        );
    }

    #[test]
    fn test_decode_upload_unstructured_error() {
        let outcome = decode_upload_response(502, "<html>bad gateway</html>");
        match outcome {
            UploadOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectReason::ServerError);
                assert!(rejection.detail.unwrap().contains("502"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_upload_garbage_2xx_body() {
        let outcome = decode_upload_response(200, "not json");
        match outcome {
            UploadOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectReason::ServerError);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_json_response_classes() {
        let report: CoreResult<AnalysisReport> =
            decode_json_response(401, "", "analysis report");
        assert!(matches!(report, Err(CoreError::Auth(_))));

        let report: CoreResult<AnalysisReport> =
            decode_json_response(404, r#"{"detail": "Invoice not found"}"#, "analysis report");
        match report {
            Err(CoreError::Server(detail)) => assert_eq!(detail, "Invoice not found"),
            other => panic!("expected server error, got {other:?}"),
        }

        let report: CoreResult<AnalysisReport> =
            decode_json_response(200, "garbage", "analysis report");
        assert!(matches!(report, Err(CoreError::Parse(_))));

        let report: CoreResult<AnalysisReport> =
            decode_json_response(200, r#"{"invoice_id": 3}"#, "analysis report");
        assert_eq!(report.unwrap().invoice_id, 3);
    }

    #[test]
    fn test_me_response_falls_back_to_email() {
        let me = MeResponse {
            id: 1,
            email: "op@example.com".into(),
            full_name: None,
        };
        let identity = me.into_identity();
        assert_eq!(identity.display_name, "op@example.com");
    }

    #[tokio::test]
    async fn test_upload_network_failure_is_rejected_not_panicked() {
        // TEST-NET-1 (RFC 5737) is guaranteed non-routable.
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at_path(dir.path().join("session.json"));
        let client = ApiClient::new(
            ApiClientConfig {
                base_url: "http://192.0.2.1:1".to_string(),
                timeout: Duration::from_secs(1),
            },
            store,
        )
        .unwrap();

        let file = InvoiceFile::new("a.pdf", "application/pdf", vec![1]);
        let outcome = client.upload_invoice(&file, false).await;
        match outcome {
            UploadOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectReason::Network);
            }
            other => panic!("expected network rejection, got {other:?}"),
        }
    }
}
