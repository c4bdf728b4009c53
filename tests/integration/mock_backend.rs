//! Scripted Verification Backend
//!
//! In-memory implementation of `VerificationBackend` for workflow tests.
//! Upload outcomes are scripted as a queue, analysis reports are keyed by
//! invoice id, and every call is recorded so tests can assert on exactly
//! what reached the network boundary.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ledgerlens_core::{
    AnalysisReport, CoreError, CoreResult, Identity, InvoiceFile, InvoiceSummary, RejectReason,
    UploadOutcome, VerificationBackend,
};

/// One recorded upload call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub name: String,
    pub size: usize,
    pub force_recheck: bool,
}

#[derive(Default)]
struct MockInner {
    upload_script: VecDeque<UploadOutcome>,
    reports: HashMap<i64, AnalysisReport>,
    analyze_auth_expired: bool,
    identity: Option<Identity>,
    uploads: Vec<RecordedUpload>,
    analyze_calls: Vec<i64>,
    delay: Option<Duration>,
}

pub struct MockBackend {
    inner: Mutex<MockInner>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MockInner::default()),
        }
    }

    /// Queue the outcome of the next upload call.
    pub fn script_upload(&self, outcome: UploadOutcome) {
        self.inner.lock().unwrap().upload_script.push_back(outcome);
    }

    /// Serve `report` for analysis requests against `invoice_id`.
    pub fn set_report_for(&self, invoice_id: i64, report: AnalysisReport) {
        self.inner.lock().unwrap().reports.insert(invoice_id, report);
    }

    /// Make every analysis call fail with a 401.
    pub fn expire_session_on_analyze(&self) {
        self.inner.lock().unwrap().analyze_auth_expired = true;
    }

    /// Establish a server-side session.
    pub fn sign_in(&self, identity: Identity) {
        self.inner.lock().unwrap().identity = Some(identity);
    }

    /// Delay every backend call, so tests can observe in-flight chains.
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.inner.lock().unwrap().uploads.clone()
    }

    pub fn upload_count(&self) -> usize {
        self.inner.lock().unwrap().uploads.len()
    }

    pub fn analyze_calls(&self) -> Vec<i64> {
        self.inner.lock().unwrap().analyze_calls.clone()
    }

    async fn maybe_delay(&self) {
        let delay = self.inner.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl VerificationBackend for MockBackend {
    async fn upload_invoice(&self, file: &InvoiceFile, force_recheck: bool) -> UploadOutcome {
        self.maybe_delay().await;
        let mut inner = self.inner.lock().unwrap();
        inner.uploads.push(RecordedUpload {
            name: file.name.clone(),
            size: file.size(),
            force_recheck,
        });
        inner
            .upload_script
            .pop_front()
            .unwrap_or_else(|| {
                UploadOutcome::rejected_with(RejectReason::Network, "unscripted upload call")
            })
    }

    async fn analyze_invoice(&self, invoice_id: i64) -> CoreResult<AnalysisReport> {
        self.maybe_delay().await;
        let mut inner = self.inner.lock().unwrap();
        inner.analyze_calls.push(invoice_id);
        if inner.analyze_auth_expired {
            return Err(CoreError::auth("session expired"));
        }
        inner
            .reports
            .get(&invoice_id)
            .cloned()
            .ok_or_else(|| CoreError::server("Invoice not found"))
    }

    async fn list_invoices(&self) -> CoreResult<Vec<InvoiceSummary>> {
        Ok(Vec::new())
    }

    async fn current_identity(&self) -> CoreResult<Option<Identity>> {
        Ok(self.inner.lock().unwrap().identity.clone())
    }

    async fn login(&self, _email: &str, _password: &str) -> CoreResult<()> {
        Ok(())
    }

    async fn register(&self, _email: &str, _password: &str, _name: &str) -> CoreResult<()> {
        Ok(())
    }

    async fn logout(&self) -> CoreResult<()> {
        self.inner.lock().unwrap().identity = None;
        Ok(())
    }
}

// ── Test data helpers ──────────────────────────────────────────────────

pub fn pdf_file(name: &str) -> InvoiceFile {
    InvoiceFile::new(name, "application/pdf", b"%PDF-1.4 test".to_vec())
}

pub fn stored(invoice_id: i64, file_hash: &str) -> UploadOutcome {
    UploadOutcome::Stored {
        invoice_id,
        file_hash: file_hash.to_string(),
        file_type: "pdf".to_string(),
    }
}

pub fn duplicate(invoice_id: i64, prior_file_hash: &str) -> UploadOutcome {
    UploadOutcome::Duplicate {
        invoice_id,
        prior_file_hash: prior_file_hash.to_string(),
    }
}

pub fn report_for(invoice_id: i64) -> AnalysisReport {
    serde_json::from_value(serde_json::json!({
        "invoice_id": invoice_id,
        "file_type": "pdf",
        "crypto": {
            "signature_present": true,
            "signature_integrity": "valid",
            "certificate_trust": "trusted",
            "signer_fingerprint": "AA:BB:CC"
        },
        "ai": {
            "status": "ok",
            "anomaly_score": 0.12,
            "risk_level": "LOW",
            "review_required": false
        },
        "rules": {
            "status": "ok",
            "word_count": 80,
            "line_item_count": 3,
            "line_item_sum": 60.0,
            "subtotal": 60.0,
            "tax": 7.8,
            "total": 67.8,
            "checks": {
                "subtotal_matches_items": true,
                "subtotal_delta": 0.0,
                "total_matches_subtotal_tax": true,
                "total_delta": 0.0
            }
        }
    }))
    .expect("test report must decode")
}

pub fn operator() -> Identity {
    Identity {
        id: 1,
        email: "op@example.com".to_string(),
        display_name: "Operator".to_string(),
    }
}
