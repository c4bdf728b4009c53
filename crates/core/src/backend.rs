//! Verification Backend Seam
//!
//! The async trait the workflow components drive. The application crate
//! implements it over HTTP; tests implement it with a scripted in-memory
//! double. Nothing above this trait sees a status code or a JSON body:
//! responses are already decoded into domain types by the time they cross
//! it.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::invoice::{InvoiceFile, InvoiceSummary};
use crate::outcome::UploadOutcome;
use crate::report::AnalysisReport;
use crate::session::Identity;

/// The remote verification service, as seen by the client workflow.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    /// Submit a document for verification.
    ///
    /// Never fails: every failure mode is folded into an
    /// [`UploadOutcome::Rejected`] variant at the decode boundary.
    async fn upload_invoice(&self, file: &InvoiceFile, force_recheck: bool) -> UploadOutcome;

    /// Run analysis for a stored invoice and return its report.
    ///
    /// Errors use the core taxonomy: `Auth` for 401, `Network` when the
    /// service is unreachable, `Server` with the verbatim message for
    /// structured refusals, `Parse` for unusable bodies.
    async fn analyze_invoice(&self, invoice_id: i64) -> CoreResult<AnalysisReport>;

    /// List previously processed invoices.
    async fn list_invoices(&self) -> CoreResult<Vec<InvoiceSummary>>;

    /// Probe the current session. `Ok(None)` means no live session.
    async fn current_identity(&self) -> CoreResult<Option<Identity>>;

    /// Establish a session. The service sets an HTTP-only cookie.
    async fn login(&self, email: &str, password: &str) -> CoreResult<()>;

    /// Create an account.
    async fn register(&self, email: &str, password: &str, display_name: &str) -> CoreResult<()>;

    /// End the current session.
    async fn logout(&self) -> CoreResult<()>;
}
