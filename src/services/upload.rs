//! Upload Coordinator
//!
//! Drives the submit → duplicate-check → resolve → analyze sequence as an
//! explicit state machine: `idle → uploading → {stored, duplicate,
//! rejected} → (optionally) analyzing → {report, rejected}`.
//!
//! The coordinator owns the single upload slot: at most one chain is in
//! flight at a time, and a second submission is refused synchronously with
//! a busy error instead of being queued or interleaved. Each chain carries
//! an epoch; abandoning a chain bumps the epoch and cancels the in-flight
//! call, so a late result can only be discarded, never applied to a
//! superseded chain.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ledgerlens_core::{
    AnalysisReport, CoreError, CoreResult, DuplicateResolution, InvoiceFile, NavigationIntent,
    OutcomeToken, RejectReason, ResolutionOutcome, TrackedOutcome, UploadOutcome,
    VerificationBackend,
};

/// Options for one submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitOptions {
    /// Ask the service to re-verify even if it has seen the content before
    pub force_recheck: bool,
}

/// The pending duplicate a chain is parked on, as shown to the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDuplicateInfo {
    pub token: OutcomeToken,
    pub invoice_id: i64,
    pub prior_file_hash: String,
}

/// Where the current chain is.
#[derive(Debug)]
enum ChainPhase {
    Idle,
    Uploading,
    AwaitingResolution(PendingDuplicate),
    Analyzing { invoice_id: i64 },
}

impl ChainPhase {
    fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// A duplicate outcome waiting for the operator's decision.
///
/// Keeps the original file so a recheck resubmits the exact same bytes.
#[derive(Debug)]
struct PendingDuplicate {
    token: OutcomeToken,
    invoice_id: i64,
    prior_file_hash: String,
    original: InvoiceFile,
}

#[derive(Debug)]
struct Inner {
    phase: ChainPhase,
    epoch: u64,
    cancel: CancellationToken,
}

/// Sequences uploads, duplicate resolutions, and analysis requests against
/// the verification backend.
pub struct UploadCoordinator {
    backend: Arc<dyn VerificationBackend>,
    inner: Mutex<Inner>,
}

impl UploadCoordinator {
    /// Create a coordinator with a free upload slot.
    pub fn new(backend: Arc<dyn VerificationBackend>) -> Self {
        Self {
            backend,
            inner: Mutex::new(Inner {
                phase: ChainPhase::Idle,
                epoch: 0,
                cancel: CancellationToken::new(),
            }),
        }
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| CoreError::internal("coordinator state lock poisoned"))
    }

    /// Submit a document for verification.
    ///
    /// Files whose declared type is outside the accepted set are rejected
    /// before any network call. A submission while another chain is in
    /// flight fails with [`CoreError::Busy`]; the rejected attempt is not
    /// queued.
    pub async fn submit_document(
        &self,
        file: InvoiceFile,
        options: SubmitOptions,
    ) -> CoreResult<TrackedOutcome> {
        let (epoch, cancel) = {
            let mut inner = self.lock()?;
            if !inner.phase.is_idle() {
                return Err(CoreError::busy(
                    "an upload or analysis chain is already in flight",
                ));
            }
            if file.kind().is_none() {
                debug!(file = %file.name, mime = %file.mime, "rejected before upload");
                return Ok(TrackedOutcome::new(UploadOutcome::rejected_with(
                    RejectReason::UnsupportedType,
                    format!(
                        "'{}' is not an accepted type (pdf, png, jpeg)",
                        file.mime
                    ),
                )));
            }
            inner.epoch += 1;
            inner.cancel = CancellationToken::new();
            inner.phase = ChainPhase::Uploading;
            (inner.epoch, inner.cancel.clone())
        };

        self.perform_upload(file, options.force_recheck, epoch, cancel)
            .await
    }

    /// Resolve the pending duplicate outcome identified by `token`.
    ///
    /// A resolution is only accepted while its originating duplicate is
    /// still the most recent outcome; anything else is stale and refused
    /// without side effects.
    pub async fn resolve_duplicate(
        &self,
        token: OutcomeToken,
        decision: DuplicateResolution,
    ) -> CoreResult<ResolutionOutcome> {
        let (pending, epoch, cancel) = {
            let mut inner = self.lock()?;
            let matches_pending =
                matches!(&inner.phase, ChainPhase::AwaitingResolution(p) if p.token == token);
            if !matches_pending {
                return Err(CoreError::validation(
                    "duplicate resolution no longer matches a pending outcome",
                ));
            }
            let ChainPhase::AwaitingResolution(pending) =
                std::mem::replace(&mut inner.phase, ChainPhase::Idle)
            else {
                return Err(CoreError::internal("coordinator phase changed underfoot"));
            };

            match decision {
                DuplicateResolution::ViewPrevious => {
                    debug!(invoice_id = pending.invoice_id, "viewing previous invoice");
                    return Ok(ResolutionOutcome::Navigate(NavigationIntent::Analysis {
                        invoice_id: pending.invoice_id,
                    }));
                }
                DuplicateResolution::Cancel => {
                    debug!("pending upload discarded");
                    return Ok(ResolutionOutcome::Cancelled);
                }
                DuplicateResolution::Recheck => {
                    inner.epoch += 1;
                    inner.cancel = CancellationToken::new();
                    inner.phase = ChainPhase::Uploading;
                    (pending, inner.epoch, inner.cancel.clone())
                }
            }
        };

        // Recheck resubmits the original file; the fresh outcome replaces
        // the duplicate.
        let tracked = self
            .perform_upload(pending.original, true, epoch, cancel)
            .await?;
        Ok(ResolutionOutcome::Resubmitted(tracked))
    }

    /// Run analysis for the invoice stored by `stored`.
    ///
    /// Only legal from a `Stored` outcome (directly, or via a successful
    /// recheck); anything else never reaches the network.
    pub async fn trigger_analysis(&self, stored: &TrackedOutcome) -> CoreResult<AnalysisReport> {
        let UploadOutcome::Stored { invoice_id, .. } = &stored.outcome else {
            return Err(CoreError::validation(
                "analysis can only be triggered from a stored outcome",
            ));
        };
        self.run_analysis(*invoice_id).await
    }

    /// Run analysis for an already-stored invoice (the standalone entry
    /// point used by the analysis view). Occupies the upload slot.
    pub async fn run_analysis(&self, invoice_id: i64) -> CoreResult<AnalysisReport> {
        let (epoch, cancel) = {
            let mut inner = self.lock()?;
            if !inner.phase.is_idle() {
                return Err(CoreError::busy(
                    "an upload or analysis chain is already in flight",
                ));
            }
            inner.epoch += 1;
            inner.cancel = CancellationToken::new();
            inner.phase = ChainPhase::Analyzing { invoice_id };
            (inner.epoch, inner.cancel.clone())
        };

        debug!(invoice_id, "analysis started");
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(CoreError::internal("analysis was abandoned")),
            result = self.backend.analyze_invoice(invoice_id) => result,
        };

        {
            let mut inner = self.lock()?;
            if inner.epoch != epoch {
                debug!(invoice_id, "analysis result discarded: chain superseded");
                return Err(CoreError::internal(
                    "analysis result discarded: chain superseded",
                ));
            }
            inner.phase = ChainPhase::Idle;
        }

        let report = result?;
        if report.invoice_id != invoice_id {
            warn!(
                requested = invoice_id,
                received = report.invoice_id,
                "analysis report for wrong invoice"
            );
            return Err(CoreError::parse(format!(
                "report is for invoice {}, requested {}",
                report.invoice_id, invoice_id
            )));
        }
        Ok(report)
    }

    /// Abandon whatever chain is in flight.
    ///
    /// The in-flight call is cancelled and any result that still arrives
    /// for the old epoch is discarded rather than applied.
    pub fn abandon(&self) -> CoreResult<()> {
        let mut inner = self.lock()?;
        if !inner.phase.is_idle() {
            debug!("abandoning in-flight chain");
        }
        inner.epoch += 1;
        inner.cancel.cancel();
        inner.phase = ChainPhase::Idle;
        Ok(())
    }

    /// The duplicate the chain is parked on, if any.
    pub fn pending_duplicate(&self) -> CoreResult<Option<PendingDuplicateInfo>> {
        let inner = self.lock()?;
        Ok(match &inner.phase {
            ChainPhase::AwaitingResolution(pending) => Some(PendingDuplicateInfo {
                token: pending.token,
                invoice_id: pending.invoice_id,
                prior_file_hash: pending.prior_file_hash.clone(),
            }),
            _ => None,
        })
    }

    /// Whether a chain currently occupies the upload slot.
    pub fn is_busy(&self) -> CoreResult<bool> {
        Ok(!self.lock()?.phase.is_idle())
    }

    async fn perform_upload(
        &self,
        file: InvoiceFile,
        force_recheck: bool,
        epoch: u64,
        cancel: CancellationToken,
    ) -> CoreResult<TrackedOutcome> {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(file = %file.name, "upload abandoned mid-flight");
                return Err(CoreError::internal("upload chain was abandoned"));
            }
            outcome = self.backend.upload_invoice(&file, force_recheck) => outcome,
        };

        let tracked = TrackedOutcome::new(outcome);

        let mut inner = self.lock()?;
        if inner.epoch != epoch {
            debug!(file = %file.name, "upload result discarded: chain superseded");
            return Err(CoreError::internal(
                "upload result discarded: chain superseded",
            ));
        }
        inner.phase = match &tracked.outcome {
            UploadOutcome::Duplicate {
                invoice_id,
                prior_file_hash,
            } => ChainPhase::AwaitingResolution(PendingDuplicate {
                token: tracked.token,
                invoice_id: *invoice_id,
                prior_file_hash: prior_file_hash.clone(),
                original: file,
            }),
            _ => ChainPhase::Idle,
        };
        Ok(tracked)
    }
}
