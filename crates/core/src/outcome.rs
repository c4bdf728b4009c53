//! Upload Outcomes
//!
//! The tagged result of one submit attempt, the reasons a submission can be
//! rejected, and the operator's decision when the service reports a
//! duplicate. An outcome is produced exactly once per attempt and is never
//! partially populated: the union is exhaustive and exclusive, so callers
//! branch on the variant instead of probing loose fields.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::navigation::NavigationIntent;

/// Why a submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    /// Declared type outside the accepted set; resolved locally, no network call
    UnsupportedType,
    /// The service refused the submission with a validation message
    Validation,
    /// A call returned 401; the session must be re-established
    AuthExpired,
    /// The service could not be reached
    Network,
    /// The service failed, or answered with an unusable body
    ServerError,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::UnsupportedType => "unsupported file type",
            Self::Validation => "rejected by the service",
            Self::AuthExpired => "session expired",
            Self::Network => "service unreachable",
            Self::ServerError => "service error",
        };
        f.write_str(label)
    }
}

/// A terminal rejection: the reason plus an optional human-readable detail.
///
/// Server-supplied messages are carried verbatim in `detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: RejectReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Rejection {
    /// Create a rejection without detail.
    pub fn new(reason: RejectReason) -> Self {
        Self {
            reason,
            detail: None,
        }
    }

    /// Create a rejection carrying a detail message.
    pub fn with_detail(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: Some(detail.into()),
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.reason, detail),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// Result of one submit attempt. Exactly one variant per attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// The document was stored and is ready for analysis
    Stored {
        invoice_id: i64,
        file_hash: String,
        file_type: String,
    },
    /// The document's content matches a previously processed invoice
    Duplicate {
        invoice_id: i64,
        prior_file_hash: String,
    },
    /// The attempt ended without a stored document
    Rejected(Rejection),
}

impl UploadOutcome {
    /// Shorthand for a rejection outcome.
    pub fn rejected(reason: RejectReason) -> Self {
        Self::Rejected(Rejection::new(reason))
    }

    /// Shorthand for a rejection outcome with detail.
    pub fn rejected_with(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self::Rejected(Rejection::with_detail(reason, detail))
    }

    /// Whether this outcome stored a document.
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }

    /// The invoice id carried by this outcome, if any.
    pub fn invoice_id(&self) -> Option<i64> {
        match self {
            Self::Stored { invoice_id, .. } | Self::Duplicate { invoice_id, .. } => {
                Some(*invoice_id)
            }
            Self::Rejected(_) => None,
        }
    }

    /// Whether this outcome means the session expired.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Rejected(Rejection {
                reason: RejectReason::AuthExpired,
                ..
            })
        )
    }
}

/// Opaque tag identifying one produced outcome instance.
///
/// Tokens are unique per process and let downstream consumers (the
/// navigation controller, duplicate resolution) act on an outcome exactly
/// once and detect stale references to superseded outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeToken(u64);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

impl OutcomeToken {
    /// Mint the next unique token.
    pub fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// An upload outcome tagged with its instance token.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedOutcome {
    pub token: OutcomeToken,
    pub outcome: UploadOutcome,
}

impl TrackedOutcome {
    /// Tag a freshly produced outcome.
    pub fn new(outcome: UploadOutcome) -> Self {
        Self {
            token: OutcomeToken::next(),
            outcome,
        }
    }
}

/// The operator's decision for a reported duplicate.
///
/// Consumed exactly once per `Duplicate` outcome, then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateResolution {
    /// Inspect the previously processed invoice instead of re-uploading
    ViewPrevious,
    /// Resubmit the same file with `force_recheck` set
    Recheck,
    /// Drop the pending submission and release the upload slot
    Cancel,
}

/// What resolving a duplicate produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// Go look at the existing invoice; no network call was made
    Navigate(NavigationIntent),
    /// The file was resubmitted; this outcome replaces the duplicate
    Resubmitted(TrackedOutcome),
    /// The pending submission was discarded
    Cancelled,
}
