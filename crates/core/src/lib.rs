//! Ledgerlens Core
//!
//! Domain types and workflow state machines for the Ledgerlens operator
//! client. This crate has zero dependencies on application-level code
//! (HTTP client, CLI, storage, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `invoice` - Accepted document kinds, submitted files, invoice summaries
//! - `outcome` - Upload outcomes, rejections, duplicate resolutions
//! - `session` - Session state, routes, and the guard policy
//! - `report` - Raw analysis report wire model (three statused sections)
//! - `view` - Display-safe report view model and the normalization step
//! - `navigation` - Auto-navigation decisions over tagged outcomes
//! - `backend` - The `VerificationBackend` trait behind which the HTTP
//!   client (or a test double) sits
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/async-trait/thiserror** - keeps build times minimal
//! 2. **Trait-based abstractions** - enables mocking, testing, and future crate splitting
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod backend;
pub mod error;
pub mod invoice;
pub mod navigation;
pub mod outcome;
pub mod report;
pub mod session;
pub mod view;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Documents & Summaries ──────────────────────────────────────────────
pub use invoice::{DocumentKind, InvoiceFile, InvoiceSummary};

// ── Upload Outcomes ────────────────────────────────────────────────────
pub use outcome::{
    DuplicateResolution, OutcomeToken, RejectReason, Rejection, ResolutionOutcome,
    TrackedOutcome, UploadOutcome,
};

// ── Session & Guard ────────────────────────────────────────────────────
pub use session::{guard, GuardDecision, Identity, Route, SessionState};

// ── Analysis Report ────────────────────────────────────────────────────
pub use report::{AiSection, AnalysisReport, CryptoSection, RulesSection, SectionStatus};

// ── Report View Model ──────────────────────────────────────────────────
pub use view::{normalize, CheckVerdict, Metric, ReportView, RiskTier};

// ── Navigation ─────────────────────────────────────────────────────────
pub use navigation::{NavigationController, NavigationIntent};

// ── Backend Seam ───────────────────────────────────────────────────────
pub use backend::VerificationBackend;
