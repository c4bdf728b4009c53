//! Analysis Report Wire Model
//!
//! The shape the verification service returns from `POST
//! /invoices/{id}/analyze`: one report per invoice with three independently
//! statused sections (cryptographic verification, AI anomaly scoring,
//! rule-based arithmetic checks). Every section field beyond the status is
//! optional; a section that is skipped or failed must not be assumed to
//! carry any of them.
//!
//! Decoding happens once, at the network boundary. Nothing downstream
//! touches loose JSON: either this model decodes or the call reports a
//! parse failure.

use serde::{Deserialize, Serialize};

/// Closed status of one report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    /// The section ran and its fields are meaningful
    Ok,
    /// The section did not apply to this document
    Skipped,
    /// The section failed, or reported something unrecognized
    Error,
}

impl SectionStatus {
    /// Decodes the service's loose status strings into the closed set.
    ///
    /// `ok` maps to `Ok`; the various "did not apply" spellings map to
    /// `Skipped`; everything else, including unknown strings, maps to
    /// `Error` so an unrecognized state is never rendered as healthy.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ok" => Self::Ok,
            "skipped" | "not_supported" | "not_applicable" => Self::Skipped,
            _ => Self::Error,
        }
    }
}

impl std::fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Cryptographic signature section.
///
/// The service omits the status on this section when verification ran
/// normally; `effective_status` fills that gap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CryptoSection {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub signature_present: Option<bool>,
    #[serde(default)]
    pub signature_integrity: Option<String>,
    #[serde(default)]
    pub certificate_trust: Option<String>,
    #[serde(default)]
    pub signer_fingerprint: Option<String>,
    #[serde(default)]
    pub signer_identity: Option<String>,
    #[serde(default)]
    pub vendor_status: Option<String>,
}

impl CryptoSection {
    /// Status with the omitted-status convention applied: a section that
    /// carries verification fields but no status ran normally.
    pub fn effective_status(&self) -> SectionStatus {
        match &self.status {
            Some(raw) => SectionStatus::from_wire(raw),
            None if self.signature_present.is_some() => SectionStatus::Ok,
            None => SectionStatus::Skipped,
        }
    }
}

/// AI anomaly scoring section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSection {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub anomaly_score: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub review_required: Option<bool>,
    #[serde(default)]
    pub embedding_distance: Option<f64>,
    #[serde(default)]
    pub distance_z_score: Option<f64>,
    #[serde(default)]
    pub explanations: Vec<String>,
}

impl AiSection {
    /// Status of this section; absent means it was never reported.
    pub fn effective_status(&self) -> SectionStatus {
        match &self.status {
            Some(raw) => SectionStatus::from_wire(raw),
            None => SectionStatus::Skipped,
        }
    }
}

/// Nested arithmetic check verdicts of the rules section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleChecks {
    #[serde(default)]
    pub subtotal_matches_items: Option<bool>,
    #[serde(default)]
    pub subtotal_delta: Option<f64>,
    #[serde(default)]
    pub total_matches_subtotal_tax: Option<bool>,
    #[serde(default)]
    pub total_delta: Option<f64>,
}

/// Rule-based arithmetic checks section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesSection {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub font_count: Option<u64>,
    #[serde(default)]
    pub fonts: Vec<String>,
    #[serde(default)]
    pub line_item_count: Option<u64>,
    #[serde(default)]
    pub line_item_sum: Option<f64>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub checks: Option<RuleChecks>,
}

impl RulesSection {
    /// Status of this section; absent means it was never reported.
    pub fn effective_status(&self) -> SectionStatus {
        match &self.status {
            Some(raw) => SectionStatus::from_wire(raw),
            None => SectionStatus::Skipped,
        }
    }
}

/// One analysis report, associated with exactly one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub invoice_id: i64,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub crypto: CryptoSection,
    #[serde(default)]
    pub ai: AiSection,
    #[serde(default)]
    pub rules: RulesSection,
}
