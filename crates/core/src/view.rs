//! Report View Model
//!
//! Normalizes a partially-populated [`AnalysisReport`] into a complete,
//! display-safe view model. Absent measurements become an explicit
//! [`Metric::NotAvailable`] marker, never a default number that could pass
//! for a real reading. All derived values (trust percentage, risk tier,
//! check verdicts) are pure functions of the raw section.
//!
//! [`normalize`] never contacts the network and never mutates its input.

use serde::{Serialize, Serializer};

use crate::report::{AnalysisReport, SectionStatus};

/// Risk tier thresholds over the anomaly score.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Trust percentage assigned to labels the service never defined.
pub const UNRECOGNIZED_TRUST_PERCENT: u8 = 50;

/// A measurement that may not have been reported.
///
/// Renders as "n/a" and serializes as `null` when absent. Deliberately not
/// an `Option` alias: an absent metric is a first-class display state, not
/// a missing value to be defaulted away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric<T> {
    Available(T),
    NotAvailable,
}

impl<T> Metric<T> {
    /// Lift an optional raw field into a metric.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Available(v),
            None => Self::NotAvailable,
        }
    }

    /// Whether a value was reported.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// The reported value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available(v) => Some(v),
            Self::NotAvailable => None,
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Metric<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(v) => v.fmt(f),
            Self::NotAvailable => f.write_str("n/a"),
        }
    }
}

impl<T: Serialize> Serialize for Metric<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Available(v) => v.serialize(serializer),
            Self::NotAvailable => serializer.serialize_none(),
        }
    }
}

/// Status and message of one normalized section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub status: SectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Certificate trust rendered as a label plus a 0-100 percentage.
///
/// Labels outside the known set keep the mid-range percentage and carry
/// `recognized: false` so the display can flag them instead of silently
/// pinning them to an extreme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustView {
    pub label: Metric<String>,
    pub percent: Metric<u8>,
    pub recognized: bool,
}

/// Risk tier derived from the anomaly score by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Tier for a raw anomaly score in `[0, 1]`.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Tier parsed from a service-reported label, if recognizable.
    pub fn from_label(label: &str) -> Option<Self> {
        let lowered = label.to_ascii_lowercase();
        if lowered.contains("high") {
            Some(Self::High)
        } else if lowered.contains("medium") {
            Some(Self::Medium)
        } else if lowered.contains("low") {
            Some(Self::Low)
        } else {
            None
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(label)
    }
}

/// Tri-state verdict of one arithmetic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckVerdict {
    Pass,
    Fail,
    NotEvaluated,
}

impl CheckVerdict {
    fn from_option(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Pass,
            Some(false) => Self::Fail,
            None => Self::NotEvaluated,
        }
    }
}

impl std::fmt::Display for CheckVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::NotEvaluated => "not evaluated",
        };
        f.write_str(label)
    }
}

/// Normalized cryptographic verification section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoView {
    pub section: SectionSummary,
    pub signature_present: Metric<bool>,
    pub signature_integrity: Metric<String>,
    pub trust: TrustView,
    pub signer_fingerprint: Metric<String>,
    pub signer_identity: Metric<String>,
    pub vendor_status: Metric<String>,
}

/// Normalized AI anomaly section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiView {
    pub section: SectionSummary,
    pub anomaly_score: Metric<f64>,
    pub risk: Metric<RiskTier>,
    pub review_required: Metric<bool>,
    pub embedding_distance: Metric<f64>,
    pub distance_z_score: Metric<f64>,
    pub explanations: Vec<String>,
}

/// Normalized arithmetic check verdicts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecksView {
    pub subtotal_matches_items: CheckVerdict,
    pub subtotal_delta: Metric<f64>,
    pub total_matches_subtotal_tax: CheckVerdict,
    pub total_delta: Metric<f64>,
}

/// Normalized rule-based checks section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RulesView {
    pub section: SectionSummary,
    pub word_count: Metric<u64>,
    pub font_count: Metric<u64>,
    pub fonts: Vec<String>,
    pub line_item_count: Metric<u64>,
    pub line_item_sum: Metric<f64>,
    pub subtotal: Metric<f64>,
    pub tax: Metric<f64>,
    pub total: Metric<f64>,
    pub checks: ChecksView,
}

/// The complete display-safe report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub invoice_id: i64,
    pub file_type: Metric<String>,
    pub crypto: CryptoView,
    pub ai: AiView,
    pub rules: RulesView,
}

/// Percentage for a known certificate trust label.
fn trust_percent(label: &str) -> Option<u8> {
    match label.trim().to_ascii_lowercase().as_str() {
        "trusted" => Some(95),
        "valid" => Some(85),
        "warning" => Some(60),
        "untrusted" => Some(30),
        "invalid" => Some(15),
        _ => None,
    }
}

fn trust_view(label: Option<&String>) -> TrustView {
    match label {
        Some(raw) => match trust_percent(raw) {
            Some(percent) => TrustView {
                label: Metric::Available(raw.clone()),
                percent: Metric::Available(percent),
                recognized: true,
            },
            None => TrustView {
                label: Metric::Available(raw.clone()),
                percent: Metric::Available(UNRECOGNIZED_TRUST_PERCENT),
                recognized: false,
            },
        },
        None => TrustView {
            label: Metric::NotAvailable,
            percent: Metric::NotAvailable,
            recognized: true,
        },
    }
}

/// Normalize a raw report into the display-safe view model.
pub fn normalize(raw: &AnalysisReport) -> ReportView {
    let crypto = CryptoView {
        section: SectionSummary {
            status: raw.crypto.effective_status(),
            message: raw.crypto.message.clone(),
        },
        signature_present: Metric::from_option(raw.crypto.signature_present),
        signature_integrity: Metric::from_option(raw.crypto.signature_integrity.clone()),
        trust: trust_view(raw.crypto.certificate_trust.as_ref()),
        signer_fingerprint: Metric::from_option(raw.crypto.signer_fingerprint.clone()),
        signer_identity: Metric::from_option(raw.crypto.signer_identity.clone()),
        vendor_status: Metric::from_option(raw.crypto.vendor_status.clone()),
    };

    let derived_risk = match raw.ai.anomaly_score {
        Some(score) => Some(RiskTier::from_score(score)),
        None => raw.ai.risk_level.as_deref().and_then(RiskTier::from_label),
    };
    let review_required = match raw.ai.review_required {
        Some(flag) => Metric::Available(flag),
        None => match (raw.ai.anomaly_score, derived_risk) {
            (Some(_), Some(tier)) => Metric::Available(tier != RiskTier::Low),
            _ => Metric::NotAvailable,
        },
    };
    let ai = AiView {
        section: SectionSummary {
            status: raw.ai.effective_status(),
            message: raw.ai.message.clone(),
        },
        anomaly_score: Metric::from_option(raw.ai.anomaly_score),
        risk: Metric::from_option(derived_risk),
        review_required,
        embedding_distance: Metric::from_option(raw.ai.embedding_distance),
        distance_z_score: Metric::from_option(raw.ai.distance_z_score),
        explanations: raw.ai.explanations.clone(),
    };

    let raw_checks = raw.rules.checks.clone().unwrap_or_default();
    let rules = RulesView {
        section: SectionSummary {
            status: raw.rules.effective_status(),
            message: raw.rules.message.clone(),
        },
        word_count: Metric::from_option(raw.rules.word_count),
        font_count: Metric::from_option(raw.rules.font_count),
        fonts: raw.rules.fonts.clone(),
        line_item_count: Metric::from_option(raw.rules.line_item_count),
        line_item_sum: Metric::from_option(raw.rules.line_item_sum),
        subtotal: Metric::from_option(raw.rules.subtotal),
        tax: Metric::from_option(raw.rules.tax),
        total: Metric::from_option(raw.rules.total),
        checks: ChecksView {
            subtotal_matches_items: CheckVerdict::from_option(raw_checks.subtotal_matches_items),
            subtotal_delta: Metric::from_option(raw_checks.subtotal_delta),
            total_matches_subtotal_tax: CheckVerdict::from_option(
                raw_checks.total_matches_subtotal_tax,
            ),
            total_delta: Metric::from_option(raw_checks.total_delta),
        },
    };

    ReportView {
        invoice_id: raw.invoice_id,
        file_type: Metric::from_option(raw.file_type.clone()),
        crypto,
        ai,
        rules,
    }
}
