//! Terminal Rendering
//!
//! Turns normalized view models into plain-text output for the operator.
//! Everything here is string building: no network, no state, and absent
//! measurements always surface as the adapter's "n/a" marker instead of a
//! made-up number.

use ledgerlens_core::{
    CheckVerdict, Identity, InvoiceSummary, Metric, ReportView, SectionStatus, TrackedOutcome,
    UploadOutcome,
};

const METER_WIDTH: usize = 20;

fn row(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {label:<26} {value}\n")
}

fn section_header(title: &str, status: SectionStatus, message: &Option<String>) -> String {
    let mut out = format!("{title} [{status}]\n");
    if status != SectionStatus::Ok {
        if let Some(message) = message {
            out.push_str(&row("note", message));
        }
    }
    out
}

/// A fixed-width meter for a 0-100 percentage.
fn meter(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * METER_WIDTH) / 100;
    let mut bar = String::with_capacity(METER_WIDTH + 2);
    bar.push('[');
    for i in 0..METER_WIDTH {
        bar.push(if i < filled { '#' } else { '.' });
    }
    bar.push(']');
    bar
}

/// Render the result of one submit attempt.
pub fn render_outcome(tracked: &TrackedOutcome) -> String {
    match &tracked.outcome {
        UploadOutcome::Stored {
            invoice_id,
            file_hash,
            file_type,
        } => {
            let mut out = String::from("Invoice stored.\n");
            out.push_str(&row("invoice id", invoice_id));
            out.push_str(&row("file type", file_type));
            out.push_str(&row("file hash", file_hash));
            out
        }
        UploadOutcome::Duplicate {
            invoice_id,
            prior_file_hash,
        } => {
            let mut out = String::from("Duplicate detected: this content was already processed.\n");
            out.push_str(&row("existing invoice id", invoice_id));
            out.push_str(&row("prior file hash", prior_file_hash));
            out
        }
        UploadOutcome::Rejected(rejection) => {
            format!("Upload rejected: {rejection}\n")
        }
    }
}

/// Render a complete trust report.
pub fn render_report(view: &ReportView) -> String {
    let mut out = format!(
        "Trust report for invoice #{} (file type: {})\n\n",
        view.invoice_id, view.file_type
    );

    // Cryptographic verification
    out.push_str(&section_header(
        "Cryptographic verification",
        view.crypto.section.status,
        &view.crypto.section.message,
    ));
    out.push_str(&row("signature present", &view.crypto.signature_present));
    out.push_str(&row("signature integrity", &view.crypto.signature_integrity));
    match (view.crypto.trust.percent, &view.crypto.trust.label) {
        (Metric::Available(percent), label) => {
            let marker = if view.crypto.trust.recognized {
                String::new()
            } else {
                " (unrecognized label)".to_string()
            };
            out.push_str(&row(
                "certificate trust",
                format!("{} {}% {}{}", meter(percent), percent, label, marker),
            ));
        }
        (Metric::NotAvailable, _) => {
            out.push_str(&row("certificate trust", "n/a"));
        }
    }
    out.push_str(&row("signer fingerprint", &view.crypto.signer_fingerprint));
    out.push_str(&row("signer identity", &view.crypto.signer_identity));
    out.push_str(&row("vendor status", &view.crypto.vendor_status));
    out.push('\n');

    // AI anomaly analysis
    out.push_str(&section_header(
        "AI anomaly analysis",
        view.ai.section.status,
        &view.ai.section.message,
    ));
    out.push_str(&row("anomaly score", &view.ai.anomaly_score));
    out.push_str(&row("risk tier", &view.ai.risk));
    out.push_str(&row("review required", &view.ai.review_required));
    out.push_str(&row("embedding distance", &view.ai.embedding_distance));
    out.push_str(&row("distance z-score", &view.ai.distance_z_score));
    for note in &view.ai.explanations {
        out.push_str(&format!("  - {note}\n"));
    }
    out.push('\n');

    // Rule-based checks
    out.push_str(&section_header(
        "Rule-based checks",
        view.rules.section.status,
        &view.rules.section.message,
    ));
    out.push_str(&row("word count", &view.rules.word_count));
    out.push_str(&row("font count", &view.rules.font_count));
    if !view.rules.fonts.is_empty() {
        out.push_str(&row("fonts", view.rules.fonts.join(", ")));
    }
    out.push_str(&row("line items", &view.rules.line_item_count));
    out.push_str(&row("line item sum", &view.rules.line_item_sum));
    out.push_str(&row("subtotal", &view.rules.subtotal));
    out.push_str(&row("tax", &view.rules.tax));
    out.push_str(&row("total", &view.rules.total));
    out.push_str(&row(
        "subtotal vs items",
        check_line(view.rules.checks.subtotal_matches_items, &view.rules.checks.subtotal_delta),
    ));
    out.push_str(&row(
        "total vs subtotal+tax",
        check_line(
            view.rules.checks.total_matches_subtotal_tax,
            &view.rules.checks.total_delta,
        ),
    ));

    out
}

fn check_line(verdict: CheckVerdict, delta: &Metric<f64>) -> String {
    match verdict {
        CheckVerdict::NotEvaluated => verdict.to_string(),
        _ => format!("{verdict} (delta {delta})"),
    }
}

/// Render the invoice listing as a table.
pub fn render_invoices(invoices: &[InvoiceSummary]) -> String {
    if invoices.is_empty() {
        return "No invoices uploaded yet.\n".to_string();
    }

    let mut out = format!(
        "{:>6}  {:<10}  {:<8}  {:<10}  {:<10}  {}\n",
        "id", "status", "signed", "crypto", "date", "file hash"
    );
    for invoice in invoices {
        let signed = invoice
            .is_signed
            .map(|s| if s { "yes" } else { "no" }.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        let crypto = invoice
            .crypto_valid
            .map(|v| if v { "valid" } else { "invalid" }.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "{:>6}  {:<10}  {:<8}  {:<10}  {:<10}  {}\n",
            invoice.invoice_id,
            invoice.status,
            signed,
            crypto,
            created_date(invoice.created_at.as_deref()),
            invoice.file_hash,
        ));
    }
    out
}

/// Date part of an ISO 8601 timestamp, or "n/a".
fn created_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "n/a".to_string();
    };
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        // The service is not strict about timestamp shape; fall back to the
        // leading date characters.
        Err(_) => raw.chars().take(10).collect(),
    }
}

/// Render the signed-in operator.
pub fn render_identity(identity: &Identity) -> String {
    format!(
        "Signed in as {} <{}> (operator #{})\n",
        identity.display_name, identity.email, identity.id
    )
}
