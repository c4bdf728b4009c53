//! Invoice Commands
//!
//! The upload pipeline (submit → resolve duplicates → navigate → analyze →
//! render), the standalone analysis entry point, and the invoice listing.

use std::path::Path;

use sha2::{Digest, Sha256};

use ledgerlens_core::{
    normalize, AnalysisReport, DocumentKind, DuplicateResolution, InvoiceFile, NavigationIntent,
    ResolutionOutcome, Route, TrackedOutcome, UploadOutcome,
};

use crate::commands::{require_session, signal_auth_expired};
use crate::services::render::{render_invoices, render_outcome, render_report};
use crate::services::upload::SubmitOptions;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Submit a document and walk the full verification chain.
pub async fn upload(
    state: &AppState,
    path: &Path,
    analyze_pref: Option<bool>,
    resolution: DuplicateResolution,
    force_recheck: bool,
    json: bool,
) -> AppResult<()> {
    require_session(state, Route::Upload).await?;

    let file = read_invoice_file(path)?;
    println!(
        "Uploading {} ({} bytes, sha256 {})",
        file.name,
        file.size(),
        sha256_hex(&file.contents)
    );

    let auto_analyze = analyze_pref.unwrap_or_else(|| state.auto_analyze());
    let tracked = state
        .coordinator()
        .submit_document(file, SubmitOptions { force_recheck })
        .await?;

    if matches!(tracked.outcome, UploadOutcome::Rejected(_)) {
        return reject(state, Route::Upload, &tracked).await;
    }

    let tracked = if matches!(tracked.outcome, UploadOutcome::Duplicate { .. }) {
        print!("{}", render_outcome(&tracked));
        match state
            .coordinator()
            .resolve_duplicate(tracked.token, resolution)
            .await?
        {
            ResolutionOutcome::Navigate(NavigationIntent::Analysis { invoice_id }) => {
                println!("Previous report: run `ledgerlens analyze {invoice_id}`.");
                return Ok(());
            }
            ResolutionOutcome::Cancelled => {
                println!("Upload discarded.");
                return Ok(());
            }
            ResolutionOutcome::Resubmitted(fresh) => {
                println!("Rechecked with the original file.");
                fresh
            }
        }
    } else {
        tracked
    };

    // A recheck can itself come back rejected, or even duplicate again.
    match &tracked.outcome {
        UploadOutcome::Stored { .. } => {}
        UploadOutcome::Rejected(_) => return reject(state, Route::Upload, &tracked).await,
        UploadOutcome::Duplicate { invoice_id, .. } => {
            print!("{}", render_outcome(&tracked));
            println!("Still a duplicate of invoice #{invoice_id}; discarding the upload.");
            state
                .coordinator()
                .resolve_duplicate(tracked.token, DuplicateResolution::Cancel)
                .await?;
            return Ok(());
        }
    }
    print!("{}", render_outcome(&tracked));

    match state.decide_navigation(&tracked, auto_analyze)? {
        Some(NavigationIntent::Analysis { invoice_id }) => {
            println!("Running analysis for invoice #{invoice_id}...");
            match state.coordinator().trigger_analysis(&tracked).await {
                Ok(report) => output_report(&report, json),
                Err(err) => {
                    if err.is_auth() {
                        signal_auth_expired(state, Route::Analysis).await;
                    }
                    Err(err.into())
                }
            }
        }
        None => {
            if let Some(invoice_id) = tracked.outcome.invoice_id() {
                println!("Run `ledgerlens analyze {invoice_id}` to inspect it.");
            }
            Ok(())
        }
    }
}

/// Run analysis for an already-stored invoice.
pub async fn analyze(state: &AppState, invoice_id: i64, json: bool) -> AppResult<()> {
    require_session(state, Route::Analysis).await?;

    match state.coordinator().run_analysis(invoice_id).await {
        Ok(report) => output_report(&report, json),
        Err(err) => {
            if err.is_auth() {
                signal_auth_expired(state, Route::Analysis).await;
            }
            Err(err.into())
        }
    }
}

/// List previously uploaded invoices.
pub async fn list(state: &AppState, json: bool) -> AppResult<()> {
    require_session(state, Route::Dashboard).await?;

    match state.backend().list_invoices().await {
        Ok(invoices) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&invoices)?);
            } else {
                print!("{}", render_invoices(&invoices));
            }
            Ok(())
        }
        Err(err) => {
            if err.is_auth() {
                signal_auth_expired(state, Route::Dashboard).await;
            }
            Err(err.into())
        }
    }
}

async fn reject(state: &AppState, route: Route, tracked: &TrackedOutcome) -> AppResult<()> {
    if tracked.outcome.is_auth_expired() {
        signal_auth_expired(state, route).await;
    }
    match &tracked.outcome {
        UploadOutcome::Rejected(rejection) => {
            Err(AppError::command(format!("upload rejected: {rejection}")))
        }
        _ => Err(AppError::internal("reject called on a non-rejected outcome")),
    }
}

fn output_report(report: &AnalysisReport, json: bool) -> AppResult<()> {
    let view = normalize(report);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_report(&view));
    }
    Ok(())
}

/// Read a document from disk, deriving name and MIME type from the path.
///
/// Unknown extensions get a generic MIME type here; deciding acceptance is
/// the coordinator's pre-check, not the reader's.
fn read_invoice_file(path: &Path) -> AppResult<InvoiceFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::command(format!("'{}' has no usable file name", path.display())))?
        .to_string();
    let contents = std::fs::read(path)?;
    let mime = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(DocumentKind::from_extension)
        .map(|kind| kind.mime().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(InvoiceFile::new(name, mime, contents))
}

fn sha256_hex(contents: &[u8]) -> String {
    format!("{:x}", Sha256::digest(contents))
}
