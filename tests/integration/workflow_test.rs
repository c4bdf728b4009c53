//! Upload Coordinator Workflow Tests
//!
//! Drives the full submit → duplicate-check → resolve → analyze sequence
//! against the scripted backend and asserts on what actually crossed the
//! boundary: which calls were made, in which order, with which ids.

use std::sync::Arc;
use std::time::Duration;

use ledgerlens_core::{
    CoreError, DuplicateResolution, InvoiceFile, NavigationController, NavigationIntent,
    RejectReason, ResolutionOutcome, UploadOutcome,
};

use ledgerlens::services::upload::{SubmitOptions, UploadCoordinator};

use crate::mock_backend::{duplicate, pdf_file, report_for, stored, MockBackend};

fn coordinator() -> (Arc<MockBackend>, UploadCoordinator) {
    let backend = Arc::new(MockBackend::new());
    let coordinator = UploadCoordinator::new(backend.clone());
    (backend, coordinator)
}

#[tokio::test]
async fn unsupported_type_is_rejected_without_network() {
    let (backend, coordinator) = coordinator();

    let file = InvoiceFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let tracked = coordinator
        .submit_document(file, SubmitOptions::default())
        .await
        .unwrap();

    match tracked.outcome {
        UploadOutcome::Rejected(rejection) => {
            assert_eq!(rejection.reason, RejectReason::UnsupportedType);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(backend.upload_count(), 0);
    assert!(!coordinator.is_busy().unwrap());
}

#[tokio::test]
async fn stored_outcome_flows_into_analysis() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(stored(9, "xyz"));
    backend.set_report_for(9, report_for(9));

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    assert!(tracked.outcome.is_stored());

    let mut nav = NavigationController::new();
    let intent = nav.decide(&tracked, true);
    assert_eq!(intent, Some(NavigationIntent::Analysis { invoice_id: 9 }));

    let report = coordinator.trigger_analysis(&tracked).await.unwrap();
    assert_eq!(report.invoice_id, 9);
    assert_eq!(backend.analyze_calls(), vec![9]);
}

#[tokio::test]
async fn duplicate_holds_the_chain_until_resolved() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(duplicate(7, "abc"));

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    assert_eq!(
        tracked.outcome,
        UploadOutcome::Duplicate {
            invoice_id: 7,
            prior_file_hash: "abc".to_string(),
        }
    );

    // No analysis was attempted, and the slot is occupied.
    assert!(backend.analyze_calls().is_empty());
    assert!(coordinator.is_busy().unwrap());
    let pending = coordinator.pending_duplicate().unwrap().unwrap();
    assert_eq!(pending.invoice_id, 7);
    assert_eq!(pending.prior_file_hash, "abc");
}

#[tokio::test]
async fn recheck_resubmits_original_file_and_analyzes_fresh_id() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(duplicate(7, "abc"));
    backend.script_upload(stored(9, "xyz"));
    backend.set_report_for(9, report_for(9));

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();

    let resolved = coordinator
        .resolve_duplicate(tracked.token, DuplicateResolution::Recheck)
        .await
        .unwrap();
    let fresh = match resolved {
        ResolutionOutcome::Resubmitted(fresh) => fresh,
        other => panic!("expected resubmission, got {other:?}"),
    };
    assert_eq!(fresh.outcome.invoice_id(), Some(9));

    // The recheck reused the original file and asked for a forced recheck.
    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[1].name, uploads[0].name);
    assert_eq!(uploads[1].size, uploads[0].size);
    assert!(!uploads[0].force_recheck);
    assert!(uploads[1].force_recheck);

    // Analysis runs against the fresh id; the duplicate's id is never analyzed.
    let report = coordinator.trigger_analysis(&fresh).await.unwrap();
    assert_eq!(report.invoice_id, 9);
    assert_eq!(backend.analyze_calls(), vec![9]);
}

#[tokio::test]
async fn view_previous_navigates_without_network() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(duplicate(7, "abc"));

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    let resolved = coordinator
        .resolve_duplicate(tracked.token, DuplicateResolution::ViewPrevious)
        .await
        .unwrap();

    assert_eq!(
        resolved,
        ResolutionOutcome::Navigate(NavigationIntent::Analysis { invoice_id: 7 })
    );
    assert_eq!(backend.upload_count(), 1);
    assert!(backend.analyze_calls().is_empty());
    assert!(!coordinator.is_busy().unwrap());
}

#[tokio::test]
async fn cancel_releases_the_slot() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(duplicate(7, "abc"));
    backend.script_upload(stored(9, "xyz"));

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    let resolved = coordinator
        .resolve_duplicate(tracked.token, DuplicateResolution::Cancel)
        .await
        .unwrap();
    assert_eq!(resolved, ResolutionOutcome::Cancelled);
    assert!(!coordinator.is_busy().unwrap());

    // The slot is genuinely free: a new submission goes through.
    let next = coordinator
        .submit_document(pdf_file("other.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    assert!(next.outcome.is_stored());
}

#[tokio::test]
async fn second_submit_while_pending_is_busy() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(duplicate(7, "abc"));

    let _tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();

    let second = coordinator
        .submit_document(pdf_file("other.pdf"), SubmitOptions::default())
        .await;
    assert!(matches!(second, Err(CoreError::Busy(_))));

    let analysis = coordinator.run_analysis(7).await;
    assert!(matches!(analysis, Err(CoreError::Busy(_))));

    // The pending chain was not disturbed by the refused attempts.
    assert_eq!(backend.upload_count(), 1);
    assert!(coordinator.is_busy().unwrap());
}

#[tokio::test]
async fn stale_resolution_is_refused() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(duplicate(7, "abc"));
    backend.script_upload(duplicate(8, "def"));

    let first = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    coordinator
        .resolve_duplicate(first.token, DuplicateResolution::Cancel)
        .await
        .unwrap();

    // A superseding submission produces a new pending duplicate.
    let second = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();

    // Resolving against the old outcome is stale and changes nothing.
    let stale = coordinator
        .resolve_duplicate(first.token, DuplicateResolution::Recheck)
        .await;
    assert!(matches!(stale, Err(CoreError::Validation(_))));
    assert_eq!(backend.upload_count(), 2);

    // The current outcome still resolves normally.
    let resolved = coordinator
        .resolve_duplicate(second.token, DuplicateResolution::Cancel)
        .await
        .unwrap();
    assert_eq!(resolved, ResolutionOutcome::Cancelled);
}

#[tokio::test]
async fn resolving_twice_is_refused() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(duplicate(7, "abc"));

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    coordinator
        .resolve_duplicate(tracked.token, DuplicateResolution::Cancel)
        .await
        .unwrap();

    let again = coordinator
        .resolve_duplicate(tracked.token, DuplicateResolution::ViewPrevious)
        .await;
    assert!(matches!(again, Err(CoreError::Validation(_))));
    assert_eq!(backend.upload_count(), 1);
}

#[tokio::test]
async fn analysis_requires_a_stored_outcome() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(duplicate(7, "abc"));

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();

    let result = coordinator.trigger_analysis(&tracked).await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert!(backend.analyze_calls().is_empty());
}

#[tokio::test]
async fn mismatched_report_id_is_refused_at_the_boundary() {
    let (backend, coordinator) = coordinator();
    // The service answers invoice 9's analysis with invoice 8's report.
    backend.set_report_for(9, report_for(8));

    let result = coordinator.run_analysis(9).await;
    assert!(matches!(result, Err(CoreError::Parse(_))));
}

#[tokio::test]
async fn rejected_upload_frees_the_slot() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(UploadOutcome::rejected_with(
        RejectReason::ServerError,
        "boom",
    ));
    backend.script_upload(stored(3, "h"));

    let first = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    assert!(matches!(first.outcome, UploadOutcome::Rejected(_)));
    assert!(!coordinator.is_busy().unwrap());

    let second = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    assert!(second.outcome.is_stored());
}

#[tokio::test(flavor = "multi_thread")]
async fn abandoned_chain_discards_its_result() {
    let backend = Arc::new(MockBackend::new());
    backend.set_delay(Duration::from_millis(200));
    backend.script_upload(stored(9, "xyz"));
    let coordinator = Arc::new(UploadCoordinator::new(backend.clone()));

    let submitting = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator
                .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
                .await
        })
    };

    // Let the upload get in flight, then walk away.
    tokio::time::sleep(Duration::from_millis(50)).await;
    coordinator.abandon().unwrap();

    let result = submitting.await.unwrap();
    assert!(matches!(result, Err(CoreError::Internal(_))));
    assert!(!coordinator.is_busy().unwrap());

    // The coordinator accepts fresh work afterwards. The abandoned call
    // never consumed the scripted outcome, so this submission gets it.
    let next = coordinator
        .submit_document(pdf_file("next.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    assert!(next.outcome.is_stored());
}

#[tokio::test]
async fn auth_expired_surfaces_as_rejected_outcome() {
    let (backend, coordinator) = coordinator();
    backend.script_upload(UploadOutcome::rejected(RejectReason::AuthExpired));

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    assert!(tracked.outcome.is_auth_expired());
    assert!(!coordinator.is_busy().unwrap());
}
