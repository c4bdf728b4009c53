//! Session Gate Integration Tests
//!
//! The gate and the coordinator cooperating: a 401 observed during
//! analysis flips the session to unauthenticated and the protected view
//! redirects to login exactly once for that state change.

use std::sync::Arc;

use ledgerlens_core::{CoreError, Route, SessionState};

use ledgerlens::services::gate::SessionGate;
use ledgerlens::services::upload::{SubmitOptions, UploadCoordinator};

use crate::mock_backend::{operator, pdf_file, stored, MockBackend};

#[tokio::test]
async fn expired_analysis_session_redirects_to_login_exactly_once() {
    let backend = Arc::new(MockBackend::new());
    backend.sign_in(operator());
    backend.script_upload(stored(9, "xyz"));
    backend.expire_session_on_analyze();

    let gate = SessionGate::new(backend.clone());
    let coordinator = UploadCoordinator::new(backend.clone());

    // Signed in: the protected view renders.
    assert!(gate.check_session().await.is_authenticated());
    assert_eq!(gate.take_redirect(Route::Analysis).await, None);

    let tracked = coordinator
        .submit_document(pdf_file("invoice.pdf"), SubmitOptions::default())
        .await
        .unwrap();
    let result = coordinator.trigger_analysis(&tracked).await;
    let err = result.unwrap_err();
    assert!(matches!(err, CoreError::Auth(_)));

    // The 401 is reported to the gate; the view redirects once, then stays
    // quiet while the session state is unchanged.
    gate.on_auth_expired().await;
    assert_eq!(gate.session().await, SessionState::Unauthenticated);
    assert_eq!(gate.take_redirect(Route::Analysis).await, Some(Route::Login));
    assert_eq!(gate.take_redirect(Route::Analysis).await, None);

    gate.on_auth_expired().await;
    assert_eq!(gate.take_redirect(Route::Analysis).await, None);
}

#[tokio::test]
async fn signed_out_operator_is_gated_before_any_upload() {
    let backend = Arc::new(MockBackend::new());
    let gate = SessionGate::new(backend.clone());

    assert_eq!(gate.check_session().await, SessionState::Unauthenticated);
    assert_eq!(gate.take_redirect(Route::Upload).await, Some(Route::Login));

    // The shell stopped at the gate: nothing reached the service.
    assert_eq!(backend.upload_count(), 0);
}

#[tokio::test]
async fn login_then_logout_round_trip() {
    let backend = Arc::new(MockBackend::new());
    backend.sign_in(operator());
    let gate = SessionGate::new(backend.clone());

    let identity = gate.login("op@example.com", "secret").await.unwrap();
    assert_eq!(identity.email, "op@example.com");
    assert_eq!(gate.take_redirect(Route::Login).await, Some(Route::Dashboard));

    gate.logout().await.unwrap();
    assert_eq!(gate.session().await, SessionState::Unauthenticated);
    assert_eq!(gate.take_redirect(Route::Dashboard).await, Some(Route::Login));
}
