//! Session Gate
//!
//! Owns the session state and decides, per route, whether the operator may
//! proceed. The gate is the only writer of session state: everything else
//! (coordinator, command layer) reports 401s to it and reads the resulting
//! state.
//!
//! Redirects are deduplicated per state change: the gate keeps a version
//! counter that bumps on every mutation, and `take_redirect` emits at most
//! one redirect per (version, route) pair. Re-rendering with an unchanged
//! session can therefore never loop.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use ledgerlens_core::{
    guard, CoreError, CoreResult, GuardDecision, Identity, Route, SessionState,
    VerificationBackend,
};

#[derive(Debug, Default)]
struct GateInner {
    state: SessionState,
    version: u64,
    last_redirect: Option<(u64, Route)>,
}

impl GateInner {
    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            self.state = state;
            self.version += 1;
        }
    }
}

/// Tracks whether the current operator is authenticated and gates access to
/// protected routes.
pub struct SessionGate {
    backend: Arc<dyn VerificationBackend>,
    inner: RwLock<GateInner>,
}

impl SessionGate {
    /// Create a gate with no established session.
    pub fn new(backend: Arc<dyn VerificationBackend>) -> Self {
        Self {
            backend,
            inner: RwLock::new(GateInner::default()),
        }
    }

    /// Current session state.
    pub async fn session(&self) -> SessionState {
        self.inner.read().await.state.clone()
    }

    /// Run the session probe and settle into a terminal state.
    ///
    /// The state is `Checking` while the probe is in flight. A probe that
    /// cannot reach the service counts as no session: the operator signs in
    /// again rather than the client guessing.
    pub async fn check_session(&self) -> SessionState {
        {
            let mut inner = self.inner.write().await;
            inner.set_state(SessionState::Checking);
        }

        let probed = match self.backend.current_identity().await {
            Ok(Some(identity)) => SessionState::Authenticated(identity),
            Ok(None) => SessionState::Unauthenticated,
            Err(err) => {
                warn!("session probe failed: {err}");
                SessionState::Unauthenticated
            }
        };

        let mut inner = self.inner.write().await;
        inner.set_state(probed);
        inner.state.clone()
    }

    /// Establish a session and return the signed-in identity.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<Identity> {
        self.backend.login(email, password).await?;
        let identity = match self.backend.current_identity().await? {
            Some(identity) => identity,
            None => {
                return Err(CoreError::auth(
                    "login succeeded but no session was established",
                ))
            }
        };

        let mut inner = self.inner.write().await;
        inner.set_state(SessionState::Authenticated(identity.clone()));
        debug!(email = %identity.email, "session established");
        Ok(identity)
    }

    /// Create an account. Does not establish a session.
    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> CoreResult<()> {
        self.backend.register(email, password, display_name).await
    }

    /// End the session.
    ///
    /// The local state resets to unauthenticated even when the network call
    /// fails; a dead session on a dead connection is still a dead session.
    pub async fn logout(&self) -> CoreResult<()> {
        let result = self.backend.logout().await;

        let mut inner = self.inner.write().await;
        inner.set_state(SessionState::Unauthenticated);
        drop(inner);

        if let Err(err) = result {
            warn!("logout request failed: {err}");
        }
        Ok(())
    }

    /// Signal entry point for a 401 observed anywhere in the client.
    pub async fn on_auth_expired(&self) {
        let mut inner = self.inner.write().await;
        inner.set_state(SessionState::Unauthenticated);
    }

    /// Evaluate the guard policy for a route without emitting a redirect.
    pub async fn guard_route(&self, route: Route) -> GuardDecision {
        let inner = self.inner.read().await;
        guard(route, &inner.state)
    }

    /// Evaluate the guard and emit the redirect target, at most once per
    /// state change for a given route.
    pub async fn take_redirect(&self, route: Route) -> Option<Route> {
        let mut inner = self.inner.write().await;
        match guard(route, &inner.state) {
            GuardDecision::Allow => None,
            GuardDecision::Redirect(target) => {
                if inner.last_redirect == Some((inner.version, route)) {
                    return None;
                }
                inner.last_redirect = Some((inner.version, route));
                debug!(from = %route, to = %target, "redirecting");
                Some(target)
            }
        }
    }
}
