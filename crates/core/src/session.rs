//! Session State & Guard Policy
//!
//! The authentication state of the current operator and the pure policy
//! deciding, per route, whether to render or redirect. The state machine is
//! deliberately small: `Checking` only ever resolves to `Authenticated` or
//! `Unauthenticated`, and the two terminal states flip on login, logout, or
//! a 401 observed anywhere.
//!
//! The identity lives inside the `Authenticated` variant, so "identity
//! present iff authenticated" holds by construction.

use serde::{Deserialize, Serialize};

/// The signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub display_name: String,
}

/// Authentication state of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session, or the last one was reset
    #[default]
    Unauthenticated,
    /// The session probe is in flight; render nothing identity-dependent,
    /// but do not redirect yet
    Checking,
    /// A live session with the operator's identity
    Authenticated(Identity),
}

impl SessionState {
    /// Whether a live session exists.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The operator's identity, present iff authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// The screens the client can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Upload,
    Analysis,
}

impl Route {
    /// Whether this is an authentication route (reachable while signed out).
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// The default protected route signed-in operators land on.
    pub fn default_protected() -> Self {
        Self::Dashboard
    }

    /// Route name as used in paths and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Dashboard => "dashboard",
            Self::Upload => "upload",
            Self::Analysis => "analysis",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the guard decided for one (route, session) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested route
    Allow,
    /// Leave for the given route instead
    Redirect(Route),
}

/// Route guard policy.
///
/// Pure function of its inputs: evaluating it twice with the same pair
/// yields the same decision. Redirect deduplication across renders is the
/// session gate's job, not the policy's.
///
/// - probe still in flight: allow (nothing identity-dependent renders yet)
/// - signed out on a protected route: redirect to login
/// - signed in on an auth route: redirect to the default protected route
pub fn guard(route: Route, state: &SessionState) -> GuardDecision {
    match state {
        SessionState::Checking => GuardDecision::Allow,
        SessionState::Unauthenticated if !route.is_auth() => {
            GuardDecision::Redirect(Route::Login)
        }
        SessionState::Authenticated(_) if route.is_auth() => {
            GuardDecision::Redirect(Route::default_protected())
        }
        _ => GuardDecision::Allow,
    }
}
