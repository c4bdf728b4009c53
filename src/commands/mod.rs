//! Operator Commands
//!
//! Thin handlers bridging the CLI to the workflow services. Every protected
//! command runs through the session gate before touching anything else, and
//! 401s observed mid-operation are reported back to the gate so the session
//! state stays consistent with the server.

pub mod auth;
pub mod config;
pub mod invoices;

use ledgerlens_core::{CoreError, Route, SessionState};

use crate::cli::{Cli, Command, ConfigAction};
use crate::models::settings::SettingsUpdate;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Dispatch one parsed invocation.
pub async fn run(state: &AppState, cli: Cli) -> AppResult<()> {
    match cli.command {
        Command::Login { email, password } => auth::login(state, &email, &password).await,
        Command::Register {
            email,
            password,
            name,
        } => auth::register(state, &email, &password, &name).await,
        Command::Logout => auth::logout(state).await,
        Command::Whoami => auth::whoami(state).await,
        Command::Upload {
            path,
            analyze,
            no_analyze,
            on_duplicate,
            force_recheck,
        } => {
            let analyze_pref = if analyze {
                Some(true)
            } else if no_analyze {
                Some(false)
            } else {
                None
            };
            invoices::upload(
                state,
                &path,
                analyze_pref,
                on_duplicate.into(),
                force_recheck,
                cli.json,
            )
            .await
        }
        Command::Analyze { invoice_id } => invoices::analyze(state, invoice_id, cli.json).await,
        Command::Invoices => invoices::list(state, cli.json).await,
        Command::Config { action } => match action {
            ConfigAction::Show => config::show(state, cli.json),
            ConfigAction::Set {
                api_base_url,
                timeout_secs,
                auto_analyze,
            } => config::set(
                state,
                SettingsUpdate {
                    api_base_url,
                    timeout_secs,
                    auto_analyze,
                },
            ),
        },
    }
}

/// Probe the session and enforce the guard for a protected route.
///
/// A redirect to login becomes an auth error telling the operator what to
/// run; anything else proceeds.
pub(crate) async fn require_session(state: &AppState, route: Route) -> AppResult<SessionState> {
    let session = state.gate().check_session().await;
    if state.gate().take_redirect(route).await == Some(Route::Login) {
        return Err(AppError::Core(CoreError::auth(
            "no active session; run `ledgerlens login` first",
        )));
    }
    Ok(session)
}

/// Report a 401 observed mid-operation to the gate and surface the redirect
/// hint once.
pub(crate) async fn signal_auth_expired(state: &AppState, route: Route) {
    state.gate().on_auth_expired().await;
    if state.gate().take_redirect(route).await == Some(Route::Login) {
        eprintln!("Session expired; run `ledgerlens login` to sign in again.");
    }
}
