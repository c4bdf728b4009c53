//! Authentication Commands
//!
//! Sign in, sign out, account creation, and the current-operator lookup.

use ledgerlens_core::Route;

use crate::services::render::render_identity;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Sign in and persist the session cookie.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<()> {
    // A live session gets redirected away from the login screen.
    state.gate().check_session().await;
    if state.gate().take_redirect(Route::Login).await.is_some() {
        let session = state.gate().session().await;
        if let Some(identity) = session.identity() {
            println!("Already signed in as {}.", identity.email);
            println!("Run `ledgerlens logout` first to switch accounts.");
        }
        return Ok(());
    }

    let identity = state.gate().login(email, password).await?;
    print!("{}", render_identity(&identity));
    Ok(())
}

/// Create an operator account.
pub async fn register(state: &AppState, email: &str, password: &str, name: &str) -> AppResult<()> {
    state.gate().check_session().await;
    if state.gate().take_redirect(Route::Register).await.is_some() {
        println!("Already signed in; not creating another account.");
        return Ok(());
    }

    state.gate().register(email, password, name).await?;
    println!("Account created. Run `ledgerlens login` to sign in.");
    Ok(())
}

/// End the current session.
pub async fn logout(state: &AppState) -> AppResult<()> {
    state.gate().logout().await?;
    println!("Signed out.");
    Ok(())
}

/// Show the signed-in operator, if any.
pub async fn whoami(state: &AppState) -> AppResult<()> {
    let session = state.gate().check_session().await;
    match session.identity() {
        Some(identity) => print!("{}", render_identity(identity)),
        None => println!("Not signed in."),
    }
    Ok(())
}
