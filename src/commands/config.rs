//! Configuration Commands
//!
//! Show and update the persisted client configuration.

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Print the current configuration.
pub fn show(state: &AppState, json: bool) -> AppResult<()> {
    let config = state.config_snapshot()?;
    print_config(&config, json)
}

/// Apply a partial update and print the result.
pub fn set(state: &AppState, update: SettingsUpdate) -> AppResult<()> {
    if update.is_empty() {
        return Err(AppError::command(
            "nothing to update; pass at least one of --api-base-url, --timeout-secs, --auto-analyze",
        ));
    }
    let updated = state.update_config(update)?;
    println!("Configuration saved.");
    print_config(&updated, false)
}

fn print_config(config: &AppConfig, json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("api_base_url   {}", config.api_base_url);
        println!("timeout_secs   {}", config.timeout_secs);
        println!("auto_analyze   {}", config.auto_analyze);
    }
    Ok(())
}
