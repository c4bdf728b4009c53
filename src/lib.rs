//! Ledgerlens - Operator Client Library
//!
//! Client-side workflow orchestrator for a remote invoice verification
//! service. It covers:
//! - The session gate and its route guard policy
//! - The upload coordinator (submit → duplicate resolution → analysis)
//! - The HTTP implementation of the verification backend
//! - Configuration and session persistence
//! - The terminal operator surface

pub mod cli;
pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::api::{ApiClient, ApiClientConfig};
pub use services::gate::SessionGate;
pub use services::upload::{PendingDuplicateInfo, SubmitOptions, UploadCoordinator};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
