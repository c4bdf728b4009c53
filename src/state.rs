//! Application State
//!
//! Wires the configuration, the HTTP backend, and the workflow services
//! together for the command layer. Session state itself lives inside the
//! gate; this struct only owns the pieces and hands out references.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ledgerlens_core::{
    NavigationController, NavigationIntent, TrackedOutcome, VerificationBackend,
};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::api::{ApiClient, ApiClientConfig};
use crate::services::gate::SessionGate;
use crate::services::upload::UploadCoordinator;
use crate::storage::config::ConfigService;
use crate::storage::session_store::SessionStore;
use crate::utils::error::{AppError, AppResult};

/// Everything one CLI invocation needs.
pub struct AppState {
    config: Mutex<ConfigService>,
    backend: Arc<dyn VerificationBackend>,
    gate: SessionGate,
    coordinator: UploadCoordinator,
    navigation: Mutex<NavigationController>,
}

impl AppState {
    /// Load configuration and session, and build the service graph.
    pub fn initialize() -> AppResult<Self> {
        let config_service = ConfigService::new()?;
        let app_config = config_service.get_config_clone();

        let store = SessionStore::new()?;
        let client = ApiClient::new(
            ApiClientConfig {
                base_url: app_config.api_base_url.clone(),
                timeout: Duration::from_secs(app_config.timeout_secs),
            },
            store,
        )?;
        let backend: Arc<dyn VerificationBackend> = Arc::new(client);

        Ok(Self {
            config: Mutex::new(config_service),
            gate: SessionGate::new(backend.clone()),
            coordinator: UploadCoordinator::new(backend.clone()),
            backend,
            navigation: Mutex::new(NavigationController::new()),
        })
    }

    /// The session gate.
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// The upload coordinator.
    pub fn coordinator(&self) -> &UploadCoordinator {
        &self.coordinator
    }

    /// The verification backend (for read-only calls like listings).
    pub fn backend(&self) -> &dyn VerificationBackend {
        self.backend.as_ref()
    }

    /// The configured auto-analyze preference.
    pub fn auto_analyze(&self) -> bool {
        self.config
            .lock()
            .map(|config| config.get_config().auto_analyze)
            .unwrap_or(true)
    }

    /// A snapshot of the current configuration.
    pub fn config_snapshot(&self) -> AppResult<AppConfig> {
        let config = self
            .config
            .lock()
            .map_err(|_| AppError::internal("config lock poisoned"))?;
        Ok(config.get_config_clone())
    }

    /// Apply a partial configuration update and persist it.
    pub fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let mut config = self
            .config
            .lock()
            .map_err(|_| AppError::internal("config lock poisoned"))?;
        config.update_config(update)
    }

    /// Decide whether an upload outcome triggers auto-navigation.
    pub fn decide_navigation(
        &self,
        outcome: &TrackedOutcome,
        auto_analyze: bool,
    ) -> AppResult<Option<NavigationIntent>> {
        let mut navigation = self
            .navigation
            .lock()
            .map_err(|_| AppError::internal("navigation lock poisoned"))?;
        Ok(navigation.decide(outcome, auto_analyze))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
