//! Business Logic Services
//!
//! The workflow services of the client: the HTTP implementation of the
//! verification backend, the session gate, the upload coordinator, and the
//! terminal rendering of normalized results.

pub mod api;
pub mod gate;
pub mod render;
pub mod upload;

pub use api::{ApiClient, ApiClientConfig};
pub use gate::SessionGate;
pub use upload::{PendingDuplicateInfo, SubmitOptions, UploadCoordinator};
