//! Storage Layer
//!
//! The only state this client persists: the JSON configuration file and the
//! session cookies handed out by the verification service.

pub mod config;
pub mod session_store;

pub use config::*;
pub use session_store::*;
