//! Integration Tests
//!
//! End-to-end tests of the client workflow services driven against a
//! scripted in-memory verification backend: the upload/duplicate/analyze
//! sequencing, the session gate and its redirect policy, and their
//! interaction.

// Scripted backend double shared by the test modules
mod mock_backend;

// Session gate and redirect policy tests
mod gate_test;

// Upload coordinator workflow tests
mod workflow_test;
