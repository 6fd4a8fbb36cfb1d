//! Guard error types.
//!
//! Validation violations are not errors: they are reported through
//! [`ValidationReporter`](crate::report::ValidationReporter) and recovered
//! in place. The variants here cover host wiring mistakes only.

use thiserror::Error;

/// Errors surfaced to the hosting application.
#[derive(Debug, Error)]
pub enum GuardError {
    /// `InputGuard::initialize` was called a second time.
    #[error("input guard already initialized")]
    AlreadyInitialized,

    /// Two file-selection controls were built with the same id.
    #[error("duplicate input id: {0}")]
    DuplicateInput(String),
}
