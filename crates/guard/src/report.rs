//! Validation failure reporting seam.
//!
//! The guard hands every violation to a [`ValidationReporter`] and then
//! applies the corrective reset itself. Hosts with a real UI plug in a
//! modal/toast implementation; the shipped default logs a warning.

use tracing::warn;

use crate::policy::Violation;

/// Surface a validation failure to the user.
///
/// Called synchronously, once per violation, in check order. Implementations
/// must not assume a violation terminates the event: both checks can fire
/// for one change.
pub trait ValidationReporter: Send + Sync {
    /// Report one violation on the named control.
    fn report(&self, input_id: &str, violation: &Violation);
}

/// Default reporter: structured warning per violation.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ValidationReporter for LogReporter {
    fn report(&self, input_id: &str, violation: &Violation) {
        warn!(input = input_id, %violation, "upload rejected");
    }
}
