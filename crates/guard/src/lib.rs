//! Markwell input guard.
//!
//! Client-side style pre-submission checks for grading forms: an extension
//! allow-list and size cap on the answer-sheet and answer-key uploads, plus
//! auto-dismiss timers for notification banners. Convenience checks only —
//! any real correctness or security guarantee belongs to the backend
//! collaborator that receives the upload.

pub mod config;
pub mod dismiss;
pub mod document;
pub mod error;
pub mod filename;
pub mod guard;
pub mod policy;
pub mod report;

pub use config::GuardConfig;
pub use dismiss::AutoDismiss;
pub use document::{Banner, Document, SelectedFile, Severity};
pub use error::GuardError;
pub use guard::InputGuard;
pub use policy::{SuffixSet, UploadPolicy, Violation};
pub use report::{LogReporter, ValidationReporter};
