//! Input guard service.
//!
//! Enforces pre-submission constraints on the answer-sheet and answer-key
//! uploads and schedules auto-dismiss for notification banners. One
//! initialization per guard, triggered by the host once its view is mounted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::config::GuardConfig;
use crate::dismiss::{self, AutoDismiss};
use crate::document::{ChangeListener, Document};
use crate::error::GuardError;
use crate::policy::{
    ANSWER_KEY_INPUT, ANSWER_SHEET_INPUT, UploadPolicy, answer_key_policy, answer_sheet_policy,
};
use crate::report::{LogReporter, ValidationReporter};

/// Change handler bound to one managed control.
struct PolicyListener {
    policy: UploadPolicy,
    reporter: Arc<dyn ValidationReporter>,
}

impl ChangeListener for PolicyListener {
    fn selection_changed(&self, document: &Document, input_id: &str) {
        let Some(file) = document.selection(input_id) else {
            // User cleared the selection; nothing to validate.
            return;
        };
        // An empty name means the picker produced no real selection.
        if file.name.is_empty() {
            return;
        }

        let violations = self.policy.check(&file);
        for violation in &violations {
            self.reporter.report(input_id, violation);
        }

        if !violations.is_empty() {
            // Corrective reset: the control must never hold an invalid
            // selection once the handler returns.
            document.reset_selection(input_id);
            debug!(input = input_id, file = %file.name, "selection cleared");
        }
    }
}

/// The input guard component.
///
/// Construct once, then call [`initialize`](InputGuard::initialize) with the
/// mounted [`Document`]. Controls absent from the document are skipped
/// silently; banners present at that moment get auto-dismiss timers.
pub struct InputGuard {
    config: GuardConfig,
    reporter: Arc<dyn ValidationReporter>,
    initialized: AtomicBool,
}

impl InputGuard {
    /// Create a guard with the default log-based reporter.
    pub fn new(config: GuardConfig) -> Self {
        Self::with_reporter(config, Arc::new(LogReporter))
    }

    /// Create a guard that reports through the given reporter.
    pub fn with_reporter(config: GuardConfig, reporter: Arc<dyn ValidationReporter>) -> Self {
        Self {
            config,
            reporter,
            initialized: AtomicBool::new(false),
        }
    }

    /// The guard's configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Attach the guard to a mounted document.
    ///
    /// Registers a change handler on each well-known control present
    /// (answer-sheet: image/PDF types; answer-key: image/PDF/plain-text
    /// types) and schedules auto-dismiss for every banner currently in the
    /// document. Runs exactly once; a second call fails with
    /// [`GuardError::AlreadyInitialized`].
    pub fn initialize(&self, document: &Document) -> Result<AutoDismiss, GuardError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(GuardError::AlreadyInitialized);
        }

        let max = self.config.max_upload_bytes;
        let profiles = [
            (ANSWER_SHEET_INPUT, answer_sheet_policy(max)),
            (ANSWER_KEY_INPUT, answer_key_policy(max)),
        ];

        for (input_id, policy) in profiles {
            if document.has_input(input_id) {
                debug!(input = input_id, allowed = %policy.allowed(), "registered upload handler");
                document.add_change_listener(
                    input_id,
                    Arc::new(PolicyListener {
                        policy,
                        reporter: self.reporter.clone(),
                    }),
                );
            } else {
                debug!(input = input_id, "input not present, skipping");
            }
        }

        let timers = dismiss::schedule(document, self.config.dismiss_delay_duration());
        info!(banners = timers.len(), "input guard initialized");

        Ok(timers)
    }
}

impl std::fmt::Debug for InputGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputGuard")
            .field("config", &self.config)
            .field("initialized", &self.initialized.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::document::SelectedFile;
    use crate::policy::Violation;
    use parking_lot::Mutex;

    /// Reporter that records every call for assertions.
    #[derive(Default)]
    struct RecordingReporter {
        calls: Mutex<Vec<(String, Violation)>>,
    }

    impl RecordingReporter {
        fn calls(&self) -> Vec<(String, Violation)> {
            self.calls.lock().clone()
        }
    }

    impl ValidationReporter for RecordingReporter {
        fn report(&self, input_id: &str, violation: &Violation) {
            self.calls.lock().push((input_id.to_string(), violation.clone()));
        }
    }

    fn guarded_document() -> (Document, Arc<RecordingReporter>, AutoDismiss) {
        let doc = Document::builder()
            .file_input(ANSWER_SHEET_INPUT)
            .file_input(ANSWER_KEY_INPUT)
            .build()
            .unwrap();
        let reporter = Arc::new(RecordingReporter::default());
        let guard = InputGuard::with_reporter(GuardConfig::default(), reporter.clone());
        let timers = guard.initialize(&doc).unwrap();
        (doc, reporter, timers)
    }

    #[tokio::test]
    async fn test_valid_selection_retained() {
        let (doc, reporter, _timers) = guarded_document();

        doc.select_file(ANSWER_SHEET_INPUT, SelectedFile::new("scan.png", 2 * 1024 * 1024));

        assert!(reporter.calls().is_empty());
        assert_eq!(
            doc.selection(ANSWER_SHEET_INPUT),
            Some(SelectedFile::new("scan.png", 2 * 1024 * 1024))
        );
    }

    #[tokio::test]
    async fn test_wrong_type_cleared() {
        let (doc, reporter, _timers) = guarded_document();

        doc.select_file(ANSWER_SHEET_INPUT, SelectedFile::new("scan.docx", 2 * 1024 * 1024));

        let calls = reporter.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, ANSWER_SHEET_INPUT);
        assert!(matches!(
            &calls[0].1,
            Violation::DisallowedType { allowed, .. } if allowed == "jpg, jpeg, png, pdf"
        ));
        assert!(doc.selection(ANSWER_SHEET_INPUT).is_none());
    }

    #[tokio::test]
    async fn test_oversized_txt_on_answer_key() {
        let (doc, reporter, _timers) = guarded_document();

        // txt is allowed for the answer key, so only the size check fires.
        doc.select_file(ANSWER_KEY_INPUT, SelectedFile::new("key.txt", 20 * 1024 * 1024));

        let calls = reporter.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0].1, Violation::TooLarge { .. }));
        assert!(doc.selection(ANSWER_KEY_INPUT).is_none());
    }

    #[tokio::test]
    async fn test_both_violations_reported_in_order() {
        let (doc, reporter, _timers) = guarded_document();

        doc.select_file(ANSWER_SHEET_INPUT, SelectedFile::new("dump.exe", 64 * 1024 * 1024));

        let calls = reporter.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0].1, Violation::DisallowedType { .. }));
        assert!(matches!(calls[1].1, Violation::TooLarge { .. }));
        assert!(doc.selection(ANSWER_SHEET_INPUT).is_none());
    }

    #[tokio::test]
    async fn test_cleared_selection_is_not_a_violation() {
        let (doc, reporter, _timers) = guarded_document();

        doc.select_file(ANSWER_SHEET_INPUT, SelectedFile::new("scan.jpg", 100));
        doc.clear_selection(ANSWER_SHEET_INPUT);

        assert!(reporter.calls().is_empty());
        assert!(doc.selection(ANSWER_SHEET_INPUT).is_none());
    }

    #[tokio::test]
    async fn test_empty_name_treated_as_no_selection() {
        let (doc, reporter, _timers) = guarded_document();

        doc.select_file(ANSWER_SHEET_INPUT, SelectedFile::new("", 100));

        assert!(reporter.calls().is_empty());
    }

    #[tokio::test]
    async fn test_absent_inputs_skipped() {
        // Neither well-known control exists; initialization still succeeds.
        let doc = Document::builder().build().unwrap();
        let guard = InputGuard::new(GuardConfig::default());
        let timers = guard.initialize(&doc).unwrap();
        assert!(timers.is_empty());
    }

    #[tokio::test]
    async fn test_double_initialize_rejected() {
        let doc = Document::builder().build().unwrap();
        let guard = InputGuard::new(GuardConfig::default());
        guard.initialize(&doc).unwrap();

        let err = guard.initialize(&doc).unwrap_err();
        assert!(matches!(err, GuardError::AlreadyInitialized));
    }

    #[tokio::test]
    async fn test_unmanaged_input_untouched() {
        let doc = Document::builder()
            .file_input(ANSWER_SHEET_INPUT)
            .file_input("avatar")
            .build()
            .unwrap();
        let reporter = Arc::new(RecordingReporter::default());
        let guard = InputGuard::with_reporter(GuardConfig::default(), reporter.clone());
        guard.initialize(&doc).unwrap();

        // No handler was registered for "avatar": anything goes.
        doc.select_file("avatar", SelectedFile::new("huge.bin", 100 * 1024 * 1024));

        assert!(reporter.calls().is_empty());
        assert!(doc.selection("avatar").is_some());
    }
}
