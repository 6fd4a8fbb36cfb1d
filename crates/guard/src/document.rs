//! Mounted view-tree abstraction.
//!
//! The hosting application builds a [`Document`] once its view is mounted,
//! then hands it to [`InputGuard::initialize`](crate::guard::InputGuard).
//! The document owns the file-selection controls and notification banners;
//! change listeners registered against a control fire after every selection
//! change on it.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GuardError;

/// A file selected on a control, as reported by the host.
///
/// Transient: exists for the duration of one change event and is not
/// retained beyond the control's current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    /// File name as presented by the picker (no path expectations).
    pub name: String,

    /// Size in bytes.
    pub size: u64,
}

impl SelectedFile {
    /// Create a selected file from a name and byte size.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// The lowercased file-name suffix: everything after the last `.`.
    ///
    /// A name with no `.` yields the whole lowercased name, which fails
    /// any realistic allow-list.
    pub fn suffix(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => self.name.to_lowercase(),
        }
    }
}

/// Notification severity, matching the host's banner categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Severity name as the host renders it.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification banner present in the document at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    /// Banner severity.
    pub severity: Severity,

    /// Rendered message text.
    pub text: String,

    /// Whether the banner carries a dismiss affordance.
    pub dismissible: bool,

    /// Whether the banner has been dismissed (by user or timer).
    #[serde(default)]
    pub dismissed: bool,
}

impl Banner {
    /// Create a dismissible banner.
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            dismissible: true,
            dismissed: false,
        }
    }

    /// Drop the dismiss affordance.
    pub fn not_dismissible(mut self) -> Self {
        self.dismissible = false;
        self
    }
}

/// A file-selection control instrumented by the guard.
#[derive(Debug, Clone)]
struct FileInput {
    selection: Option<SelectedFile>,
}

/// Listener invoked after a control's selection changes.
///
/// The listener receives the document itself and may correct the selection
/// through [`Document::reset_selection`], which does not re-enter listeners.
pub trait ChangeListener: Send + Sync {
    /// Called after the selection on `input_id` changed.
    fn selection_changed(&self, document: &Document, input_id: &str);
}

struct DocumentInner {
    inputs: BTreeMap<String, FileInput>,
    banners: Vec<Banner>,
    listeners: Vec<(String, Arc<dyn ChangeListener>)>,
}

/// Shared handle to the mounted view tree.
///
/// Cloning is cheap; all clones refer to the same tree. Handlers run to
/// completion one at a time, so interior access is a plain mutex.
#[derive(Clone)]
pub struct Document {
    inner: Arc<Mutex<DocumentInner>>,
}

impl Document {
    /// Start building a document.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// Whether a control with the given id exists.
    pub fn has_input(&self, input_id: &str) -> bool {
        self.inner.lock().inputs.contains_key(input_id)
    }

    /// Current selection on a control, if the control exists and holds one.
    pub fn selection(&self, input_id: &str) -> Option<SelectedFile> {
        self.inner
            .lock()
            .inputs
            .get(input_id)
            .and_then(|input| input.selection.clone())
    }

    /// Register a change listener for a control.
    pub fn add_change_listener(&self, input_id: impl Into<String>, listener: Arc<dyn ChangeListener>) {
        self.inner.lock().listeners.push((input_id.into(), listener));
    }

    /// Set the selection on a control and fire its change listeners.
    ///
    /// Returns `false` if no such control exists (nothing fires).
    pub fn select_file(&self, input_id: &str, file: SelectedFile) -> bool {
        {
            let mut inner = self.inner.lock();
            let Some(input) = inner.inputs.get_mut(input_id) else {
                return false;
            };
            input.selection = Some(file);
        }
        self.dispatch_change(input_id);
        true
    }

    /// Clear the selection on a control and fire its change listeners.
    ///
    /// This models the user clearing the picker; listeners observe an empty
    /// selection and leave it alone.
    pub fn clear_selection(&self, input_id: &str) -> bool {
        {
            let mut inner = self.inner.lock();
            let Some(input) = inner.inputs.get_mut(input_id) else {
                return false;
            };
            input.selection = None;
        }
        self.dispatch_change(input_id);
        true
    }

    /// Corrective reset: clear a control's selection without re-entering
    /// change listeners.
    pub fn reset_selection(&self, input_id: &str) {
        if let Some(input) = self.inner.lock().inputs.get_mut(input_id) {
            input.selection = None;
        }
    }

    fn dispatch_change(&self, input_id: &str) {
        // Snapshot matching listeners so none run under the lock.
        let listeners: Vec<Arc<dyn ChangeListener>> = self
            .inner
            .lock()
            .listeners
            .iter()
            .filter(|(id, _)| id == input_id)
            .map(|(_, l)| l.clone())
            .collect();

        for listener in listeners {
            listener.selection_changed(self, input_id);
        }
    }

    /// Number of banners in the document, dismissed or not.
    pub fn banner_count(&self) -> usize {
        self.inner.lock().banners.len()
    }

    /// Append a banner after mount, returning its index.
    ///
    /// Late banners get no auto-dismiss timer; only the host (or the user)
    /// can dismiss them.
    pub fn push_banner(&self, banner: Banner) -> usize {
        let mut inner = self.inner.lock();
        inner.banners.push(banner);
        inner.banners.len() - 1
    }

    /// Snapshot of a banner by build-order index.
    pub fn banner(&self, index: usize) -> Option<Banner> {
        self.inner.lock().banners.get(index).cloned()
    }

    /// Snapshot of all banners that have not been dismissed.
    pub fn visible_banners(&self) -> Vec<Banner> {
        self.inner
            .lock()
            .banners
            .iter()
            .filter(|b| !b.dismissed)
            .cloned()
            .collect()
    }

    /// Activate the dismiss affordance on a banner.
    ///
    /// Returns `true` if the banner was newly dismissed. Banners without an
    /// affordance, already-dismissed banners, and out-of-range indices are
    /// all quiet no-ops.
    pub fn dismiss_banner(&self, index: usize) -> bool {
        let mut inner = self.inner.lock();
        let Some(banner) = inner.banners.get_mut(index) else {
            debug!(index, "dismiss target no longer present");
            return false;
        };
        if !banner.dismissible || banner.dismissed {
            return false;
        }
        banner.dismissed = true;
        true
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Document")
            .field("inputs", &inner.inputs.keys().collect::<Vec<_>>())
            .field("banners", &inner.banners.len())
            .finish()
    }
}

/// Builder for [`Document`].
#[derive(Default)]
pub struct DocumentBuilder {
    input_ids: Vec<String>,
    banners: Vec<Banner>,
}

impl DocumentBuilder {
    /// Add a file-selection control with the given stable id.
    pub fn file_input(mut self, id: impl Into<String>) -> Self {
        self.input_ids.push(id.into());
        self
    }

    /// Add a notification banner.
    pub fn banner(mut self, banner: Banner) -> Self {
        self.banners.push(banner);
        self
    }

    /// Build the document.
    ///
    /// Fails if two controls share an id.
    pub fn build(self) -> Result<Document, GuardError> {
        let mut inputs = BTreeMap::new();
        for id in self.input_ids {
            if inputs
                .insert(id.clone(), FileInput { selection: None })
                .is_some()
            {
                return Err(GuardError::DuplicateInput(id));
            }
        }

        Ok(Document {
            inner: Arc::new(Mutex::new(DocumentInner {
                inputs,
                banners: self.banners,
                listeners: Vec::new(),
            })),
        })
    }
}
