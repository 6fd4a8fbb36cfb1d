//! Upload validation policy.
//!
//! Pure checks with no UI dependency: a policy inspects a
//! [`SelectedFile`] and returns the violations it finds. Feedback and
//! corrective action live in the guard, not here.

use serde::{Deserialize, Serialize};

use crate::document::SelectedFile;

/// Maximum upload size (16 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Well-known control id for the answer-sheet upload.
pub const ANSWER_SHEET_INPUT: &str = "answer-sheet";

/// Well-known control id for the answer-key upload.
pub const ANSWER_KEY_INPUT: &str = "answer-key";

/// Ordered, case-insensitive allow-list of file-name suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixSet {
    entries: Vec<String>,
}

impl SuffixSet {
    /// Create a suffix set. Entries are lowercased; order is preserved.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .collect(),
        }
    }

    /// Whether the lowercased candidate is in the set.
    pub fn contains(&self, suffix: &str) -> bool {
        let candidate = suffix.to_lowercase();
        self.entries.iter().any(|e| *e == candidate)
    }

    /// The entries, in declaration order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl std::fmt::Display for SuffixSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.entries.join(", "))
    }
}

/// A single validation violation.
///
/// Exactly two kinds exist; both are reported identically (user-facing
/// message plus corrective reset) and neither is a Rust error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The file-name suffix is not in the control's allowed set.
    DisallowedType {
        /// Derived (lowercased) suffix of the offending file.
        suffix: String,
        /// The allowed set, rendered for user display.
        allowed: String,
    },

    /// The file exceeds the size ceiling.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Ceiling in bytes.
        limit: u64,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::DisallowedType { suffix, allowed } => {
                write!(f, "file type not allowed: {suffix} (allowed: {allowed})")
            }
            Violation::TooLarge { size, limit } => {
                write!(f, "file too large: {size} bytes (max {limit} bytes)")
            }
        }
    }
}

/// Validation policy for one managed control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    allowed: SuffixSet,
    max_bytes: u64,
}

impl UploadPolicy {
    /// Create a policy from an allowed-suffix set and a size ceiling.
    pub fn new(allowed: SuffixSet, max_bytes: u64) -> Self {
        Self { allowed, max_bytes }
    }

    /// The allowed-suffix set.
    pub fn allowed(&self) -> &SuffixSet {
        &self.allowed
    }

    /// Run both checks against a selected file.
    ///
    /// The checks are independent: a wrong-typed oversized file yields both
    /// violations, type first, then size. An empty vec means the selection
    /// is valid.
    pub fn check(&self, file: &SelectedFile) -> Vec<Violation> {
        let mut violations = Vec::new();

        let suffix = file.suffix();
        if !self.allowed.contains(&suffix) {
            violations.push(Violation::DisallowedType {
                suffix,
                allowed: self.allowed.to_string(),
            });
        }

        if file.size > self.max_bytes {
            violations.push(Violation::TooLarge {
                size: file.size,
                limit: self.max_bytes,
            });
        }

        violations
    }
}

/// Policy for the answer-sheet control: image and PDF types.
pub fn answer_sheet_policy(max_bytes: u64) -> UploadPolicy {
    UploadPolicy::new(SuffixSet::new(["jpg", "jpeg", "png", "pdf"]), max_bytes)
}

/// Policy for the answer-key control: image, PDF, and plain-text types.
pub fn answer_key_policy(max_bytes: u64) -> UploadPolicy {
    UploadPolicy::new(
        SuffixSet::new(["jpg", "jpeg", "png", "pdf", "txt"]),
        max_bytes,
    )
}
