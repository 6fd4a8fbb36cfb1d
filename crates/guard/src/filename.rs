//! Upload filename helpers.
//!
//! Pure string transforms a host applies before handing a validated upload
//! to its storage collaborator. Nothing here touches the filesystem.

use std::path::Path;

use uuid::Uuid;

/// Longest sanitized name retained.
const MAX_NAME_LEN: usize = 200;

/// Sanitize a filename for safe storage.
///
/// Strips any path components, maps characters outside
/// `[a-zA-Z0-9.-_]` to `_`, and caps the length.
pub fn sanitize_filename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .take(MAX_NAME_LEN)
        .collect()
}

/// Produce a collision-free storage name: a time-ordered unique prefix
/// joined to the sanitized original name.
pub fn unique_filename(filename: &str) -> String {
    format!(
        "{}_{}",
        Uuid::now_v7().simple(),
        sanitize_filename(filename)
    )
}
