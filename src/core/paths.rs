//! Path normalization utilities
//!
//! Paths shown in the document always use '/' as separator and are relative to the root.

use std::path::{Component, Path};

/// Join the components of a path with '/' regardless of the host separator
pub fn normalize_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Extension of a file name: everything from the last '.' on, dot included.
///
/// Names without a '.' have no extension. A leading dot counts, so `.bashrc`
/// has the extension `.bashrc`.
pub fn file_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    name.rfind('.').map(|idx| name[idx..].to_string())
}
