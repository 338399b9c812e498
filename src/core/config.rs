//! Collection configuration
//!
//! A `Config` is built once by the CLI layer and handed to the collector by
//! reference. Construction validates everything the collector relies on: the
//! root exists and is a directory, and at least one extension survives
//! normalization.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::tokenizer::TokenModel;

/// Extension list used when none is given on the command line
pub const DEFAULT_EXTENSIONS: &str = ".go,.md";

/// Errors detected before any traversal starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no valid extensions in {raw:?}")]
    NoExtensions { raw: String },

    #[error("root directory {} does not exist", .0.display())]
    RootNotFound(PathBuf),

    #[error("root path {} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("cannot access root directory {}", path.display())]
    RootAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot determine the current directory")]
    CurrentDir(#[source] io::Error),

    #[error("cannot create output file {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Immutable settings for one collection run
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    extensions: BTreeSet<String>,
    recursive: bool,
    skip_path: Option<PathBuf>,
    token_model: Option<TokenModel>,
}

impl Config {
    /// Validate `root` and parse the comma-separated `extensions` list
    pub fn new(root: &Path, extensions: &str, recursive: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            root: resolve_root(root)?,
            extensions: parse_extensions(extensions)?,
            recursive,
            skip_path: None,
            token_model: None,
        })
    }

    /// Never select the file at `path` (typically the output file itself)
    pub fn with_skip_path(mut self, path: Option<PathBuf>) -> Self {
        self.skip_path = path;
        self
    }

    /// Estimate the token count of the emitted document with `model`
    pub fn with_token_model(mut self, model: Option<TokenModel>) -> Self {
        self.token_model = model;
        self
    }

    /// Absolute, canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn skip_path(&self) -> Option<&Path> {
        self.skip_path.as_deref()
    }

    pub fn token_model(&self) -> Option<TokenModel> {
        self.token_model
    }

    /// Exact, case-sensitive membership test
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }
}

/// Normalize one extension entry: trim it and make sure it starts with a dot.
///
/// Returns `None` for entries that are empty (or a bare dot) after trimming.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    if trimmed.starts_with('.') {
        Some(trimmed.to_string())
    } else {
        Some(format!(".{}", trimmed))
    }
}

/// Parse a comma-separated extension list into a normalized set
pub fn parse_extensions(raw: &str) -> Result<BTreeSet<String>, ConfigError> {
    let set: BTreeSet<String> = raw.split(',').filter_map(normalize_extension).collect();
    if set.is_empty() {
        return Err(ConfigError::NoExtensions {
            raw: raw.to_string(),
        });
    }
    Ok(set)
}

/// Canonicalize the root and check that it is a directory
pub fn resolve_root(path: &Path) -> Result<PathBuf, ConfigError> {
    let root = path.canonicalize().map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::RootNotFound(path.to_path_buf())
        } else {
            ConfigError::RootAccess {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if !root.is_dir() {
        return Err(ConfigError::RootNotDirectory(path.to_path_buf()));
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_extension_adds_dot() {
        assert_eq!(normalize_extension("py"), Some(".py".to_string()));
        assert_eq!(normalize_extension(".py"), Some(".py".to_string()));
    }

    #[test]
    fn test_normalize_extension_trims() {
        assert_eq!(normalize_extension("  rs "), Some(".rs".to_string()));
        assert_eq!(normalize_extension("   "), None);
        assert_eq!(normalize_extension("."), None);
    }

    #[test]
    fn test_normalize_extension_keeps_case() {
        assert_eq!(normalize_extension("PY"), Some(".PY".to_string()));
    }

    #[test]
    fn test_parse_extensions_default() {
        let set = parse_extensions(DEFAULT_EXTENSIONS).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![".go", ".md"]);
    }

    #[test]
    fn test_parse_extensions_drops_empty_entries() {
        let set = parse_extensions(" go, ,,.py ,").unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![".go", ".py"]);
    }

    #[test]
    fn test_parse_extensions_dedupes_dot_variants() {
        let set = parse_extensions("py,.py").unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_parse_extensions_none_left() {
        let err = parse_extensions(" , ,").unwrap_err();
        assert!(matches!(err, ConfigError::NoExtensions { .. }));
    }

    #[test]
    fn test_resolve_root_missing() {
        let temp = tempdir().unwrap();
        let err = resolve_root(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::RootNotFound(_)));
    }

    #[test]
    fn test_resolve_root_not_directory() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.go");
        fs::write(&file, "package main").unwrap();

        let err = resolve_root(&file).unwrap_err();
        assert!(matches!(err, ConfigError::RootNotDirectory(_)));
    }

    #[test]
    fn test_config_new_is_absolute() {
        let temp = tempdir().unwrap();
        let config = Config::new(temp.path(), "go", false).unwrap();
        assert!(config.root().is_absolute());
        assert!(!config.recursive());
        assert!(config.matches_extension(".go"));
        assert!(!config.matches_extension(".GO"));
        assert!(config.skip_path().is_none());
        assert!(config.token_model().is_none());
    }
}
