//! Directory traversal
//!
//! Walks the root with walkdir in file-name order and yields one event per
//! selected file or skipped entry. Non-recursive walks stop at depth 1, so
//! subdirectories of the root are listed but never opened.

use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::core::config::Config;
use crate::core::model::{CollectError, FileEntry, SkipReason, Skipped};
use crate::core::paths::{file_extension, make_relative};

/// What the walk produced for one entry
#[derive(Debug)]
pub enum WalkEvent {
    Selected(FileEntry),
    Skipped(Skipped),
}

/// Iterator over the selected files under a root
///
/// Yields `Err` once if the root itself cannot be walked, then ends.
pub struct Walk<'a> {
    config: &'a Config,
    inner: walkdir::IntoIter,
    done: bool,
}

impl<'a> Walk<'a> {
    pub fn new(config: &'a Config) -> Self {
        let max_depth = if config.recursive() { usize::MAX } else { 1 };
        let inner = WalkDir::new(config.root())
            .follow_links(false)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter();

        Self {
            config,
            inner,
            done: false,
        }
    }

    fn select(&self, entry: walkdir::DirEntry) -> Option<FileEntry> {
        // Symlinks are not followed, so they never report as regular files
        if entry.depth() == 0 || !entry.file_type().is_file() {
            return None;
        }

        let path = entry.path();
        if self.config.skip_path() == Some(path) {
            return None;
        }

        let extension = file_extension(path)?;
        if !self.config.matches_extension(&extension) {
            return None;
        }
        let relative = make_relative(path, self.config.root())?;

        Some(FileEntry {
            path: entry.into_path(),
            relative,
            extension,
        })
    }

    fn skipped(&self, err: &walkdir::Error) -> Skipped {
        let reason = match err.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::PermissionDenied) => SkipReason::PermissionDenied,
            Some(io::ErrorKind::NotFound) => SkipReason::Vanished,
            _ => SkipReason::Inaccessible,
        };
        let detail = err
            .io_error()
            .map(ToString::to_string)
            .unwrap_or_else(|| err.to_string());

        match err.path() {
            Some(path) => {
                let shown = self.display_path(path);
                let skipped = Skipped::new(shown, reason, detail);
                if path.is_dir() {
                    skipped.subtree()
                } else {
                    skipped
                }
            }
            None => Skipped::new(self.config.root().display().to_string(), reason, detail),
        }
    }

    fn display_path(&self, path: &Path) -> String {
        make_relative(path, self.config.root()).unwrap_or_else(|| path.display().to_string())
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<WalkEvent, CollectError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if let Some(file) = self.select(entry) {
                        return Some(Ok(WalkEvent::Selected(file)));
                    }
                }
                Err(err) if err.path() == Some(self.config.root()) => {
                    self.done = true;
                    return Some(Err(CollectError::WalkStart {
                        root: self.config.root().to_path_buf(),
                        source: err,
                    }));
                }
                Err(err) => return Some(Ok(WalkEvent::Skipped(self.skipped(&err)))),
            }
        }
    }
}
