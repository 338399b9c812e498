//! Data model for a collection run
//!
//! Everything here lives for a single invocation: `FileEntry` for the file
//! being processed, `Skipped` for each warning, `CollectionResult` for the
//! run as a whole and `Summary` for the completion report.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A selected file, alive while it is read and emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the root, '/'-separated
    pub relative: String,
    /// Extension including the leading dot
    pub extension: String,
}

/// Why an entry was left out of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PermissionDenied,
    /// Entry disappeared between listing and access
    Vanished,
    /// Any other I/O failure while walking
    Inaccessible,
    /// Selected file whose contents could not be read
    Unreadable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::PermissionDenied => "permission denied",
            SkipReason::Vanished => "no longer exists",
            SkipReason::Inaccessible => "cannot be accessed",
            SkipReason::Unreadable => "cannot be read",
        };
        write!(f, "{}", s)
    }
}

/// A non-fatal skip, reported as a warning
#[derive(Debug, Clone)]
pub struct Skipped {
    /// Relative path when known, otherwise the absolute path
    pub path: String,
    pub reason: SkipReason,
    /// The skipped entry is a directory; its whole subtree is gone
    pub subtree: bool,
    pub detail: String,
}

impl Skipped {
    pub fn new(path: impl Into<String>, reason: SkipReason, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason,
            subtree: false,
            detail: detail.into(),
        }
    }

    pub fn subtree(mut self) -> Self {
        self.subtree = true;
        self
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = if self.subtree { "directory" } else { "file" };
        write!(
            f,
            "skipping {} {}: {} ({})",
            what, self.path, self.reason, self.detail
        )
    }
}

/// The piece of a section that was being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Header,
    OpeningFence,
    Content,
    ClosingFence,
    /// Pushing the finished section out of the sink's buffer
    Flush,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WriteStage::Header => "header",
            WriteStage::OpeningFence => "opening fence",
            WriteStage::Content => "content",
            WriteStage::ClosingFence => "closing fence",
            WriteStage::Flush => "flush",
        };
        write!(f, "{}", s)
    }
}

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("cannot start walking {}", root.display())]
    WalkStart {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write {stage} for {path}")]
    Write {
        stage: WriteStage,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to flush output")]
    Flush(#[source] io::Error),
}

/// Outcome of one collection run
#[derive(Debug, Default)]
pub struct CollectionResult {
    /// Sections fully written to the sink
    pub files_written: usize,
    /// Set only for sink failures and walk-start failures
    pub first_fatal_error: Option<CollectError>,
    pub skipped: Vec<Skipped>,
    /// Estimated size of the document, when a token model was configured
    pub tokens: Option<usize>,
}

impl CollectionResult {
    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        self.first_fatal_error.is_none()
    }

    /// Record a fatal error, keeping the first one
    pub fn fail(&mut self, err: CollectError) {
        if self.first_fatal_error.is_none() {
            self.first_fatal_error = Some(err);
        }
    }

    /// Split into the success counters or the fatal error
    pub fn into_result(mut self) -> Result<Self, CollectError> {
        match self.first_fatal_error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Completion report printed after a successful run
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub files_written: usize,
    pub skipped: usize,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_model: Option<String>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrote {} file(s) to {}", self.files_written, self.output)?;
        if self.skipped > 0 {
            write!(f, " ({} skipped)", self.skipped)?;
        }
        if let (Some(tokens), Some(model)) = (self.tokens, &self.token_model) {
            write!(f, ", ~{} tokens ({})", tokens, model)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_error(stage: WriteStage) -> CollectError {
        CollectError::Write {
            stage,
            path: "main.go".to_string(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        }
    }

    #[test]
    fn test_write_error_names_stage_and_file() {
        let msg = write_error(WriteStage::OpeningFence).to_string();
        assert_eq!(msg, "failed to write opening fence for main.go");

        let msg = write_error(WriteStage::Flush).to_string();
        assert_eq!(msg, "failed to write flush for main.go");
    }

    #[test]
    fn test_fail_keeps_first_error() {
        let mut result = CollectionResult::default();
        result.fail(write_error(WriteStage::Header));
        result.fail(CollectError::Flush(io::Error::new(io::ErrorKind::Other, "x")));

        assert!(!result.is_success());
        let err = result.into_result().unwrap_err();
        assert!(matches!(
            err,
            CollectError::Write {
                stage: WriteStage::Header,
                ..
            }
        ));
    }

    #[test]
    fn test_skipped_display() {
        let file = Skipped::new("b.go", SkipReason::Unreadable, "Permission denied");
        assert_eq!(
            file.to_string(),
            "skipping file b.go: cannot be read (Permission denied)"
        );

        let dir = Skipped::new("secret", SkipReason::PermissionDenied, "os error 13").subtree();
        assert!(dir.to_string().starts_with("skipping directory secret"));
    }

    #[test]
    fn test_summary_text() {
        let summary = Summary {
            files_written: 3,
            skipped: 1,
            output: "out.md".to_string(),
            tokens: Some(120),
            token_model: Some("cl100k".to_string()),
        };
        assert_eq!(
            summary.to_string(),
            "Wrote 3 file(s) to out.md (1 skipped), ~120 tokens (cl100k)"
        );
    }

    #[test]
    fn test_summary_json_omits_tokens() {
        let summary = Summary {
            files_written: 0,
            skipped: 0,
            output: "out.md".to_string(),
            tokens: None,
            token_model: None,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"files_written":0,"skipped":0,"output":"out.md"}"#);
    }
}
