//! Markdown section rendering
//!
//! Each selected file becomes one section, written as four pieces:
//!
//! ````text
//! ## File: `pkg/util.go`
//!
//! ```go
//! <raw bytes>
//! ```
//!
//! ````

use std::borrow::Cow;
use std::io::Write;

use crate::core::model::{CollectError, FileEntry, WriteStage};

const FENCE: &str = "```";

/// Code-fence language tag for an extension (`.go` -> `go`, `.md` -> `markdown`)
pub fn language_tag(extension: &str) -> String {
    let tag = extension.strip_prefix('.').unwrap_or(extension).to_lowercase();
    match tag.as_str() {
        "md" => "markdown".to_string(),
        _ => tag,
    }
}

/// One file's section, borrowed from the entry and its contents
pub struct Section<'a> {
    entry: &'a FileEntry,
    content: &'a [u8],
}

impl<'a> Section<'a> {
    pub fn new(entry: &'a FileEntry, content: &'a [u8]) -> Self {
        Self { entry, content }
    }

    fn header(&self) -> String {
        format!("## File: `{}`\n\n", self.entry.relative)
    }

    fn opening_fence(&self) -> String {
        format!("{}{}\n", FENCE, language_tag(&self.entry.extension))
    }

    fn closing_fence() -> String {
        format!("\n{}\n\n", FENCE)
    }

    /// Write the four pieces in order and flush; the first failure aborts
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<(), CollectError> {
        let pieces: [(WriteStage, Cow<'_, [u8]>); 4] = [
            (WriteStage::Header, Cow::Owned(self.header().into_bytes())),
            (
                WriteStage::OpeningFence,
                Cow::Owned(self.opening_fence().into_bytes()),
            ),
            (WriteStage::Content, Cow::Borrowed(self.content)),
            (
                WriteStage::ClosingFence,
                Cow::Owned(Self::closing_fence().into_bytes()),
            ),
        ];

        for (stage, bytes) in pieces {
            sink.write_all(&bytes)
                .map_err(|source| CollectError::Write {
                    stage,
                    path: self.entry.relative.clone(),
                    source,
                })?;
        }
        sink.flush().map_err(|source| CollectError::Write {
            stage: WriteStage::Flush,
            path: self.entry.relative.clone(),
            source,
        })
    }

    /// The section as text, invalid UTF-8 replaced; used for token estimates
    pub fn to_text_lossy(&self) -> String {
        format!(
            "{}{}{}{}",
            self.header(),
            self.opening_fence(),
            String::from_utf8_lossy(self.content),
            Self::closing_fence()
        )
    }
}
