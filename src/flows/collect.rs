//! Collector flow - Walk the root and emit one Markdown section per selected file
//!
//! Reading and writing are interleaved: each file is read and written before
//! the walk moves on. Unreadable entries become warnings; sink failures and a
//! root that cannot be walked end the run.

use std::fs;
use std::io::Write;

use crate::backends::walk::{Walk, WalkEvent};
use crate::core::config::Config;
use crate::core::diag::Diagnostics;
use crate::core::model::{CollectError, CollectionResult, FileEntry, SkipReason, Skipped};
use crate::core::render::Section;
use crate::core::tokenizer::count_tokens;

/// Collect every selected file under `config.root()` into `sink`.
///
/// Each section is flushed as soon as it is written, so a failing sink is
/// reported against the file it was writing. The sink is flushed once more
/// before returning.
pub fn collect<W: Write + ?Sized>(
    config: &Config,
    sink: &mut W,
    diag: &Diagnostics,
) -> CollectionResult {
    let mut result = CollectionResult {
        tokens: config.token_model().map(|_| 0),
        ..Default::default()
    };

    for event in Walk::new(config) {
        match event {
            Ok(WalkEvent::Selected(entry)) => {
                if let Err(err) = emit(config, &entry, sink, diag, &mut result) {
                    result.fail(err);
                    return result;
                }
            }
            Ok(WalkEvent::Skipped(skipped)) => {
                diag.warn(&skipped);
                result.skipped.push(skipped);
            }
            Err(err) => {
                result.fail(err);
                return result;
            }
        }
    }

    if let Err(source) = sink.flush() {
        result.fail(CollectError::Flush(source));
    }
    result
}

/// Read one file and write its section. Only sink failures are returned.
fn emit<W: Write + ?Sized>(
    config: &Config,
    entry: &FileEntry,
    sink: &mut W,
    diag: &Diagnostics,
    result: &mut CollectionResult,
) -> Result<(), CollectError> {
    diag.processing(&entry.relative);

    let content = match fs::read(&entry.path) {
        Ok(content) => content,
        Err(e) => {
            let skipped = Skipped::new(&entry.relative, SkipReason::Unreadable, e.to_string());
            diag.warn(&skipped);
            result.skipped.push(skipped);
            return Ok(());
        }
    };

    let section = Section::new(entry, &content);
    section.write_to(sink)?;
    result.files_written += 1;

    if let (Some(model), Some(total)) = (config.token_model(), result.tokens.as_mut()) {
        *total += count_tokens(&section.to_text_lossy(), model);
    }
    Ok(())
}
