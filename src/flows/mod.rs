//! Flows module - End-to-end operations
//!
//! Provides:
//! - collect: Walk, read and emit the Markdown document

pub mod collect;
