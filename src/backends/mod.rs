//! Backends module - File system access
//!
//! Provides:
//! - walk: Deterministic directory traversal with walkdir

pub mod walk;
