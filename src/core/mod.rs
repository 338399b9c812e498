//! Core module - Configuration, data model and rendering
//!
//! This module provides:
//! - The validated run configuration
//! - Entry, skip and result types
//! - Path normalization
//! - Markdown section rendering
//! - The stderr diagnostic channel
//! - Token estimation for the emitted document

pub mod config;
pub mod diag;
pub mod model;
pub mod paths;
pub mod render;
pub mod tokenizer;
