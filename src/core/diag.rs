//! Diagnostic side channel
//!
//! Progress lines, warnings and the fatal message go to stderr and never touch
//! the Markdown document.

use colored::Colorize;
use std::fmt::Display;

/// How much goes to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Nothing at all
    #[cfg(test)]
    Silent,
    /// Warnings and errors only
    Quiet,
    #[default]
    Normal,
    /// Normal plus debug lines
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    verbosity: Verbosity,
}

impl Diagnostics {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[cfg(test)]
    pub fn silent() -> Self {
        Self::new(Verbosity::Silent)
    }

    #[cfg(test)]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Per-file progress line
    pub fn processing(&self, relative: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "processing".cyan(), relative);
        }
    }

    pub fn notice(&self, msg: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "note:".bold(), msg);
        }
    }

    pub fn debug(&self, msg: impl Display) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "debug:".dimmed(), msg);
        }
    }

    pub fn warn(&self, msg: impl Display) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "warning:".yellow().bold(), msg);
        }
    }

    pub fn error(&self, msg: impl Display) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "error:".red().bold(), msg);
        }
    }
}
