//! srcpack - Bundle source files into a single Markdown document
//!
//! srcpack walks a directory, selects files by extension and writes each one
//! as a "## File:" header plus a fenced code block, ready to paste into an
//! LLM chat.

use clap::Parser;
use std::process::ExitCode;

mod backends;
mod cli;
mod core;
mod flows;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => cli::report(&err),
    }
}
