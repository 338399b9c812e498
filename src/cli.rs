//! CLI module - Command-line interface definition and run loop

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::core::config::{Config, ConfigError, DEFAULT_EXTENSIONS};
use crate::core::diag::{Diagnostics, Verbosity};
use crate::core::model::Summary;
use crate::core::tokenizer::TokenModel;
use crate::flows::collect::collect;

/// Exit status for fatal collection errors (sink failures, unwalkable root)
pub const EXIT_FATAL: u8 = 1;

/// Exit status for configuration errors; matches clap's usage-error status
pub const EXIT_CONFIG: u8 = 2;

/// Format of the final summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(SummaryFormat::Text),
            "json" => Ok(SummaryFormat::Json),
            _ => Err(format!("Unknown summary format: {}", s)),
        }
    }
}

/// srcpack - bundle source files into one Markdown document for LLM chats.
#[derive(Parser, Debug)]
#[command(name = "srcpack")]
#[command(
    author,
    version,
    about,
    long_about = r###"srcpack walks a directory, picks the files whose extension is in the
configured set, and writes them into a single Markdown document: one
"## File: `path`" header and one fenced code block per file.

Progress lines and warnings go to stderr; the summary goes to stdout.

Examples:
    srcpack -o context.md
    srcpack -o context.md -d ./service -e go,proto,md -r
    srcpack -o - -e rs -r | pbcopy
"###
)]
pub struct Cli {
    /// Output file ("-" for stdout).
    #[arg(
        short,
        long,
        value_name = "FILE",
        long_help = "File to write the Markdown document to. It is created or truncated\n\
before the walk starts.\n\n\
Use \"-\" to write the document to stdout; the summary then goes to stderr.\n\
If the output file lies inside the walked directory it is never included in itself."
    )]
    pub output: PathBuf,

    /// Directory to collect from.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        long_help = "Root directory of the walk. Paths in the document are relative to it.\n\n\
If omitted, the current directory is used and a notice is printed."
    )]
    pub dir: Option<PathBuf>,

    /// Comma-separated extensions to include.
    #[arg(
        short,
        long,
        value_name = "LIST",
        env = "SRCPACK_EXT",
        default_value = DEFAULT_EXTENSIONS,
        long_help = "Comma-separated list of file extensions to include.\n\n\
Entries are trimmed, empty entries are dropped and a leading dot is added when\n\
missing, so \"go, md\" and \".go,.md\" are the same. Matching is case-sensitive."
    )]
    pub ext: String,

    /// Descend into subdirectories.
    #[arg(
        short,
        long,
        long_help = "Walk subdirectories as well. Without this flag only the files directly\n\
inside DIR are collected."
    )]
    pub recursive: bool,

    /// Quiet mode (no progress lines).
    #[arg(
        short,
        long,
        long_help = "Suppress per-file progress lines and notices. Warnings, the fatal error\n\
message and the summary are still printed."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable colored diagnostics.
    #[arg(long)]
    pub no_color: bool,

    /// Estimate the token count of the document.
    #[arg(
        long,
        long_help = "Estimate how many tokens the emitted document takes and include the\n\
estimate in the summary. See --token-model."
    )]
    pub stats: bool,

    /// Token model used by --stats (cl100k/o200k/heuristic).
    #[arg(long, value_name = "MODEL", default_value = "cl100k")]
    pub token_model: TokenModel,

    /// Summary format (text/json).
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        long_help = "Format of the final summary.\n\n\
Supported values:\n\
- text (default): one human-readable line\n\
- json: one JSON object with files_written, skipped, output (and tokens with --stats)"
    )]
    pub summary_format: SummaryFormat,
}

/// Run a collection from parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    let diag = Diagnostics::new(Verbosity::from_flags(cli.quiet, cli.verbose));

    let dir = match cli.dir {
        Some(dir) => dir,
        None => {
            let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
            diag.notice(format!(
                "no directory given, using current directory {}",
                cwd.display()
            ));
            cwd
        }
    };

    let token_model = cli.stats.then_some(cli.token_model);
    let config = Config::new(&dir, &cli.ext, cli.recursive)?.with_token_model(token_model);

    let to_stdout = cli.output.as_os_str() == "-";
    let mut sink: Box<dyn Write> = if to_stdout {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(&cli.output)
            .map_err(|source| ConfigError::Output {
                path: cli.output.clone(),
                source,
            })
            .context("cannot open the output sink")?;
        Box::new(BufWriter::new(file))
    };

    let skip_path = if to_stdout {
        None
    } else {
        cli.output.canonicalize().ok()
    };
    let config = config.with_skip_path(skip_path);

    diag.debug(format!("root: {}", config.root().display()));
    diag.debug(format!(
        "extensions: {}",
        config
            .extensions()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    ));
    diag.debug(format!("recursive: {}", config.recursive()));
    if let Some(skip) = config.skip_path().filter(|p| p.starts_with(config.root())) {
        diag.debug(format!("output {} is inside the root, skipping it", skip.display()));
    }

    let result = collect(&config, &mut sink, &diag);
    drop(sink);
    let result = result.into_result().context("collection aborted")?;

    let summary = Summary {
        files_written: result.files_written,
        skipped: result.skipped.len(),
        output: if to_stdout {
            "<stdout>".to_string()
        } else {
            cli.output.display().to_string()
        },
        tokens: result.tokens,
        token_model: token_model.map(|m| m.to_string()),
    };

    let line = match cli.summary_format {
        SummaryFormat::Text => summary.to_string(),
        SummaryFormat::Json => {
            serde_json::to_string(&summary).context("failed to serialize summary")?
        }
    };
    if to_stdout {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }

    Ok(())
}

/// Exit status for an error returned by `run`
pub fn exit_status(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        EXIT_CONFIG
    } else {
        EXIT_FATAL
    }
}

/// Print the fatal message and pick the exit status
pub fn report(err: &anyhow::Error) -> ExitCode {
    Diagnostics::default().error(format!("{:#}", err));
    ExitCode::from(exit_status(err))
}
