//! CLI commands for the LogEvents dashboard view
//!
//! - `render`: turn a saved server response into a static dashboard page, with the
//!   filter controls reflecting a given query
//! - `filter`: show how a query or fragment decodes, and its canonical form
//!
//! Configuration comes from the `LOGEVENTS_VIEW_*` environment variables.

#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use logevents_view_core::{ViewConfig, codec, parse_payload, render_static_page};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    View(#[from] logevents_view_core::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "logevents-view", version, about = "LogEvents dashboard view tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a server response into a static HTML page
    Render {
        /// JSON file holding `{"facets": ..., "events": [...]}`; `-` reads stdin
        #[arg(long)]
        payload: PathBuf,

        /// Filter as a query string or fragment (`?level=WARN`, `#logger=a.B`)
        #[arg(long, default_value = "")]
        query: String,

        /// Output file; defaults to stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Decode a filter query and print it as JSON with its canonical form
    Filter {
        /// Query string or fragment
        query: String,
    },
}

pub fn run() -> i32 {
    run_with_args(std::env::args_os())
}

/// Parse `args` (including the program name) and execute.
pub fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    init_logging(cli.verbose);
    match execute(cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Logs go to stderr so rendered HTML and JSON on stdout stay clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn execute(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Render {
            payload,
            query,
            output,
        } => handle_render(&payload, &query, output.as_deref()),
        Commands::Filter { query } => handle_filter(&query),
    }
}

fn read_input(path: &Path) -> CliResult<String> {
    if path.as_os_str() == "-" {
        return Ok(io::read_to_string(io::stdin())?);
    }
    if !path.exists() {
        return Err(CliError::InvalidArgument(format!(
            "payload file not found: {}",
            path.display()
        )));
    }
    Ok(fs::read_to_string(path)?)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            info!(path = %path.display(), bytes = content.len(), "page written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn handle_render(payload: &Path, query: &str, output: Option<&Path>) -> CliResult<()> {
    let config = ViewConfig::from_env();
    let filter = codec::parse(query);
    debug!(?filter, "filter decoded");
    let payload = parse_payload(&read_input(payload)?)?;
    let html = render_static_page(&filter, &payload, &config)?;
    write_output(output, &html)
}

fn handle_filter(query: &str) -> CliResult<()> {
    let filter = codec::parse(query);
    let report = serde_json::json!({
        "filter": filter,
        "canonical": codec::serialize(&filter),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
