//! CLI tool for xlchunk - inspects, pages and previews spreadsheets as JSON
//!
//! Usage:
//!   xlchunk_cli info <origin> [--sheet NAME]
//!   xlchunk_cli read <origin> --sheet NAME --start-row N [--batch-size N] [--end-row N]
//!                    [--start-col COL] [--end-col COL]
//!   xlchunk_cli preview <origin> [--sheet NAME] [--rows N] [--cols N]
//!   xlchunk_cli dump <origin> --sheet NAME [--batch-size N] [--start-col COL] [--end-col COL]
//!
//! Columns are given as letters (`C`) or 1-based numbers (`3`).
//!
//! Results go to stdout; logs and errors go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use xlchunk::cell_ref::parse_column;
use xlchunk::config::{ENV_FILES_ROOT, ENV_HTTP_TIMEOUT_SECS, ENV_MAX_DOWNLOAD_BYTES};
use xlchunk::{Batches, Engine, EngineConfig, RowWindow, XlchunkError};

#[derive(Parser)]
#[command(name = "xlchunk_cli", version, about = "Chunked access to large spreadsheets")]
struct Cli {
    /// Directory that relative paths are resolved against
    #[arg(long, global = true, env = ENV_FILES_ROOT)]
    files_root: Option<PathBuf>,

    /// Timeout for fetching remote origins, in seconds
    #[arg(long, global = true, env = ENV_HTTP_TIMEOUT_SECS)]
    timeout_secs: Option<u64>,

    /// Refuse remote payloads larger than this many bytes
    #[arg(long, global = true, env = ENV_MAX_DOWNLOAD_BYTES)]
    max_download_bytes: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sheet dimensions, size class and recommended batch size
    Info {
        origin: String,
        /// Sheet the advice applies to (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },
    /// Read one batch of rows
    Read {
        origin: String,
        #[arg(long)]
        sheet: String,
        #[arg(long)]
        start_row: u32,
        #[arg(long)]
        batch_size: Option<u32>,
        #[arg(long)]
        end_row: Option<u32>,
        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Top-left sample of a sheet
    Preview {
        origin: String,
        #[arg(long)]
        sheet: Option<String>,
        #[arg(long)]
        rows: Option<u32>,
        #[arg(long)]
        cols: Option<u32>,
    },
    /// Follow the cursor through a whole sheet, one JSON line per batch
    Dump {
        origin: String,
        #[arg(long)]
        sheet: String,
        #[arg(long)]
        batch_size: Option<u32>,
        #[command(flatten)]
        columns: ColumnArgs,
    },
}

/// Optional column range shared by `read` and `dump`.
#[derive(Args)]
struct ColumnArgs {
    /// First column to return (default: A)
    #[arg(long, value_parser = column_arg)]
    start_col: Option<u32>,
    /// Last column to return (default: last used column)
    #[arg(long, value_parser = column_arg)]
    end_col: Option<u32>,
}

impl ColumnArgs {
    fn apply(&self, window: RowWindow) -> RowWindow {
        RowWindow {
            start_col: self.start_col,
            end_col: self.end_col,
            ..window
        }
    }
}

fn column_arg(raw: &str) -> Result<u32, String> {
    parse_column(raw).ok_or_else(|| format!("'{raw}' is not a column between A and XFD"))
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Engine(#[from] XlchunkError),

    #[error("JSON serialization: {0}")]
    Json(#[from] serde_json::Error),

    #[error("writing output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Engine(e) => e.kind(),
            Self::Json(_) | Self::Output(_) => "output",
        }
    }
}

impl From<xlchunk::OpenError> for CliError {
    fn from(e: xlchunk::OpenError) -> Self {
        Self::Engine(e.into())
    }
}

impl From<xlchunk::ReadError> for CliError {
    fn from(e: xlchunk::ReadError) -> Self {
        Self::Engine(e.into())
    }
}

fn build_config(cli: &Cli) -> EngineConfig {
    let mut config = EngineConfig::default();
    if let Some(root) = &cli.files_root {
        config = config.with_files_root(root.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_http_timeout(Duration::from_secs(secs));
    }
    if let Some(limit) = cli.max_download_bytes {
        config = config.with_max_download_bytes(limit);
    }
    config
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let engine = Engine::new(build_config(&cli));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Info { origin, sheet } => {
            let info = engine.get_file_info(&origin, sheet.as_deref())?;
            emit(&mut out, &info, cli.pretty)?;
        }
        Command::Read {
            origin,
            sheet,
            start_row,
            batch_size,
            end_row,
            columns,
        } => {
            let window = columns.apply(RowWindow {
                end_row,
                batch_size,
                ..RowWindow::from_row(start_row)
            });
            let batch = engine.read_batch(&origin, &sheet, &window)?;
            emit(&mut out, &batch, cli.pretty)?;
        }
        Command::Preview {
            origin,
            sheet,
            rows,
            cols,
        } => {
            let preview = engine.preview(&origin, sheet.as_deref(), rows, cols)?;
            emit(&mut out, &preview, cli.pretty)?;
        }
        Command::Dump {
            origin,
            sheet,
            batch_size,
            columns,
        } => {
            let mut workbook = engine.open(&origin)?;
            let start = columns.apply(RowWindow {
                batch_size,
                ..RowWindow::from_row(1)
            });
            let result = Batches::new(&workbook, &sheet, start)
                .try_for_each(|batch| emit(&mut out, &batch?, false));
            workbook.close();
            result?;
        }
    }

    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.kind());
            ExitCode::FAILURE
        }
    }
}
