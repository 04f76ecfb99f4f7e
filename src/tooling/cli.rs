//! CLI Tooling
//!
//! Command-line interface for mailbox snapshot extraction. Records stream to
//! stdout (or a file); diagnostics and the run summary go to stderr via the
//! logging layer so the record stream stays parseable.

use crate::config::SnapshotConfig;
use crate::error::SnapshotError;
use crate::logging;
use crate::page::PageCursor;
use crate::snapshot::SnapshotRunner;
use crate::store::http::HttpStore;
use crate::store::RemoteStore;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Mailsnap CLI - mailbox snapshot extraction
#[derive(Parser)]
#[command(name = "mailsnap")]
#[command(about = "Snapshot a remote mailbox's folders and messages as JSON records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (default: config.json in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the snapshot, one JSON record per message
    Run {
        /// Write records to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate configuration and store connectivity
    Check,
}

/// Execution context holding loaded configuration.
pub struct CliContext {
    config: SnapshotConfig,
}

impl CliContext {
    /// Load configuration and initialize logging, honoring CLI overrides.
    pub fn new(
        config_path: Option<PathBuf>,
        log_level: Option<String>,
        log_format: Option<String>,
    ) -> Result<Self, SnapshotError> {
        let config = SnapshotConfig::load(config_path.as_deref())?;
        let mut logging_config = config.logging.clone();
        if let Some(level) = log_level {
            logging_config.level = level;
        }
        if let Some(format) = log_format {
            logging_config.format = format;
        }
        logging::init(&logging_config)?;
        Ok(CliContext { config })
    }

    /// Execute a command, returning text for stdout (may be empty when the
    /// command already streamed its output).
    pub fn execute(&self, command: &Commands) -> Result<String, SnapshotError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| SnapshotError::Runtime(format!("failed to create runtime: {}", e)))?;
        match command {
            Commands::Run { output } => runtime.block_on(self.run_snapshot(output.as_deref())),
            Commands::Check => runtime.block_on(self.check()),
        }
    }

    async fn run_snapshot(&self, output: Option<&Path>) -> Result<String, SnapshotError> {
        let store = HttpStore::new(&self.config.connection)?;
        let runner = SnapshotRunner::new(&store, self.config.extraction.clone());

        match output {
            Some(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                let summary = runner.run(&mut writer).await?;
                writer.flush()?;
                Ok(format!(
                    "snapshot complete: {} folders, {} messages emitted, {} skipped",
                    summary.folders, summary.messages_emitted, summary.messages_skipped
                ))
            }
            None => {
                // Records own stdout; report the summary through logging.
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                let summary = runner.run(&mut writer).await?;
                info!(
                    folders = summary.folders,
                    emitted = summary.messages_emitted,
                    skipped = summary.messages_skipped,
                    "snapshot complete"
                );
                Ok(String::new())
            }
        }
    }

    async fn check(&self) -> Result<String, SnapshotError> {
        let store = HttpStore::new(&self.config.connection)?;
        store.fetch_folder_page(PageCursor::start(), 1).await?;
        Ok("configuration and store connectivity ok".to_string())
    }
}
