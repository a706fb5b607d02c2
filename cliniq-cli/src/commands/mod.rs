//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod analytics;
mod document;
mod job;
mod upload;

pub use document::DocumentCommands;
pub use job::JobCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use cliniq_client::DownloadedBundle;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::types::UseCaseArg;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Upload PDF or ZIP files and start a processing job
    Upload {
        /// Files to upload (.pdf or .zip)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Business flow the documents belong to
        #[arg(long, value_enum, default_value_t = UseCaseArg::ClaimSubmission)]
        use_case: UseCaseArg,

        /// Wait for the job to finish, printing pipeline progress
        #[arg(short, long)]
        wait: bool,
    },
    /// Job history and progress
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Extracted data review, validation and export for one document
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// Show processing statistics
    Analytics,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Upload {
            files,
            use_case,
            wait,
        } => upload::handle_upload(files, use_case.into(), wait, config).await,
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Document { command } => {
            document::handle_document_command(command, config).await
        }
        Commands::Analytics => analytics::show_analytics(config).await,
    }
}

/// Format a 0..1 confidence score as a percentage
pub(crate) fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(value) => format!("{}%", (value * 100.0).round() as i64),
        None => "-".to_string(),
    }
}

/// Format a value that is already in percent
pub(crate) fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Write a downloaded bundle to disk
///
/// # Returns
/// The path the bundle was written to
pub(crate) async fn save_bundle(bundle: &DownloadedBundle, output: Option<&Path>) -> Result<PathBuf> {
    let path = output_path(output, &bundle.filename);

    tokio::fs::write(&path, &bundle.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

/// Where to store a download: the given file, inside the given directory,
/// or the suggested name in the working directory
fn output_path(output: Option<&Path>, filename: &str) -> PathBuf {
    match output {
        Some(dir) if dir.is_dir() => dir.join(filename),
        Some(file) => file.to_path_buf(),
        None => PathBuf::from(filename),
    }
}
