//! Job command handlers
//!
//! Handles all job-related CLI commands: browsing the job history,
//! viewing details, waiting on a running job and exporting its bundle.

use anyhow::{Context, Result};
use clap::Subcommand;
use cliniq_client::{ClinIqClient, PollOptions};
use cliniq_core::domain::job::{JobDetail, JobStatus, JobSummary, PipelineStage};
use cliniq_core::dto::job::{DEFAULT_PER_PAGE, ListJobsQuery};
use colored::*;
use std::path::PathBuf;

use super::{format_confidence, save_bundle};
use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::types::IdOrPrefix;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List the job history
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Jobs per page
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,

        /// Only show jobs with this status (e.g. completed, failed)
        #[arg(short, long)]
        status: Option<String>,

        /// Only show jobs whose ID or use case contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Get job details
    Get {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Wait for a job to finish, printing pipeline progress
    Watch {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Download the combined claim bundle of a job
    Bundle {
        /// Job ID or unambiguous prefix
        id: String,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        JobCommands::List {
            page,
            per_page,
            status,
            search,
        } => list_jobs(&client, page, per_page, status, search).await,
        JobCommands::Get { id } => get_job(&client, &id).await,
        JobCommands::Watch { id } => {
            let job_id = resolve_job_id(&client, &IdOrPrefix::parse(&id)).await?;
            let job = watch_job(&client, &job_id, config.poll_options()).await?;
            println!();
            print_job_details(&job);
            Ok(())
        }
        JobCommands::Bundle { id, output } => download_bundle(&client, &id, output).await,
    }
}

/// List one page of the job history
async fn list_jobs(
    client: &ClinIqClient,
    page: u32,
    per_page: u32,
    status: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let listing = client
        .list_jobs(ListJobsQuery { page, per_page })
        .await
        .context("Failed to load job history")?;

    let jobs: Vec<&JobSummary> = listing
        .items
        .iter()
        .filter(|job| matches_filters(job, status.as_deref(), search.as_deref()))
        .collect();

    if jobs.is_empty() {
        if status.is_some() || search.is_some() {
            println!("{}", "No jobs match the given filters.".yellow());
        } else {
            println!("{}", "No jobs found.".yellow());
        }
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(job);
        }
    }

    println!(
        "{}",
        format!(
            "Page {} of {} ({} job(s) total)",
            listing.page,
            listing.total_pages(),
            listing.total
        )
        .dimmed()
    );

    Ok(())
}

/// Client-side history filter: exact status, and search text in ID or use case
fn matches_filters(job: &JobSummary, status: Option<&str>, search: Option<&str>) -> bool {
    if let Some(status) = status {
        if !job.status.as_str().eq_ignore_ascii_case(status) {
            return false;
        }
    }

    if let Some(search) = search {
        let needle = search.to_lowercase();
        let in_id = job.id.to_lowercase().contains(&needle);
        let in_use_case = job.use_case.as_str().to_lowercase().contains(&needle);
        if !in_id && !in_use_case {
            return false;
        }
    }

    true
}

/// Get and display a single job
async fn get_job(client: &ClinIqClient, id: &str) -> Result<()> {
    let job_id = resolve_job_id(client, &IdOrPrefix::parse(id)).await?;

    let job = client
        .get_job(&job_id)
        .await
        .with_context(|| format!("Failed to load job {}", job_id))?;

    print_job_details(&job);

    Ok(())
}

/// Download and save the job's claim bundle
async fn download_bundle(client: &ClinIqClient, id: &str, output: Option<PathBuf>) -> Result<()> {
    let job_id = resolve_job_id(client, &IdOrPrefix::parse(id)).await?;

    let bundle = client
        .download_job_bundle(&job_id)
        .await
        .context("Download failed")?;
    let path = save_bundle(&bundle, output.as_deref()).await?;

    println!(
        "{} Saved claim bundle to {}",
        "✓".green(),
        path.display().to_string().cyan()
    );

    Ok(())
}

/// Poll a job until it finishes, printing each pipeline stage change
///
/// Shared by `job watch` and `upload --wait`.
pub(crate) async fn watch_job(
    client: &ClinIqClient,
    job_id: &str,
    options: PollOptions,
) -> Result<JobDetail> {
    println!("{}", format!("Waiting for job {}...", job_id).bold());

    let mut tracker = ProgressTracker::default();
    let result = client
        .poll_job(job_id, options, |job| {
            if let Some(line) = tracker.progress_line(job) {
                println!("{}", line);
            }
        })
        .await;

    match result {
        Ok(job) => Ok(job),
        Err(e) if e.is_timeout() => {
            println!(
                "{}",
                "⚠ Job is still running; check again later with `cliniq job get`".yellow()
            );
            Err(anyhow::Error::new(e).context(format!("Timed out waiting for job {}", job_id)))
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("Failed while polling job {}", job_id))),
    }
}

/// Remembers the last reported state so only changes get printed
#[derive(Default)]
struct ProgressTracker {
    last: Option<(JobStatus, Option<PipelineStage>)>,
}

impl ProgressTracker {
    /// Line to print for this observation, or `None` if nothing changed
    fn progress_line(&mut self, job: &JobDetail) -> Option<String> {
        let current = (job.status.clone(), job.pipeline_stage());
        if self.last.as_ref() == Some(&current) {
            return None;
        }

        let line = match current.1 {
            Some(PipelineStage::Done) => {
                format!("  {} {}", "■".green(), colorize_status(&job.status))
            }
            Some(stage) => format!(
                "  {} [{}/{}] {}",
                "▸".cyan(),
                stage.index() + 1,
                PipelineStage::ALL.len() - 1,
                stage.label()
            ),
            None => format!("  {} {}", "…".dimmed(), colorize_status(&job.status)),
        };

        self.last = Some(current);
        Some(line)
    }
}

/// Print a job summary row of the history listing
fn print_job_summary(job: &JobSummary) {
    println!("  {} Job {}", "▸".cyan(), job.id.dimmed());
    println!("    Status:     {}", colorize_status(&job.status));
    println!("    Use case:   {}", job.use_case);
    println!("    Documents:  {}", job.document_count);
    println!("    Confidence: {}", format_confidence(job.avg_confidence));
    println!(
        "    Created:    {}",
        job.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print detailed job information including its documents
pub(crate) fn print_job_details(job: &JobDetail) {
    println!("{}", "Job Details:".bold());
    println!("  ID:        {}", job.id.cyan());
    println!("  Status:    {}", colorize_status(&job.status));
    println!("  Use case:  {}", job.use_case);
    println!("  Created:   {}", job.created_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(updated) = job.updated_at {
        println!("  Updated:   {}", updated.format("%Y-%m-%d %H:%M:%S"));

        let duration = updated.signed_duration_since(job.created_at);
        if job.is_terminal() && duration.num_seconds() >= 0 {
            println!("  Duration:  {}s", duration.num_seconds());
        }
    }

    if let Some(stage) = job.pipeline_stage() {
        println!("  Stage:     {}", stage.label());
    }

    if job.documents.is_empty() {
        println!("\n{}", "No documents.".yellow());
        return;
    }

    println!("\n{}", "Documents:".bold());
    for doc in &job.documents {
        println!("  {} {}", "▸".cyan(), doc.filename);
        println!("    ID:     {}", doc.id.dimmed());
        println!("    Status: {}", doc.status);
        println!(
            "    Type:   {} ({})",
            doc.doc_type_label(),
            format_confidence(doc.doc_type_confidence)
        );
    }
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> colored::ColoredString {
    let status_str = status.as_str();
    match status {
        JobStatus::Queued => status_str.yellow(),
        JobStatus::Processing => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
        JobStatus::Other(_) => status_str.dimmed(),
    }
}
