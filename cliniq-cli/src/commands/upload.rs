//! Upload command handler

use anyhow::{Context, Result};
use cliniq_client::UploadFile;
use cliniq_core::domain::job::{JobStatus, UseCase};
use colored::*;
use std::path::PathBuf;

use super::job::{print_job_details, watch_job};
use crate::config::Config;

/// Upload files, then optionally follow the job to completion
pub async fn handle_upload(
    paths: Vec<PathBuf>,
    use_case: UseCase,
    wait: bool,
    config: &Config,
) -> Result<()> {
    let client = config.client();

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = UploadFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        files.push(file);
    }

    let total_bytes: usize = files.iter().map(|f| f.bytes.len()).sum();
    tracing::debug!(
        "Uploading {} file(s), {} bytes, use case {}",
        files.len(),
        total_bytes,
        use_case
    );

    let upload = client
        .upload_documents(&use_case, files)
        .await
        .context("Upload failed")?;

    println!("{}", "✓ Upload accepted".green().bold());
    println!("  Job ID:    {}", upload.job_id.cyan());
    println!("  Documents: {}", upload.document_count);
    println!("  Status:    {}", upload.status);

    if !wait {
        println!();
        println!(
            "{}",
            format!("Follow progress with: cliniq job watch {}", upload.job_id).dimmed()
        );
        return Ok(());
    }

    println!();
    let job = watch_job(&client, &upload.job_id, config.poll_options()).await?;
    println!();
    print_job_details(&job);

    if job.status == JobStatus::Failed {
        anyhow::bail!("Job {} failed", job.id);
    }

    Ok(())
}
