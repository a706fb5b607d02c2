//! ID resolver module
//!
//! Expands job ID prefixes to full IDs by scanning the job history.
//! This allows users to type short, unambiguous prefixes instead of full IDs.
//! Input that matches nothing in the history is passed through unchanged so
//! the service decides whether the job exists.

use anyhow::{Context, Result, anyhow};
use cliniq_client::ClinIqClient;
use cliniq_core::dto::job::ListJobsQuery;

use crate::types::IdOrPrefix;

/// Page size used while scanning the job history
const SCAN_PAGE_SIZE: u32 = 100;

/// Upper bound on history pages scanned for one lookup
const MAX_SCAN_PAGES: u32 = 50;

/// Resolve a job ID or prefix to the ID sent to the service
///
/// A complete UUID is returned as typed. Otherwise the job history is
/// scanned: an exact ID match wins, then a unique prefix match. When
/// nothing matches (or the job lies beyond the scanned pages) the input is
/// returned literally.
///
/// # Errors
/// Returns an error if:
/// - Multiple jobs match the prefix (ambiguous)
/// - Listing the job history fails
pub async fn resolve_job_id(client: &ClinIqClient, id_or_prefix: &IdOrPrefix) -> Result<String> {
    if id_or_prefix.is_full() {
        return Ok(id_or_prefix.as_str().to_string());
    }

    let input = id_or_prefix.as_str();
    let mut ids = Vec::new();

    for page in 1..=MAX_SCAN_PAGES {
        let listing = client
            .list_jobs(ListJobsQuery {
                page,
                per_page: SCAN_PAGE_SIZE,
            })
            .await
            .context("Failed to fetch jobs for ID resolution")?;

        ids.extend(listing.items.iter().map(|j| j.id.clone()));

        if ids.iter().any(|id| id.eq_ignore_ascii_case(input)) || !listing.has_next() {
            break;
        }
    }

    let resolved = pick_match(input, &ids)?.unwrap_or_else(|| input.to_string());
    tracing::debug!("Resolved job ID '{}' to '{}'", input, resolved);

    Ok(resolved)
}

/// Choose the single job ID matching `input`
///
/// Returns `Ok(None)` when no ID matches.
fn pick_match(input: &str, ids: &[String]) -> Result<Option<String>> {
    let prefix = input.to_lowercase();

    if let Some(exact) = ids.iter().find(|id| id.to_lowercase() == prefix) {
        return Ok(Some(exact.clone()));
    }

    let matches: Vec<&String> = ids
        .iter()
        .filter(|id| id.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].clone())),
        _ => {
            let ids: Vec<&str> = matches.iter().map(|id| id.as_str()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                input,
                ids.join(", ")
            ))
        }
    }
}
