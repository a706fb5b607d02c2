//! Analytics command handler

use anyhow::{Context, Result};
use colored::*;
use std::collections::BTreeMap;

use super::format_percent;
use crate::config::Config;

/// Fetch and print processing statistics
pub async fn show_analytics(config: &Config) -> Result<()> {
    let summary = config
        .client()
        .get_analytics_summary()
        .await
        .context("Failed to load analytics")?;

    println!("{}", "Processing Summary:".bold());
    println!("  Jobs:               {}", summary.total_jobs);
    println!("  Documents:          {}", summary.total_documents);
    println!(
        "  Avg confidence:     {}",
        format_percent(summary.avg_confidence)
    );
    println!(
        "  Avg processing:     {:.1}s",
        summary.avg_processing_time_seconds
    );
    println!(
        "  Validation pass:    {}",
        format_percent(summary.validation_pass_rate)
    );
    println!("  Time saved:         {:.0} min", summary.time_saved_minutes);

    print_breakdown("Documents by type", &summary.doc_type_breakdown);
    print_breakdown("Jobs by status", &summary.status_breakdown);

    Ok(())
}

fn print_breakdown(title: &str, counts: &BTreeMap<String, u64>) {
    if counts.is_empty() {
        return;
    }

    println!("\n{}", format!("{}:", title).bold());
    for (key, count) in counts {
        println!("  {:<20} {}", key.cyan(), count);
    }
}
