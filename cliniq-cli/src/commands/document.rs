//! Document command handlers
//!
//! Clinical review of extracted fields, validation, FHIR export, ABDM
//! submission and the audit trail of a single document.

use anyhow::{Context, Result, anyhow, bail};
use clap::Subcommand;
use cliniq_client::ClinIqClient;
use cliniq_core::domain::audit::AuditEntry;
use cliniq_core::domain::document::ExtractedFields;
use cliniq_core::domain::validation::{ValidationReport, issue_message};
use colored::*;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

use super::save_bundle;
use crate::config::Config;

/// Document subcommands
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Show the extracted fields of a document
    Extracted {
        /// Document ID
        id: String,
    },
    /// Correct extracted fields
    Patch {
        /// Document ID
        id: String,

        /// JSON file with the fields to update
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Field updates as key=value pairs; values are parsed as JSON when possible
        #[arg(short, long, value_parser = parse_key_val)]
        set: Vec<(String, String)>,
    },
    /// Run NHCX validation on the document's FHIR bundle
    Validate {
        /// Document ID
        id: String,
    },
    /// Show the latest validation report
    Validation {
        /// Document ID
        id: String,
    },
    /// Print the document's FHIR resource
    Fhir {
        /// Document ID
        id: String,
    },
    /// Download the document's FHIR bundle
    Download {
        /// Document ID
        id: String,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Submit the document's bundle to ABDM
    Submit {
        /// Document ID
        id: String,
    },
    /// Show the change history of the document
    Audit {
        /// Document ID
        id: String,
    },
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Handle document commands
///
/// Routes document subcommands to their respective handlers.
pub async fn handle_document_command(command: DocumentCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        DocumentCommands::Extracted { id } => show_extracted(&client, &id).await,
        DocumentCommands::Patch { id, file, set } => {
            patch_extracted(&client, &id, file.as_deref(), set).await
        }
        DocumentCommands::Validate { id } => validate(&client, &id).await,
        DocumentCommands::Validation { id } => show_validation(&client, &id).await,
        DocumentCommands::Fhir { id } => show_fhir(&client, &id).await,
        DocumentCommands::Download { id, output } => download(&client, &id, output).await,
        DocumentCommands::Submit { id } => submit(&client, &id).await,
        DocumentCommands::Audit { id } => show_audit(&client, &id).await,
    }
}

/// Print the extracted fields as pretty JSON
async fn show_extracted(client: &ClinIqClient, id: &str) -> Result<()> {
    let fields = client
        .get_extracted(id)
        .await
        .with_context(|| format!("Failed to load extracted data for document {}", id))?;

    if fields.is_empty() {
        println!("{}", "No extracted data yet.".yellow());
        return Ok(());
    }

    println!("{}", format!("Extracted data for document {}:", id).bold());
    println!("{}", serde_json::to_string_pretty(&fields)?);

    Ok(())
}

/// Send field corrections from a file and/or `--set` pairs
async fn patch_extracted(
    client: &ClinIqClient,
    id: &str,
    file: Option<&Path>,
    set: Vec<(String, String)>,
) -> Result<()> {
    let mut changes = match file {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_fields(&raw).with_context(|| format!("Invalid field file {}", path.display()))?
        }
        None => ExtractedFields::new(),
    };

    for (key, value) in set {
        changes.insert(key, parse_field_value(&value));
    }

    if changes.is_empty() {
        bail!("Nothing to update: pass --file and/or --set key=value");
    }

    let updated = client
        .patch_extracted(id, &changes)
        .await
        .context("Failed to update extracted data")?;

    println!(
        "{} Updated {} field(s) on document {}",
        "✓".green(),
        changes.len(),
        id.cyan()
    );
    println!("{}", serde_json::to_string_pretty(&updated)?);

    Ok(())
}

/// Parse a JSON document that must be an object of fields
fn parse_fields(raw: &str) -> Result<ExtractedFields> {
    match serde_json::from_str::<JsonValue>(raw)? {
        JsonValue::Object(map) => Ok(map),
        _ => bail!("expected a JSON object of fields"),
    }
}

/// Interpret a `--set` value as JSON, falling back to a plain string
fn parse_field_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

/// Trigger validation and show the resulting report
async fn validate(client: &ClinIqClient, id: &str) -> Result<()> {
    let response = client
        .trigger_validation(id)
        .await
        .context("Validation failed")?;

    if !response.status.is_empty() {
        println!("Validation status: {}", response.status.cyan());
    }

    show_validation(client, id).await
}

/// Fetch and print the validation report
async fn show_validation(client: &ClinIqClient, id: &str) -> Result<()> {
    let report = client
        .get_validation_report(id)
        .await
        .with_context(|| format!("Failed to load validation report for document {}", id))?;

    print_validation_report(&report);

    Ok(())
}

fn print_validation_report(report: &ValidationReport) {
    let verdict = if report.passed() {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    };

    println!("{}", "Validation Report:".bold());
    println!("  Document:     {}", report.document_id.cyan());
    println!("  Result:       {}", verdict);
    println!("  Health score: {:.1}", report.bundle_health_score);

    print_issues("Errors", &report.errors, |m| m.red());
    print_issues("Warnings", &report.warnings, |m| m.yellow());
    print_issues("Info", &report.info, |m| m.dimmed());

    if !report.nhcx_compliance_checklist.is_empty() {
        println!("\n{}", "NHCX Compliance:".bold());
        for item in &report.nhcx_compliance_checklist {
            let passed = item.get("passed").and_then(JsonValue::as_bool);
            let mark = match passed {
                Some(true) => "✓".green(),
                Some(false) => "✗".red(),
                None => "•".dimmed(),
            };
            let label = item
                .get("item")
                .or_else(|| item.get("label"))
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| issue_message(item));
            println!("  {} {}", mark, label);
        }
    }
}

fn print_issues(title: &str, issues: &[JsonValue], paint: impl Fn(&str) -> ColoredString) {
    if issues.is_empty() {
        return;
    }

    println!("\n{}", format!("{} ({}):", title, issues.len()).bold());
    for issue in issues {
        println!("  • {}", paint(issue_message(issue).as_str()));
    }
}

/// Print the FHIR resource as pretty JSON
async fn show_fhir(client: &ClinIqClient, id: &str) -> Result<()> {
    let resource = client
        .get_document_fhir(id)
        .await
        .with_context(|| format!("Failed to load FHIR resource for document {}", id))?;

    println!("{}", serde_json::to_string_pretty(&resource)?);

    Ok(())
}

/// Download and save the FHIR bundle
async fn download(client: &ClinIqClient, id: &str, output: Option<PathBuf>) -> Result<()> {
    let bundle = client
        .download_document_bundle(id)
        .await
        .context("Download failed")?;
    let path = save_bundle(&bundle, output.as_deref()).await?;

    println!(
        "{} Saved FHIR bundle to {}",
        "✓".green(),
        path.display().to_string().cyan()
    );

    Ok(())
}

/// Submit to ABDM and print the assigned reference
async fn submit(client: &ClinIqClient, id: &str) -> Result<()> {
    let submission = client
        .submit_to_abdm(id)
        .await
        .context("ABDM submission failed")?;

    println!("{}", "✓ Submitted to ABDM".green().bold());
    println!("  Status:    {}", submission.status);
    println!("  Reference: {}", submission.abha_reference.cyan());
    println!(
        "  Time:      {}",
        submission.timestamp.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}

/// Print the audit trail in server order
async fn show_audit(client: &ClinIqClient, id: &str) -> Result<()> {
    let entries = client
        .get_audit_log(id)
        .await
        .with_context(|| format!("Failed to load audit trail for document {}", id))?;

    if entries.is_empty() {
        println!("{}", "No audit entries for this document.".yellow());
        return Ok(());
    }

    println!("{}", format!("Audit trail for document {}:", id).bold());
    println!("{}", "─".repeat(80).dimmed());
    for entry in &entries {
        print_audit_entry(entry);
    }
    println!("{}", "─".repeat(80).dimmed());

    Ok(())
}

fn print_audit_entry(entry: &AuditEntry) {
    let change = match (&entry.old_value, &entry.new_value) {
        (Some(old), Some(new)) => format!("{} → {}", old.red(), new.green()),
        (None, Some(new)) => format!("→ {}", new.green()),
        (Some(old), None) => format!("{} →", old.red()),
        (None, None) => String::new(),
    };

    let field = if entry.field_path.is_empty() {
        String::new()
    } else {
        format!(" {}", entry.field_path.cyan())
    };

    println!(
        "{} [{}] {}{} {}",
        entry
            .timestamp
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed(),
        entry.actor,
        entry.action.bold(),
        field,
        change
    );
}
