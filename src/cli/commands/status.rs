//! Status command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the status command.
pub async fn run_status(settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings).await?;

    let status = orchestrator.status().await?;

    if status.total_documents == 0 {
        Output::info("No discussions indexed yet. Use 'threadwise fetch' to add some.");
        return Ok(());
    }

    Output::header("Corpus status");
    Output::kv("Total documents", &status.total_documents.to_string());
    if let Some(range) = status.date_range {
        Output::kv("Date range", &format!("{} days", range));
    }
    if let Some(oldest) = &status.oldest_date {
        Output::kv("Oldest thread", oldest);
    }
    if let Some(newest) = &status.newest_date {
        Output::kv("Newest thread", newest);
    }

    Ok(())
}
