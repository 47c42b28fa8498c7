//! Fetch command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the fetch command.
pub async fn run_fetch(days: u32, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings).await?;

    let spinner = Output::spinner(&format!("Fetching {} days of daily threads...", days));

    match orchestrator.fetch(days).await {
        Ok(count) => {
            spinner.finish_and_clear();
            Output::success(&format!("Indexed {} comments from {} days of threads", count, days));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Fetch failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
