//! Ask command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, top_k: Option<usize>, mut settings: Settings) -> Result<()> {
    if let Some(k) = top_k {
        settings.retrieval.top_k = k;
    }

    let orchestrator = Orchestrator::new(settings).await?;

    let spinner = Output::spinner("Searching discussions...");

    match orchestrator.ask(question).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            println!("\n{}\n", answer);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
