//! Reset command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::io::Write;

/// Run the reset command.
pub async fn run_reset(yes: bool, settings: Settings) -> Result<()> {
    if !yes {
        print!("This deletes every indexed discussion. Continue? [y/N] ");
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            Output::info("Aborted.");
            return Ok(());
        }
    }

    let orchestrator = Orchestrator::new(settings).await?;
    let removed = orchestrator.reset().await?;
    Output::success(&format!("Deleted {} documents", removed));

    Ok(())
}
