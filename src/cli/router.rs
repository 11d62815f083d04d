//! Command routing and execution

use anyhow::Result;

use crate::cli::args::Commands;
use crate::cli::commands::{run_local, run_results, run_schedule};
use crate::config::LoadgridConfig;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Commands, config: &LoadgridConfig) -> Result<()> {
    match command {
        Commands::Schedule {
            scheduler,
            checkpoint,
        } => run_schedule(config, &scheduler, checkpoint.as_deref()).await,
        Commands::Run {
            scheduler,
            store,
            max_events,
        } => run_local(config, &scheduler, store.as_deref(), max_events).await,
        Commands::Results { store, command } => {
            run_results(config, store.as_deref(), command).await
        }
    }
}
