use clap::Parser;
use loadgrid::app::{handle_fatal_error, init_logging, AppConfig};
use loadgrid::cli::{execute_command, Cli};
use loadgrid::config::load_or_default;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e.into(), cli.verbose),
    };

    let app_config = AppConfig::new(cli.verbose)
        .with_log_level_override(config.log_level.clone());
    init_logging(&app_config);

    if let Err(e) = execute_command(cli.command, &config).await {
        handle_fatal_error(e, cli.verbose);
    }
}
