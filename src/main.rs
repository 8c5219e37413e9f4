//! HavenChat CLI entry point

use std::process::ExitCode;

use clap::Parser;

use haven_chat::cli::{
    app::{load_merged_config, run_exchange, EXIT_ERROR},
    args::{Cli, Commands, ExchangeOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use haven_chat::domain::config::AppConfig;
use haven_chat::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        advisory_limit: cli.advisory_limit.clone(),
        language: cli.language.clone(),
        ..Default::default()
    };

    let config = load_merged_config(cli_config).await;

    let options = ExchangeOptions {
        message: cli.message,
        language: config.language.clone(),
        advisory_limit: config.advisory_limit_or_default(),
        skip_preview: cli.no_preview,
    };

    run_exchange(options, config).await
}
