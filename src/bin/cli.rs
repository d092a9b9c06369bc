//! rootboard CLI
//!
//! One invocation runs one leaderboard cycle; schedule it with cron.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rootboard::{
    error::Result,
    models::Config,
    pipeline::{self, RunOptions},
    services::{DryRunPublisher, Publisher, RootMeClient, WebhookPublisher},
    storage::{CacheStore, LocalStorage},
    utils::http,
};

/// rootboard - Root-Me leaderboard for Discord
#[derive(Parser, Debug)]
#[command(
    name = "rootboard",
    version,
    about = "Posts a Root-Me leaderboard and new-solve notifications to a Discord webhook"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, compare, notify and update the leaderboard (default)
    Run {
        /// Log messages instead of posting them, and keep the cache as is
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show what the cache currently holds
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(&cli.config)?;
    config.apply_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command.unwrap_or(Command::Run { dry_run: false }) {
        Command::Run { dry_run } => {
            config.validate()?;
            log::info!("Script started!");

            let client = http::create_async_client(&config.http)?;
            let source = RootMeClient::new(client.clone(), &config.api)?;
            let storage = LocalStorage::new(&config.cache.path);

            let publisher: Box<dyn Publisher> = if dry_run {
                log::info!("Dry run: nothing will be posted or saved");
                Box::new(DryRunPublisher::new(&config.webhook))
            } else {
                Box::new(WebhookPublisher::new(client, &config.webhook)?)
            };
            let options = RunOptions { persist: !dry_run };

            pipeline::run_pipeline(&config, &storage, &source, publisher.as_ref(), options)
                .await?;

            log::info!("Script completed!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            let identities = config.identities()?;
            log::info!("✓ Config OK ({} users)", identities.len());
            for identity in &identities {
                log::info!("    {}", identity);
            }
            if config.webhook.thread().is_none() {
                log::warn!("webhook.thread_id is not set: new-solve notifications are disabled");
            }
        }

        Command::Info => {
            let storage = LocalStorage::new(&config.cache.path);
            log::info!("Cache file: {}", storage.location());

            let cache = storage.load().await?;
            if cache.is_empty() {
                log::info!("No snapshot found yet.");
            }
            for (name, profile) in cache.profiles() {
                log::info!(
                    "    {}: {} pts, {} solves",
                    name,
                    profile.score,
                    profile.solve_count()
                );
            }
            match cache.leaderboard_message_id() {
                Some(id) => log::info!("Leaderboard message: {}", id),
                None => log::info!("Leaderboard message: not posted yet"),
            }
        }
    }

    Ok(())
}
