// src/main.rs

//! kwatch: Kwangwoon campus notice monitor CLI
//!
//! One invocation is one poll cycle; scheduling is left to cron or a CI
//! workflow that guarantees non-overlapping runs.

use clap::{Parser, Subcommand};

use kwatch::error::Result;
use kwatch::models::Config;
use kwatch::notify::TelegramNotifier;
use kwatch::pipeline::{report_fatal, run_all, run_board, run_briefing, run_dorm};
use kwatch::storage::FileStateStore;
use kwatch::utils::http::create_client;

#[derive(Parser, Debug)]
#[command(
    name = "kwatch",
    version,
    about = "Kwangwoon campus notice monitor and Telegram briefing bot"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    /// Override the state directory
    #[arg(long)]
    state_dir: Option<String>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monitor the campus notice board
    Board,
    /// Monitor the dormitory notices
    Dorm,
    /// Send the morning briefing (calendar + cafeteria menu)
    Briefing,
    /// Run every monitor once
    All,
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = Config::load_or_default(&cli.config);
    if let Some(dir) = cli.state_dir {
        config.paths.state_dir = dir.into();
    }
    config.validate()?;

    let client = create_client(&config.http)?;
    let store = FileStateStore::new(config.paths.state_dir.clone());
    let notifier = TelegramNotifier::from_env(client.clone());
    if !notifier.is_enabled() {
        log::warn!("Telegram credentials missing; running without delivery");
    }

    let outcome = match cli.command.unwrap_or(Command::All) {
        Command::Board => run_board(&config, &client, &store, &notifier)
            .await
            .map(|_| ()),
        Command::Dorm => run_dorm(&config, &client, &store, &notifier)
            .await
            .map(|_| ()),
        Command::Briefing => run_briefing(&config, &client, &notifier).await,
        Command::All => run_all(&config, &client, &store, &notifier).await,
        Command::Validate => {
            log::info!("Configuration OK");
            Ok(())
        }
    };

    // Last failure boundary: report once to the operator channel, then
    // exit non-zero for the scheduler.
    if let Err(error) = outcome {
        log::error!("cycle failed: {error}");
        report_fatal(&notifier, &error).await;
        return Err(error);
    }
    Ok(())
}
