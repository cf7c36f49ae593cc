//! pagewatch CLI
//!
//! Exits 0 when a run completes (even if some targets failed) and 1 on
//! configuration or structural failures.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pagewatch::{
    error::Result,
    logging::Logger,
    models::{Config, Credentials},
    pipeline,
    services::{LogTransport, SmtpMailer, Transport},
    storage::LocalStore,
};

/// pagewatch - web page change monitor
#[derive(Parser, Debug)]
#[command(
    name = "pagewatch",
    version,
    about = "Watches web page headings and emails a report when they change"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Override the data directory holding the store files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every target once and notify on changes
    Run {
        /// Detect and record changes but only log the notification
        #[arg(long)]
        dry_run: bool,

        /// SMTP login (sender address)
        #[arg(long, env = "GMAIL_USER")]
        gmail_user: Option<String>,

        /// SMTP app password
        #[arg(long, env = "GMAIL_APP_PASSWORD", hide_env_values = true)]
        gmail_password: Option<String>,

        /// Comma-separated notification recipients
        #[arg(long, env = "EMAIL_RECIPIENTS")]
        recipients: Option<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Show stored fingerprints
    Status,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(&cli.config)?;
    if let Some(dir) = &cli.data_dir {
        config.paths.data_dir = dir.clone();
    }
    Ok(config)
}

async fn execute(cli: Cli, logger: &Logger) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Run {
            dry_run,
            gmail_user,
            gmail_password,
            recipients,
        } => {
            let (transport, recipients): (Box<dyn Transport>, Vec<String>) = if dry_run {
                logger.info("Dry run: notifications will only be logged");
                let recipients = recipients
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect();
                (Box::new(LogTransport::new(logger)), recipients)
            } else {
                let credentials =
                    Credentials::from_env_values(gmail_user, gmail_password, recipients)?;
                let mailer = SmtpMailer::new(&config.mail, &credentials)?;
                (Box::new(mailer), credentials.recipients)
            };

            pipeline::run_monitor(&config, transport, recipients, logger).await?;
        }

        Command::Validate => pipeline::run_validate(&config, logger)?,

        Command::Status => {
            let store = LocalStore::new(&config.paths, config.monitor.min_content_length, logger);
            pipeline::run_status(&config, &store, logger).await?;
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let logger = Logger::new();

    match execute(cli, &logger).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
