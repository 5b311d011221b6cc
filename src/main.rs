use std::path::PathBuf;
use std::process::ExitCode;

use crate::auth::credentials::{Credentials, FileCredentialManager};
use crate::config::{Config, DEFAULT_PROPAGATION_SECONDS};
use crate::core::provider::ChallengeAuthenticator;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod core;
mod error;
mod providers;

/// DNS-01 authenticator for bonk, run as a certbot manual hook
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// bonk credentials INI file
    #[arg(long, env = "DNS_BONK_CREDENTIALS", global = true)]
    credentials: Option<PathBuf>,

    /// Seconds to wait for DNS to propagate after the last challenge is set
    #[arg(
        long,
        env = "DNS_BONK_PROPAGATION_SECONDS",
        default_value_t = DEFAULT_PROPAGATION_SECONDS,
        global = true
    )]
    propagation_seconds: u64,

    /// Request timeout in seconds, unset to use the HTTP client default
    #[arg(long, env = "DNS_BONK_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DNS_BONK_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish the validation token (manual auth hook)
    Perform(Challenge),
    /// Remove the validation token (manual cleanup hook)
    Cleanup(Challenge),
    /// Describe the plugin
    Info,
}

#[derive(Args, Debug)]
struct Challenge {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN")]
    domain: String,

    /// Validation token to publish
    #[arg(long, env = "CERTBOT_VALIDATION")]
    validation: String,

    /// Record name, defaults to _acme-challenge.<domain>
    #[arg(long)]
    validation_name: Option<String>,

    /// Challenges certbot still has to run after this one
    #[arg(long, env = "CERTBOT_REMAINING_CHALLENGES")]
    remaining_challenges: Option<u32>,
}

impl Challenge {
    fn validation_name(&self) -> String {
        self.validation_name
            .clone()
            .unwrap_or_else(|| format!("_acme-challenge.{}", self.domain.trim_end_matches('.')))
    }
}

fn build(
    cli: &Cli,
) -> Result<(Config, providers::bonk::BonkAuthenticator), Box<dyn std::error::Error>> {
    let Some(path) = cli.credentials.clone() else {
        return Err(Box::new(error::Error::InvalidInput(
            "--credentials is required".to_string(),
        )));
    };
    let config = Config::new(path, cli.propagation_seconds, cli.timeout);
    let credentials = Credentials::load(&FileCredentialManager::open(&config.credentials)?)?;
    let span = info_span!("dns_bonk", endpoint = %credentials.endpoint);
    let authenticator = providers::bonk::authenticator(&credentials, &config, span)?;
    debug!(
        plugin = authenticator.name(),
        cleanup_action = ?credentials.cleanup_action,
        "Authenticator ready"
    );
    Ok((config, authenticator))
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Info => {
            println!("{}", providers::bonk::DESCRIPTION);
            println!("{}", providers::bonk::MORE_INFO);
        }
        Command::Perform(challenge) => {
            let (config, authenticator) = build(cli)?;
            let validation_name = challenge.validation_name();
            authenticator
                .perform(&challenge.domain, &validation_name, &challenge.validation)
                .await?;

            // Wait once, after the last challenge of the run
            let pending = challenge.remaining_challenges.unwrap_or(0);
            if pending == 0 && !config.propagation.is_zero() {
                info!(
                    seconds = config.propagation.as_secs(),
                    "Waiting for DNS changes to propagate"
                );
                tokio::time::sleep(config.propagation).await;
            }
        }
        Command::Cleanup(challenge) => {
            let (_, authenticator) = build(cli)?;
            let validation_name = challenge.validation_name();
            authenticator
                .cleanup(&challenge.domain, &validation_name, &challenge.validation)
                .await?;
        }
    }

    Ok(())
}

/// Report the outcome of a run. Only the error's `Display` text is written;
/// response details were already logged where the failure happened.
fn exit_code(result: Result<(), Box<dyn std::error::Error>>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Hook stdout is captured by certbot, so logs go to stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    exit_code(run(&cli).await)
}
