mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use hrms_client::{ApiClient, ApiError};
use hrms_session::{FileStore, SessionStore};

use crate::commands::Commands;
use crate::config::CliConfig;

/// Exit code when the stored session is no longer usable
const EXIT_REAUTH: u8 = 2;

/// HRMS command-line client
#[derive(Parser)]
#[command(name = "hrms", version, about = "HRMS command-line client")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL override (beats file and environment)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // defaults -> YAML -> HRMS__* env -> CLI overrides
    let mut config = CliConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.base_url.as_deref());
    logging::init(cli.verbose, &config.logging);

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }
    let Some(command) = cli.command else {
        anyhow::bail!("no command given; run `hrms --help`");
    };

    let session_dir = config.session_dir()?;
    tracing::debug!(dir = %session_dir.display(), "using session directory");
    let session = SessionStore::new(FileStore::new(session_dir));
    let client = ApiClient::new(config.api_client_config()?, session)
        .context("failed to build the HTTP client")?;

    command.run(&client).await
}

fn report(err: &anyhow::Error) -> ExitCode {
    let api = err.downcast_ref::<ApiError>();
    if matches!(api, Some(ApiError::ReauthRequired)) {
        eprintln!("Session expired. Run `hrms login` to sign in again.");
        return ExitCode::from(EXIT_REAUTH);
    }

    eprintln!("error: {err:#}");
    if let Some(message) = api.and_then(ApiError::server_message) {
        eprintln!("server: {message}");
    }
    ExitCode::FAILURE
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hrms",
            "leave",
            "list",
            "--status",
            "pending",
            "-vv",
            "--base-url",
            "https://hr.example.com/api",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("https://hr.example.com/api"));
        assert!(matches!(cli.command, Some(Commands::Leave(_))));
    }

    #[test]
    fn reauth_required_exits_with_dedicated_code() {
        let err = anyhow::Error::new(ApiError::ReauthRequired).context("loading dashboard failed");
        assert_eq!(report(&err), ExitCode::from(EXIT_REAUTH));

        let other = anyhow::anyhow!("boom");
        assert_eq!(report(&other), ExitCode::FAILURE);
    }
}
