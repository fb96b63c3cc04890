mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use commands::auth::{self, AuthCommand};
use commands::issues::CreateArgs;
use commands::results::ImportCommand;
use commands::runs::TestRunCommand;
use commands::XrayContext;
use tracing_subscriber::{fmt, EnvFilter};
use xray_api::{ClientConfig, XrayClient, XrayError};
use xray_auth::{secret_key, SecretKind, SecretStore};
use xray_config::{Config, Profile};
use xray_output::{OutputFormat, OutputRenderer};

#[derive(Parser, Debug)]
#[command(name = "xray", version, about = "Xray test management CLI", long_about = None)]
struct Cli {
    /// Profile to use from config file
    #[arg(short, long)]
    profile: Option<String>,

    /// Path to config file (defaults to ~/.xray-cli/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: XrayCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum XrayCommand {
    /// Export the test runs of a test execution
    Export {
        /// Test execution key (e.g. EXEC-12)
        test_exec_key: String,
    },
    /// Import execution results
    #[command(subcommand)]
    Import(ImportCommand),
    /// Show a Jira project
    Project {
        /// Project key
        key: String,
    },
    /// Show a Jira issue
    Issue {
        /// Issue id or key
        key: String,
    },
    /// Read and update test runs
    #[command(subcommand)]
    TestRun(TestRunCommand),
    /// Create a Test, Test Plan, Test Set or Test Execution
    Create(CreateArgs),
    /// Manage profiles and stored credentials
    #[command(subcommand)]
    Auth(AuthCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if let Some(hint) = err.downcast_ref::<XrayError>().and_then(XrayError::suggestion) {
                eprintln!("Hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    let mut config = Config::load(config_path.as_ref())?;
    let renderer = OutputRenderer::new(cli.output);
    let store = SecretStore::default_location()?;

    if let XrayCommand::Auth(command) = cli.command {
        init_tracing(cli.debug)?;
        return auth::handle(command, &mut config, config_path.as_deref(), &store, &renderer);
    }

    let (name, profile) = config
        .resolve_profile(cli.profile.as_deref())
        .ok_or_else(|| anyhow!("No profile configured. Run `xray auth login` first."))?;
    init_tracing(cli.debug || profile.verbose)?;

    let client = XrayClient::new(build_client_config(name, profile, &store)?)?;
    let ctx = XrayContext {
        client,
        renderer: &renderer,
    };

    match cli.command {
        XrayCommand::Export { test_exec_key } => {
            commands::results::export(&ctx, &test_exec_key).await
        }
        XrayCommand::Import(command) => commands::results::import(&ctx, command).await,
        XrayCommand::Project { key } => commands::issues::project(&ctx, &key).await,
        XrayCommand::Issue { key } => commands::issues::issue(&ctx, &key).await,
        XrayCommand::TestRun(command) => commands::runs::execute(&ctx, command).await,
        XrayCommand::Create(args) => commands::issues::create(&ctx, args).await,
        XrayCommand::Auth(_) => unreachable!("auth commands return early"),
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,xray_cli=debug,xray_api=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

/// Turns a profile into an immutable client configuration, filling secrets
/// from the environment or the credentials store.
fn build_client_config(name: &str, profile: &Profile, store: &SecretStore) -> Result<ClientConfig> {
    let host = profile
        .host
        .clone()
        .ok_or_else(|| anyhow!("Profile '{name}' is missing a host."))?;

    let mut config = ClientConfig::new(profile.protocol(), host)
        .with_api_version(profile.api_version())
        .with_strict_ssl(profile.strict_ssl())
        .with_verbose(profile.verbose);

    if let Some(port) = profile.port {
        config = config.with_port(port);
    }
    if let Some(base) = profile.base.as_deref() {
        config = config.with_base(base);
    }
    if let Some(secs) = profile.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    if let Some(username) = profile.username.as_deref() {
        // Password lookup: profile env var → generic env var → config → credentials store
        let password = match env_secret(&format!("XRAY_PASSWORD_{}", name.to_uppercase()))
            .or_else(|| env_secret("XRAY_PASSWORD"))
            .or_else(|| profile.password.clone())
        {
            Some(password) => Some(password),
            None => stored_secret(store, name, SecretKind::Password)?,
        };
        if let Some(password) = password {
            config = config.with_basic_auth(username, password);
        }
    }

    if let Some(mut oauth) = profile.oauth.clone() {
        if oauth.consumer_secret.is_empty() {
            oauth.consumer_secret =
                stored_secret(store, name, SecretKind::ConsumerSecret)?.unwrap_or_default();
        }
        if oauth.access_token_secret.is_none() {
            oauth.access_token_secret = stored_secret(store, name, SecretKind::AccessTokenSecret)?;
        }
        config = config.with_oauth(oauth);
    }

    Ok(config)
}

fn env_secret(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn stored_secret(store: &SecretStore, profile: &str, kind: SecretKind) -> Result<Option<String>> {
    store
        .get_secret(&secret_key(profile, kind))
        .with_context(|| format!("Unable to read credentials from {}", store.path().display()))
}
