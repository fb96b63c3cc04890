use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;
use xray_auth::{secret_key, OAuth1Credentials, SecretKind, SecretStore};
use xray_config::Config;
use xray_output::OutputRenderer;

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Add or update a profile and store its secrets
    Login(LoginArgs),
    /// Remove stored secrets (and optionally the profile)
    Logout(LogoutArgs),
    /// List configured profiles
    List,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Profile name to create or update.
    #[arg(long)]
    pub profile: String,
    /// Jira host name (e.g. jira.example.com).
    #[arg(long)]
    pub host: String,
    /// http or https.
    #[arg(long, default_value = "https")]
    pub protocol: String,
    #[arg(long)]
    pub port: Option<u16>,
    /// Context path of the Jira instance (e.g. jira).
    #[arg(long)]
    pub base: Option<String>,
    /// Xray REST API version.
    #[arg(long)]
    pub api_version: Option<String>,
    /// Jira username for basic auth.
    #[arg(long)]
    pub username: Option<String>,
    /// Password stored in the credentials file.
    #[arg(long, env = "XRAY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    #[arg(long, requires = "consumer_secret")]
    pub consumer_key: Option<String>,
    #[arg(long, requires = "consumer_key")]
    pub consumer_secret: Option<String>,
    #[arg(long)]
    pub access_token: Option<String>,
    #[arg(long)]
    pub access_token_secret: Option<String>,
    /// Skip TLS certificate verification.
    #[arg(long)]
    pub insecure: bool,
    /// Mark this profile as the default one.
    #[arg(long)]
    pub default: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LogoutArgs {
    /// Profile to remove secrets for.
    #[arg(long)]
    pub profile: String,
    /// Remove the profile from config entirely.
    #[arg(long)]
    pub remove_profile: bool,
}

pub fn handle(
    command: AuthCommand,
    config: &mut Config,
    config_path: Option<&Path>,
    store: &SecretStore,
    renderer: &OutputRenderer,
) -> Result<()> {
    match command {
        AuthCommand::Login(args) => login(args, config, config_path, store),
        AuthCommand::Logout(args) => logout(args, config, config_path, store),
        AuthCommand::List => list_profiles(config, store, renderer),
    }
}

fn login(
    args: LoginArgs,
    config: &mut Config,
    config_path: Option<&Path>,
    store: &SecretStore,
) -> Result<()> {
    if args.profile.trim().is_empty() {
        return Err(anyhow!("Profile name cannot be empty"));
    }

    let entry = config.profiles.entry(args.profile.clone()).or_default();
    entry.protocol = Some(args.protocol.clone());
    entry.host = Some(args.host.clone());
    entry.port = args.port;
    entry.base = args.base.clone();
    entry.api_version = args.api_version.clone();
    entry.username = args.username.clone();
    entry.password = None; // secrets live in the credentials file
    entry.strict_ssl = args.insecure.then_some(false);
    entry.oauth = args.consumer_key.clone().map(|consumer_key| OAuth1Credentials {
        consumer_key,
        consumer_secret: String::new(),
        access_token: args.access_token.clone(),
        access_token_secret: None,
    });

    if args.default || config.default_profile.is_none() {
        config.default_profile = Some(args.profile.clone());
    }

    let secrets = [
        (SecretKind::Password, args.password.as_deref()),
        (SecretKind::ConsumerSecret, args.consumer_secret.as_deref()),
        (SecretKind::AccessTokenSecret, args.access_token_secret.as_deref()),
    ];
    for (kind, secret) in secrets {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            store
                .set_secret(&secret_key(&args.profile, kind), secret)
                .context("Failed to store secret")?;
        }
    }

    config
        .save(config_path)
        .context("Unable to persist configuration file")?;

    tracing::info!(profile = %args.profile, host = %args.host, "Profile saved");
    Ok(())
}

fn logout(
    args: LogoutArgs,
    config: &mut Config,
    config_path: Option<&Path>,
    store: &SecretStore,
) -> Result<()> {
    if !config.profiles.contains_key(&args.profile) {
        return Err(anyhow!("Profile '{}' does not exist", args.profile));
    }

    for kind in SecretKind::ALL {
        store
            .delete_secret(&secret_key(&args.profile, kind))
            .context("Failed to delete secret")?;
    }

    if args.remove_profile {
        config.profiles.remove(&args.profile);
        if config.default_profile.as_deref() == Some(args.profile.as_str()) {
            config.default_profile = config.profiles.keys().min().cloned();
        }
    }

    config
        .save(config_path)
        .context("Unable to persist configuration file")?;
    tracing::info!(profile = %args.profile, "Secrets removed");
    Ok(())
}

fn list_profiles(config: &Config, store: &SecretStore, renderer: &OutputRenderer) -> Result<()> {
    let mut names: Vec<&String> = config.profiles.keys().collect();
    names.sort();

    let mut rows = Vec::with_capacity(names.len());
    for name in names {
        let profile = &config.profiles[name];
        let has_password = profile.password.is_some()
            || store
                .get_secret(&secret_key(name, SecretKind::Password))?
                .is_some();
        let auth = if profile.oauth.is_some() {
            "oauth1"
        } else if profile.username.is_some() && has_password {
            "basic"
        } else {
            "anonymous"
        };

        rows.push(json!({
            "name": name,
            "host": profile.host.as_deref().unwrap_or(""),
            "auth": auth,
            "default": config.default_profile.as_deref() == Some(name.as_str()),
        }));
    }

    if rows.is_empty() {
        tracing::info!("No profiles configured yet. Use `xray auth login` to add one.");
    }

    renderer.render(&serde_json::Value::Array(rows))
}
