//! Sesame CLI - session provisioning for LuCI-style web logins.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SESAME_*`)
//! 3. Config file given with `--config`
//! 4. System config (`/etc/sesame/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `SESAME_ACL_DIR`: Directory of ACL documents
//! - `SESAME_UCI_DIR`: Directory of UCI configuration files
//! - `SESAME_SESSION_TIMEOUT`: Session idle timeout in seconds
//! - `SESAME_CALL_TIMEOUT_MS`: Broker call timeout in milliseconds
//! - `SESAME_UBUS_PATH`: `ubus` executable

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sesame_auth::{Authorization, Permission};
use sesame_runtime::access::find_policy;
use sesame_runtime::acl::AclLibrary;
use sesame_runtime::broker::{BrokerConnector, MemoryBroker, UbusBroker};
use sesame_runtime::config::{ConfigError, ConfigLoader, SesameConfig};
use sesame_runtime::provision::{ProvisionSettings, SessionProvisioner};
use sesame_runtime::uci::UciFileStore;
use sesame_types::ErrorCode;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Sesame - session provisioning and ACL grants
#[derive(Parser, Debug)]
#[command(name = "sesame")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file layered over the system config
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override ACL document directory (also: SESAME_ACL_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    acl_dir: Option<PathBuf>,

    /// Override UCI configuration directory (also: SESAME_UCI_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    uci_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a session for a user and apply their ACL grants
    Login {
        /// Username
        user: String,

        /// Use an in-memory broker and print the grants instead
        #[arg(long)]
        dry_run: bool,
    },

    /// List ACL groups across all documents
    Acls,

    /// Check one access decision
    Check {
        /// Username
        user: String,

        /// Permission level (read or write)
        permission: Permission,

        /// ACL group name
        group: String,
    },
}

/// CLI-based configuration resolver.
///
/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    config_file: Option<PathBuf>,
    acl_dir: Option<PathBuf>,
    uci_dir: Option<PathBuf>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        Self {
            config_file: args.config.clone(),
            acl_dir: args.acl_dir.clone(),
            uci_dir: args.uci_dir.clone(),
        }
    }

    fn resolve(&self) -> Result<SesameConfig, ConfigError> {
        let mut loader = ConfigLoader::new();
        if let Some(ref path) = self.config_file {
            loader = loader.with_config_file(path);
        }

        let mut config = loader.load()?;

        // CLI args override (highest priority)
        if let Some(ref p) = self.acl_dir {
            config.paths.acl_dir = p.clone();
        }
        if let Some(ref p) = self.uci_dir {
            config.paths.uci_dir = p.clone();
        }

        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Terminal filter: --debug > --verbose > RUST_LOG env > default "warn"
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    let config = CliConfigResolver::from_args(&args)
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error [{}]: {e}", e.code()))?;
    info!(
        acl_dir = %config.paths.acl_dir.display(),
        uci_dir = %config.paths.uci_dir.display(),
        "Configuration loaded"
    );

    match args.command {
        Command::Login { user, dry_run } => {
            if dry_run {
                dry_run_login(&config, &user)
            } else {
                let broker = UbusBroker::new(&config.broker.ubus_path)
                    .with_call_timeout(config.session.call_timeout());
                login(&config, &user, broker)
            }
        }
        Command::Acls => list_acls(&config),
        Command::Check {
            user,
            permission,
            group,
        } => Ok(check(&config, &user, permission, &group)),
    }
}

fn provisioner<C: BrokerConnector>(
    config: &SesameConfig,
    connector: C,
) -> SessionProvisioner<UciFileStore, C> {
    SessionProvisioner::new(UciFileStore::new(&config.paths.uci_dir), connector)
        .with_settings(ProvisionSettings::from(config))
}

fn login<C: BrokerConnector>(config: &SesameConfig, user: &str, connector: C) -> Result<ExitCode> {
    match provisioner(config, connector).provision(user) {
        Ok(report) => {
            println!("{}", report.sid);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn dry_run_login(config: &SesameConfig, user: &str) -> Result<ExitCode> {
    let broker = MemoryBroker::new();
    let report = match provisioner(config, broker.clone()).provision(user) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("{}", report.sid);
    for grant in broker.grants(&report.sid) {
        println!(
            "{}",
            serde_json::to_string(&grant).context("failed to serialize grant")?
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn list_acls(config: &SesameConfig) -> Result<ExitCode> {
    let library = AclLibrary::new(&config.paths.acl_dir, config.paths.acl_pattern.as_str());
    let catalog = library
        .catalog()
        .map_err(|e| anyhow::anyhow!("ACL error [{}]: {e}", e.code()))?;

    for group in catalog {
        let levels: Vec<&str> = group.permissions.iter().map(|p| p.as_str()).collect();
        println!(
            "{}\t{}\t{}",
            group.name,
            if levels.is_empty() {
                "-".to_string()
            } else {
                levels.join(",")
            },
            group.description.as_deref().unwrap_or("-")
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn check(config: &SesameConfig, user: &str, permission: Permission, group: &str) -> ExitCode {
    let store = UciFileStore::new(&config.paths.uci_dir);
    let allowed = Authorization::for_user(user, find_policy(&store, user))
        .is_some_and(|auth| auth.allows(permission, group));

    if allowed {
        println!("allowed");
        ExitCode::SUCCESS
    } else {
        println!("denied");
        ExitCode::FAILURE
    }
}
