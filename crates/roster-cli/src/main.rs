//! # roster
//!
//! Evaluates access list hierarchies described in a TOML fixture.
//!
//! ## Commands
//!
//! - `roster members|owners|grants|depth <list>` - Hierarchy queries
//! - `roster ancestors <list> --kind member|owner` - Transitive parents
//! - `roster is-member|is-owner <user> <list>` - Assignment checks
//! - `roster validate-member|validate-owner <parent> <list>` - Edit checks
//! - `roster config show` - Effective configuration

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use roster_core::{RelationshipKind, RosterConfig};
use tracing::debug;

mod commands;
mod session;

use commands::config::ConfigCommand;
use session::{Session, SessionOptions};

const EXIT_FAILURE: u8 = 1;
const EXIT_DENIED: u8 = 2;
const EXIT_LOCKED: u8 = 3;

/// Roster - access list hierarchy evaluation
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Fixture describing lists, members, users and locks
    #[arg(short, long, global = true, env = "ROSTER_FIXTURE", value_name = "FILE")]
    fixture: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, global = true, env = "ROSTER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Evaluate expiry as of this RFC 3339 instant instead of now
    #[arg(long, global = true, value_name = "TIME")]
    now: Option<DateTime<Utc>>,

    /// Skip the lock check on is-member / is-owner
    #[arg(long, global = true)]
    no_locks: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Flattened members of a list
    Members { list: String },

    /// Effective owners of a list
    Owners { list: String },

    /// Ancestor lists
    Ancestors {
        list: String,
        /// Relationship to follow
        #[arg(long, default_value = "member")]
        kind: RelationshipKind,
    },

    /// Grants inherited from ancestors
    Grants { list: String },

    /// Whether a user is a member of a list
    IsMember { user: String, list: String },

    /// Whether a user is an owner of a list
    IsOwner { user: String, list: String },

    /// Nesting depth above and below a list
    Depth { list: String },

    /// Check that a list may be added as a member of another
    ValidateMember { parent: String, member: String },

    /// Check that a list may be added as an owner of another
    ValidateOwner { parent: String, owner: String },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = RosterConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_logging(&config.log.level)?;
    debug!(?config, "configuration loaded");

    if let Commands::Config { command } = &cli.command {
        print!("{}", commands::config::handle_command(command, &config)?);
        return Ok(());
    }

    let fixture = cli
        .fixture
        .as_deref()
        .ok_or_else(|| anyhow!("--fixture is required for this command"))?;
    let options = SessionOptions {
        now: cli.now,
        no_locks: cli.no_locks,
    };
    let session = Session::open(fixture, &config, &options).await?;

    let output = match &cli.command {
        Commands::Members { list } => commands::query::members(&session, list).await?,
        Commands::Owners { list } => commands::query::owners(&session, list).await?,
        Commands::Ancestors { list, kind } => {
            commands::query::ancestors(&session, list, *kind).await?
        }
        Commands::Grants { list } => commands::query::grants(&session, list).await?,
        Commands::Depth { list } => commands::query::depth(&session, list).await?,
        Commands::IsMember { user, list } => commands::check::is_member(&session, user, list).await?,
        Commands::IsOwner { user, list } => commands::check::is_owner(&session, user, list).await?,
        Commands::ValidateMember { parent, member } => {
            commands::check::validate_member(&session, parent, member).await?
        }
        Commands::ValidateOwner { parent, owner } => {
            commands::check::validate_owner(&session, parent, owner).await?
        }
        Commands::Config { .. } => return Ok(()),
    };

    commands::print_json(&output)
}

/// Logs go to stderr so stdout stays pure JSON.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<roster_core::Error>() {
        Some(e) if e.is_locked() => EXIT_LOCKED,
        Some(e) if e.is_access_denied() => EXIT_DENIED,
        _ => EXIT_FAILURE,
    }
}
