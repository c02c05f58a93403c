//! Geovault Admin
//!
//! Operator command line: schema migrations, account deletion and token
//! inspection.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use geovault_auth_core::{SystemClock, TokenService};
use geovault_db::{
    create_pool, Dialect, Migrator, Repositories, SchemaExecutor, Target, UserRepository,
};
use geovault_types::{normalize_email, Subject, UserId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "geovault-admin")]
#[command(about = "Administrative tasks for Geovault", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect or change the schema revision
    #[command(subcommand)]
    Migrate(MigrateCommand),

    /// Manage accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Issue or inspect access tokens
    #[command(subcommand)]
    Token(TokenCommand),
}

#[derive(Subcommand)]
enum MigrateCommand {
    /// Apply revisions up to a target (default: head)
    Upgrade {
        #[arg(default_value = "head")]
        target: String,
    },
    /// Revert revisions down to a target (`base` reverts everything)
    Downgrade { target: String },
    /// Show the applied revision
    Current,
    /// List all known revisions
    History,
    /// Print the SQL of one revision without applying it
    Sql {
        revision: String,
        #[arg(long, value_enum, default_value_t = DialectArg::Postgres)]
        dialect: DialectArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Postgres,
    Sqlite,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Sqlite => Dialect::Sqlite,
        }
    }
}

#[derive(Subcommand)]
enum UserCommand {
    /// Look up an account by email
    Show { email: String },
    /// Delete an account together with its datasets, analysis runs and places
    Delete {
        id: i32,
        /// Required: deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Issue a token for a user id
    Issue {
        user_id: i32,
        /// Lifetime override in minutes
        #[arg(long)]
        ttl_minutes: Option<u64>,
    },
    /// Verify a token and print its claims
    Verify { token: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Migrate(cmd) => migrate(&config, cmd).await,
        Command::User(cmd) => user(&config, cmd).await,
        Command::Token(cmd) => token(&config, cmd),
    }
}

async fn migrate(config: &Config, cmd: MigrateCommand) -> anyhow::Result<()> {
    let migrator = Migrator::new()?;

    // these two never touch the database
    match &cmd {
        MigrateCommand::History => {
            for step in migrator.history() {
                println!(
                    "{} -> {}  {}",
                    step.down_revision.unwrap_or("<base>"),
                    step.revision,
                    step.description
                );
            }
            return Ok(());
        }
        MigrateCommand::Sql { revision, dialect } => {
            for statement in migrator.upgrade_sql(revision, (*dialect).into())? {
                println!("{statement};\n");
            }
            return Ok(());
        }
        _ => {}
    }

    let url = config.database_url()?;
    if url.starts_with("sqlite:") {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("failed to open SQLite database")?;
        run_migration(&migrator, &pool, cmd).await
    } else {
        let pool = create_pool(url)
            .await
            .context("failed to connect to database")?;
        run_migration(&migrator, &pool, cmd).await
    }
}

async fn run_migration<E: SchemaExecutor>(
    migrator: &Migrator,
    executor: &E,
    cmd: MigrateCommand,
) -> anyhow::Result<()> {
    match cmd {
        MigrateCommand::Upgrade { target } => {
            let applied = migrator.upgrade(executor, Target::parse(&target)).await?;
            if applied.is_empty() {
                println!("Nothing to upgrade");
            }
            for rev in applied {
                println!("Applied {rev}");
            }
        }
        MigrateCommand::Downgrade { target } => {
            let reverted = migrator.downgrade(executor, Target::parse(&target)).await?;
            if reverted.is_empty() {
                println!("Nothing to downgrade");
            }
            for rev in reverted {
                println!("Reverted {rev}");
            }
        }
        MigrateCommand::Current => match migrator.current(executor).await? {
            Some(rev) => println!("{rev}"),
            None => println!("<base>"),
        },
        MigrateCommand::History | MigrateCommand::Sql { .. } => {}
    }
    Ok(())
}

async fn user(config: &Config, cmd: UserCommand) -> anyhow::Result<()> {
    let pool = create_pool(config.database_url()?)
        .await
        .context("failed to connect to database")?;
    let repos = Repositories::new(pool);

    match cmd {
        UserCommand::Show { email } => {
            let user = repos
                .users
                .find_by_email(&normalize_email(&email))
                .await?
                .with_context(|| format!("no user with email {email}"))?;
            println!("{}\t{}\t{}", user.id, user.email, user.created_at.to_rfc3339());
        }
        UserCommand::Delete { id, yes } => {
            if !yes {
                anyhow::bail!("refusing to delete user {id} without --yes");
            }
            let id = UserId(id);
            if repos.users.delete(id).await? {
                tracing::info!(user_id = %id, "Deleted user and owned resources");
                println!("Deleted user {id}");
            } else {
                anyhow::bail!("no user with id {id}");
            }
        }
    }
    Ok(())
}

fn token(config: &Config, cmd: TokenCommand) -> anyhow::Result<()> {
    let tokens = TokenService::new(config.auth()?, Arc::new(SystemClock))?;

    match cmd {
        TokenCommand::Issue {
            user_id,
            ttl_minutes,
        } => {
            let subject = Subject::from(UserId(user_id));
            let issued = match ttl_minutes {
                Some(minutes) => {
                    tokens.issue_with_ttl(&subject, Duration::from_secs(minutes.saturating_mul(60)))?
                }
                None => tokens.issue(&subject)?,
            };
            println!("{}", issued.token);
            eprintln!("expires at {}", issued.expires_at.to_rfc3339());
        }
        TokenCommand::Verify { token } => {
            let claims = tokens.verify_claims(token.trim())?;
            let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| claims.exp.to_string());
            println!("sub\t{}", claims.sub);
            println!("exp\t{expires_at}");
            if let Some(iat) = claims.iat {
                println!("iat\t{iat}");
            }
        }
    }
    Ok(())
}
