//! # Mediadesk Server
//!
//! Work administration for the media server.
//!
//! ## Overview
//!
//! - **Work list**: `GET /works?search=` with `title:`, `hostId:`, `id:` and
//!   `collection:` prefixes, paginated
//! - **Bulk actions**: `POST /works` with `action=set-network` changes the
//!   allowed network of the selected works
//! - **Audit**: every applied action lands in the action log
//!
//! Runs on PostgreSQL when `DATABASE_URL` is set, otherwise on an in-memory
//! store that starts empty.

use std::{io::Read as _, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use mediadesk_config::{Config, ConfigLoad, ConfigLoader};
use mediadesk_core::{AppUnitOfWork, database::PostgresDatabase};
use mediadesk_server::{
    AppState, create_app,
    infra::{
        auth::crypto::PasswordCrypto,
        startup::{bind_listener, init_tracing},
    },
};
use tracing::{error, info, warn};
use zeroize::Zeroizing;

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "mediadesk-server")]
#[command(about = "Work administration server: work list and bulk network changes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
    /// Read a password from stdin and print its Argon2 PHC hash
    HashPassword,
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::HashPassword) => hash_password(),
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&cli.serve).await,
        None => run_server(cli.serve).await,
    }
}

fn hash_password() -> anyhow::Result<()> {
    let mut input = Zeroizing::new(String::new());
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read password from stdin")?;
    let password = input.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("refusing to hash an empty password");
    }

    let crypto = PasswordCrypto::new().context("failed to set up password hashing")?;
    let hash = crypto
        .hash_password(password)
        .context("failed to hash password")?;
    println!("{hash}");
    Ok(())
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    init_tracing();

    let loader = match &args.config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file in effect");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    info!(
        networks.allowed = ?config.networks.allowed,
        networks.default = %config.networks.default,
        ui.page_size = config.ui.page_size,
        ui.max_page_size = config.ui.max_page_size,
        auth.users = config.auth.users.len(),
        "work administration settings in effect"
    );

    Ok(config)
}

async fn connect_postgres(database_url: &str) -> anyhow::Result<PostgresDatabase> {
    if !(database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")) {
        error!("Only PostgreSQL database URLs are supported");
        anyhow::bail!("Invalid database URL: must start with postgres:// or postgresql://");
    }

    let pg = PostgresDatabase::new(database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    pg.initialize_schema()
        .await
        .context("database migration failed")?;
    info!("Successfully connected to PostgreSQL");
    Ok(pg)
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let Some(database_url) = config.database.url.as_deref() else {
        anyhow::bail!("DATABASE_URL must be set to run migrations");
    };
    connect_postgres(database_url).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = Arc::new(load_runtime_config(&args)?);

    let (unit_of_work, postgres) = match config.database.url.as_deref() {
        Some(url) => {
            let pg = Arc::new(connect_postgres(url).await?);
            (Arc::new(AppUnitOfWork::from_postgres(&pg)), Some(pg))
        }
        None => {
            warn!("No DATABASE_URL configured - works are kept in memory and lost on exit");
            (Arc::new(AppUnitOfWork::in_memory()), None)
        }
    };

    let crypto = PasswordCrypto::new().context("failed to set up password hashing")?;
    let state = AppState::new(config.clone(), unit_of_work, postgres, crypto);
    if state.users.is_empty() {
        warn!("No users configured - every admin request will be rejected");
    }
    let app = create_app(state);

    let listener = bind_listener(&config.server)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    let addr = listener
        .local_addr()
        .context("failed to read bound address")?;
    info!("Mediadesk listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
