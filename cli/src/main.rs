//! Facility inspection service CLI
//!
//! ```sh
//! # Run the server with the default config (~/.config/facility-inspection/config.toml)
//! inspection-service serve
//!
//! # Validate config without starting
//! inspection-service serve --check
//!
//! # Seed an account
//! inspection-service create-user --username admin --password admin
//!
//! # Load legacy worksheet exports
//! inspection-service import --inspections inspections.json --users users.json
//!
//! # Write DATABASE_URL and a fresh SECRET_KEY into .env
//! inspection-service setup-env --database-url postgres://localhost/facilitychecklist --generate-key
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use facility_inspection::application::{
    read_rows, AuthService, ImportReport, LegacyImporter, SeedOutcome,
};
use facility_inspection::config::{config_path_from_env, write_env_file, AppConfig};
use facility_inspection::domain::RepositoryProvider;
use facility_inspection::infrastructure::crypto::{generate_secret_key, JwtConfig};
use facility_inspection::server::{init_tracing, ServerHandle, ServerOptions};
use facility_inspection::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

#[derive(Parser, Debug)]
#[command(
    name = "inspection-service",
    version,
    about = "Facility inspection records: REST API, dashboard and setup tooling",
    long_about = "Facility inspection service.\n\n\
                  Default config: ~/.config/facility-inspection/config.toml \
                  (override with --config or INSPECTION_CONFIG). \
                  A .env file in the working directory is loaded first."
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, env = "INSPECTION_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve {
        /// Override the listen port.
        #[arg(long)]
        port: Option<u16>,

        /// Validate the configuration and exit without starting the server.
        #[arg(long)]
        check: bool,

        /// Skip database migrations on startup.
        #[arg(long)]
        no_migrate: bool,

        /// Skip creating the default admin user.
        #[arg(long)]
        no_admin: bool,
    },

    /// Create a user account; does nothing if the username exists.
    CreateUser {
        #[arg(long, default_value = "admin")]
        username: String,
        #[arg(long, default_value = "admin")]
        password: String,
    },

    /// Import legacy worksheet exports (JSON arrays of row objects).
    Import {
        /// Inspections worksheet export.
        #[arg(long)]
        inspections: PathBuf,

        /// Users worksheet export.
        #[arg(long)]
        users: Option<PathBuf>,
    },

    /// Write DATABASE_URL and SECRET_KEY into an env file.
    SetupEnv {
        #[arg(long)]
        database_url: Option<String>,

        /// Generate a new random SECRET_KEY.
        #[arg(long)]
        generate_key: bool,

        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // setup-env must work before any config or database exists
    if let Command::SetupEnv {
        database_url,
        generate_key,
        env_file,
    } = &cli.command
    {
        return setup_env(database_url.as_deref(), *generate_key, env_file);
    }

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(config_path_from_env);
    let mut config = AppConfig::load(&config_path)
        .map_err(|e| format!("configuration error: {}", e))?;
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    match cli.command {
        Command::Serve {
            port,
            check,
            no_migrate,
            no_admin,
        } => {
            if let Some(port) = port {
                info!("CLI override: port = {}", port);
                config.server.port = port;
            }
            if check {
                print_config(&config_path, &config);
                return Ok(());
            }
            serve(config, !no_migrate, !no_admin).await
        }
        Command::CreateUser { username, password } => {
            create_user(&config, &username, &password).await
        }
        Command::Import { inspections, users } => {
            import(&config, &inspections, users.as_deref()).await
        }
        Command::SetupEnv { .. } => Ok(()),
    }
}

fn print_config(path: &Path, config: &AppConfig) {
    println!("Configuration is valid");
    println!("   Config file : {}", path.display());
    println!("   Address     : {}", config.server.address());
    println!(
        "   Database    : {}",
        facility_inspection::infrastructure::database::redact_url(&config.database.url)
    );
    println!("   Log level   : {}", config.logging.level);
    println!(
        "   Secret key  : {}",
        if config.security.uses_default_secret() {
            "built-in development key"
        } else {
            "set"
        }
    );
}

async fn serve(
    config: AppConfig,
    auto_migrate: bool,
    create_default_admin: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate,
        create_default_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}

async fn connect(config: &AppConfig) -> Result<Arc<dyn RepositoryProvider>, Box<dyn std::error::Error>> {
    let db = init_database(&DatabaseConfig::from(&config.database)).await?;
    run_migrations(&db).await?;
    Ok(Arc::new(SeaOrmRepositoryProvider::new(db)))
}

async fn create_user(
    config: &AppConfig,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let repos = connect(config).await?;
    let auth = AuthService::new(repos, JwtConfig::from(&config.security));

    match auth.seed_user(username, password).await? {
        SeedOutcome::Created(user) => println!("User '{}' created (id {})", user.username, user.id),
        SeedOutcome::AlreadyExists => println!("User '{}' already exists, nothing to do", username),
    }
    Ok(())
}

async fn import(
    config: &AppConfig,
    inspections: &Path,
    users: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let repos = connect(config).await?;
    let importer = LegacyImporter::new(repos);
    let mut report = ImportReport::default();

    if let Some(path) = users {
        let rows = read_rows(path)?;
        info!(rows = rows.len(), file = %path.display(), "Importing users");
        importer.import_users(&rows, &mut report).await;
    }

    let rows = read_rows(inspections)?;
    info!(rows = rows.len(), file = %inspections.display(), "Importing inspections");
    importer.import_inspections(&rows, &mut report).await;

    println!("Import finished: {}", report);
    Ok(())
}

fn setup_env(
    database_url: Option<&str>,
    generate_key: bool,
    env_file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let secret = generate_key.then(generate_secret_key);

    let mut updates: Vec<(&str, &str)> = Vec::new();
    if let Some(url) = database_url {
        updates.push(("DATABASE_URL", url));
    }
    if let Some(ref key) = secret {
        updates.push(("SECRET_KEY", key));
    }

    if updates.is_empty() {
        println!("Nothing to write; pass --database-url and/or --generate-key");
        return Ok(());
    }

    write_env_file(env_file, &updates)?;
    for (key, _) in &updates {
        println!("Wrote {} to {}", key, env_file.display());
    }
    Ok(())
}
