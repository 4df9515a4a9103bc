//! Auth server binary - wires configuration, store, service and HTTP.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_service_lib::Authenticator;
use common::{DatabaseConfig, HttpConfig, JwtConfig};
use domain::AccountStore;
use gateway_lib::state::AppState;
use user_service_lib::infra::Database;
use user_service_lib::repository::{MemoryStore, UserStore};

#[derive(Parser)]
#[command(name = "auth-server")]
#[command(about = "Account registration and bearer-token authentication service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "HOST")]
        host: Option<String>,
        #[arg(long, env = "PORT")]
        port: Option<u16>,
        /// Keep accounts in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            in_memory,
        } => {
            let mut http = HttpConfig::from_env();
            if let Some(host) = host {
                http.host = host;
            }
            if let Some(port) = port {
                http.port = port;
            }

            let jwt = JwtConfig::from_env();
            if !jwt.is_configured() {
                return Err("JWT_SIGN_KEY must be set".into());
            }

            let store: Arc<dyn AccountStore> = if in_memory {
                info!("Using in-memory account store");
                Arc::new(MemoryStore::new())
            } else {
                let db = Database::connect(&DatabaseConfig::from_env()).await?;
                Arc::new(UserStore::new(db.get_connection()))
            };

            let auth_service = Arc::new(Authenticator::from_config(store, &jwt));
            gateway_lib::run_server(AppState::new(auth_service), &http).await?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateAction::Up => user_service_lib::MigrateAction::Up,
                MigrateAction::Down => user_service_lib::MigrateAction::Down,
                MigrateAction::Status => user_service_lib::MigrateAction::Status,
                MigrateAction::Fresh => user_service_lib::MigrateAction::Fresh,
            };

            user_service_lib::run_migrations(&DatabaseConfig::from_env(), migrate_action).await?;
        }
    }

    Ok(())
}
