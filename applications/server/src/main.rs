/// ShipCV Server - resume builder API and maintenance CLI
use clap::{Parser, Subcommand};
use shipcv_server::{
    admin, create_router,
    config::ServerConfig,
    services::{AuthService, Cache, ObjectStorageClient},
    state::AppState,
};
use sqlx::SqlitePool;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shipcv-server")]
#[command(about = "ShipCV resume builder server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Delete every row from every table
    WipeDb {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
    /// Anonymize or delete users by email
    AnonymizeUsers {
        /// Emails of the users to process
        emails: Vec<String>,
        /// Delete the users and their data instead of anonymizing
        #[arg(long)]
        delete: bool,
    },
    /// Print projects that were scored or selected
    CheckDb,
    /// Create a new user
    AddUser {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long, env = "SHIPCV_NEW_USER_PASSWORD")]
        password: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shipcv_server=info,shipcv_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            serve().await?;
        }
        Commands::WipeDb { yes } => {
            if !yes {
                anyhow::bail!("Refusing to wipe the database without --yes");
            }
            let pool = open_database(&ServerConfig::load()?).await?;
            let summary = admin::wipe_database(&pool).await?;
            println!("Removed {} rows", summary.total());
        }
        Commands::AnonymizeUsers { emails, delete } => {
            let pool = open_database(&ServerConfig::load()?).await?;
            let report = admin::anonymize_users(&pool, &emails, delete).await?;
            println!(
                "Processed {} users, skipped {}",
                report.processed.len(),
                report.skipped.len()
            );
        }
        Commands::CheckDb => {
            let pool = open_database(&ServerConfig::load()?).await?;
            println!("{}", admin::check_db(&pool).await?);
        }
        Commands::AddUser {
            email,
            password,
            name,
        } => {
            let config = ServerConfig::load()?;
            config.validate()?;
            let pool = open_database(&config).await?;
            let auth_service =
                AuthService::new(config.auth.jwt_secret.clone(), config.auth.jwt_expiration_hours);
            let user =
                admin::add_user(&pool, &auth_service, &email, &password, name.as_deref()).await?;
            println!("Created user {} ({})", user.email, user.id);
        }
    }

    Ok(())
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<SqlitePool> {
    let pool = shipcv_storage::create_pool(&config.storage.database_url).await?;
    shipcv_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");
    Ok(pool)
}

async fn serve() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;
    config.validate()?;

    tracing::info!("Starting ShipCV Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let pool = open_database(&config).await?;

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    ));

    let cache = Cache::from_settings(&config.cache).await;
    tracing::info!("Cache backend: {}", cache.backend_name());

    let object_storage = ObjectStorageClient::from_settings(&config.object_storage).map(Arc::new);
    match &object_storage {
        Some(client) => tracing::info!("Object storage bucket: {}", client.bucket()),
        None => tracing::warn!("Object storage not configured"),
    }

    // Build application state
    let app_state = AppState::new(pool, auth_service, cache, object_storage);

    // Build router
    let app = create_router(app_state, config.server.web_dir.clone());

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
