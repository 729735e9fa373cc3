use accountdesk_config::load as load_config;
use accountdesk_database::UserRepository;
use accountdesk_gateway::{create_router, GatewayState, SessionCookies};
use accountdesk_runtime::{telemetry, BackendServices};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "accountdesk-server")]
#[command(about = "Account registration and preference service (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// List registered users
    ListUsers {
        /// Maximum number of users to print
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Delete expired login sessions
    PurgeSessions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::ListUsers { limit } => list_users(limit).await,
        Commands::PurgeSessions => purge_sessions().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting accountdesk");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(
        services.accounts.clone(),
        services.authenticator.clone(),
        SessionCookies::from_config(&config.auth),
    );
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(accountdesk_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("accountdesk shut down");
    Ok(())
}

async fn list_users(limit: u32) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let repository = UserRepository::new(services.db_pool.clone());
    let total = repository.count().await.context("failed to count users")?;
    let users = repository
        .list(limit)
        .await
        .context("failed to fetch users")?;

    println!("=== USERS ===");
    if users.is_empty() {
        println!("No users found in database");
        return Ok(());
    }

    println!("Showing {} of {} users:", users.len(), total);
    println!(
        "{:<5} {:<26} {:<20} {:<30} {:<10} {:<10} {:<25}",
        "ID", "Public ID", "Username", "Email", "Frequency", "Profile", "Created At"
    );
    println!("{}", "-".repeat(130));

    for user in users {
        println!(
            "{:<5} {:<26} {:<20} {:<30} {:<10} {:<10} {:<25}",
            user.id,
            user.public_id,
            user.username,
            user.email,
            user.preferences.notification_frequency,
            user.preferences.profile_visibility,
            user.created_at
        );
    }

    Ok(())
}

async fn purge_sessions() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let purged = services
        .authenticator
        .purge_expired()
        .await
        .context("failed to purge expired sessions")?;

    println!("Removed {purged} expired sessions");
    Ok(())
}
