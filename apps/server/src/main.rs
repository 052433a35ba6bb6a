use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use reelhub_config::load as load_config;
use reelhub_database::{AuthSession, SessionRepository, User, UserRepository, UserRole, Video, VideoRepository};
use reelhub_gateway::{create_router, GatewayState};
use reelhub_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "reelhub-backend")]
#[command(about = "Reelhub chat backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Seed the database with demo users, videos, and sessions
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting reelhub backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(services.db_pool.clone(), config.chat.clone());
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(reelhub_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding demo data");

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    let videos = VideoRepository::new(services.db_pool.clone());
    let sessions = SessionRepository::new(services.db_pool.clone());

    let demo_users = [
        ("alice", "Alice", 26, UserRole::User),
        ("bob", "Bob", 4, UserRole::User),
        ("mod", "The Moderator", 99, UserRole::Admin),
    ];

    for (username, display_name, level, role) in demo_users {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            avatar_url: None,
            level,
            role,
            created_at: Utc::now(),
        };
        users
            .create(&user)
            .await
            .with_context(|| format!("failed to seed user {username}"))?;

        // One open-ended dev session per user, token "dev-<username>"
        sessions
            .create(&AuthSession {
                token: format!("dev-{username}"),
                user_id: user.id,
                expires_at: None,
                created_at: Utc::now(),
            })
            .await
            .with_context(|| format!("failed to seed session for {username}"))?;

        info!(username, token = %format!("dev-{username}"), "seeded user");
    }

    let demo_videos = [
        ("RLH-001 Opening Night", Some("https://cdn.example/rlh-001.jpg")),
        ("RLH-002 Encore", None),
    ];

    for (title, thumbnail) in demo_videos {
        videos
            .create(&Video {
                id: Uuid::new_v4(),
                title: title.to_string(),
                thumbnail: thumbnail.map(str::to_string),
            })
            .await
            .with_context(|| format!("failed to seed video {title}"))?;
        info!(title, "seeded video");
    }

    info!("demo data seeded");
    Ok(())
}
