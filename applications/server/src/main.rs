/// Cadence Server - music streaming REST API
use cadence_core::SearchFilters;
use cadence_server::{config::ServerConfig, create_router, state::AppState};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-server")]
#[command(about = "Cadence music streaming API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path (defaults to ./config.toml when present)
        #[arg(short, long, env = "CADENCE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Build the configured provider and run one search against it
    CheckProvider {
        /// Configuration file path
        #[arg(short, long, env = "CADENCE_CONFIG")]
        config: Option<PathBuf>,

        /// Search text
        #[arg(short, long, default_value = "love")]
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_server=info,cadence_providers=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::CheckProvider { config, query } => {
            check_provider(config, &query).await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Cadence Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let app_state = AppState::from_config(&config).await?;
    tracing::info!(provider = app_state.provider.name(), "Services initialized");

    let app = create_router(app_state, config.server.cors_origin.as_deref());

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn check_provider(config_path: Option<PathBuf>, query: &str) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    let provider = cadence_providers::create_provider(&config.provider)?;

    let songs = provider.search_songs(query, &SearchFilters::limit(5)).await;

    println!("Provider: {}", provider.name());
    println!("Results for {:?}: {}", query, songs.len());
    for song in songs {
        let audio = if song.is_playable() { "audio" } else { "no audio" };
        println!("  {} - {} ({}, {})", song.id, song.title, song.artist_name, audio);
    }

    Ok(())
}
