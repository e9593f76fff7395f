use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gitauditor::config::AppConfig;
use gitauditor::server::{create_router, shutdown_signal, AppState};
use gitauditor::webhook::events::parse_pull_request_url;
use gitauditor::workflow::run_review;

#[derive(Parser)]
#[command(name = "gitauditor", about = "Automated pull request reviewer")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Review a single pull request and print the outcome as JSON
    Review {
        /// Pull request URL, e.g. https://github.com/owner/repo/pull/1
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    let state = Arc::new(AppState::new(config.clone())?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state, &config).await,
        Command::Review { url } => review_once(state, &url).await,
    }
}

async fn serve(state: Arc<AppState>, config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting Gitauditor server"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.server.host, config.server.port
    ))
    .await?;

    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn review_once(state: Arc<AppState>, url: &str) -> anyhow::Result<()> {
    let target = parse_pull_request_url(url)?;
    tracing::info!(repo = %target.repo, pr = target.number, "Analyzing PR");

    let outcome = run_review(state, target).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
