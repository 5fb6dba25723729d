use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::Result;
use log::{debug, info, warn};

use ytsum::config::{Config, Settings};
use ytsum::pipeline::Pipeline;
use ytsum::server::{AppState, router};
use ytsum::summarize::Summarizer;
use ytsum::youtube::YouTubeProvider;

#[derive(Parser)]
#[command(
    name = "ytsum-server",
    about = "HTTP service for summarizing YouTube videos",
    version = env!("GIT_DESCRIBE"),
)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Directory holding index.html and other static assets
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// Don't save raw transcript JSON
    #[arg(long)]
    no_save: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    ytsum::logging::setup_stderr_logging();

    let cli = Cli::parse();

    // Config file problems are non-fatal: fall back to environment and defaults
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        Config::default()
    });
    let settings = Settings::from_env(&config)?;
    debug!("Settings: {settings:?}");

    let client = reqwest::Client::new();
    let summarizer = Summarizer::new(client.clone(), &settings);
    let mut pipeline = Pipeline::new(YouTubeProvider::new(client), summarizer);
    if !cli.no_save {
        pipeline = pipeline.with_artifacts(&settings.transcript_dir);
    }

    let state = Arc::new(AppState {
        pipeline,
        default_languages: settings.languages.clone(),
        default_translate: settings.translate.clone(),
    });
    let app = router(state, &cli.static_dir);

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    info!(
        "Listening on http://{} (backend: {}, model: {})",
        listener.local_addr()?,
        settings.backend,
        settings.model
    );

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
