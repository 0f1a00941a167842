//! Little Story API daemon
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults (./data, port 8000)
//! little-story
//!
//! # Start with a config file (created with defaults if missing)
//! little-story --config /etc/little-story.toml
//!
//! # Point at a different data or content directory
//! little-story --data-dir /srv/story --stories-dir /srv/content
//! ```

use clap::Parser;
use little_story::{create_router, Config, EpisodeSessionService};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "little-story")]
#[command(about = "Story, hearts and progress backend for Little Story")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding user.json, progress.json and stories/
    #[arg(long, env = "LITTLE_STORY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Story content directory (defaults to <data-dir>/stories)
    #[arg(long, env = "LITTLE_STORY_STORIES_DIR")]
    stories_dir: Option<PathBuf>,

    /// HTTP API port
    #[arg(long, env = "LITTLE_STORY_HTTP_PORT")]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("little_story=info".parse()?))
        .init();

    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) if path.exists() => Config::load(path)?,
        Some(path) => {
            let config = Config::default();
            config.save(path)?;
            info!(path = %path.display(), "Created default config");
            config
        }
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(dir) = args.stories_dir {
        config.storage.stories_dir = Some(dir);
    }
    if let Some(port) = args.http_port {
        config.server.http_port = port;
    }
    config.validate()?;

    info!(
        data_dir = %config.storage.data_dir.display(),
        stories_dir = %config.stories_dir().display(),
        max_hearts = config.hearts.max_hearts,
        regen_period_secs = config.hearts.regen_period_secs,
        "Starting little-story"
    );

    let service = Arc::new(EpisodeSessionService::new(&config));
    let scan = service.library().list_library().await?;
    info!(stories = scan.entries.len(), skipped = scan.skipped, "Library loaded");

    let app = create_router(service);

    let addr = SocketAddr::new(config.server.bind_addr, config.server.http_port);
    info!("HTTP API available at http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /api/user");
    info!("  GET  /api/library");
    info!("  GET  /api/story/{{story_id}}/manifest");
    info!("  GET  /api/story/{{story_id}}/progress");
    info!("  POST /api/story/{{story_id}}/{{episode_id}}/start");
    info!("  POST /api/story/{{story_id}}/save");
    info!("  POST /api/debug/reset_hearts");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
