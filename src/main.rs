//! Profile Server
//!
//! Serves a static profile page and image, and stores a single user profile
//! behind two JSON endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id / trace ─▶ security headers ─▶ rate limit
//!                                                                    │
//!                                                                    ▼
//!                                                   metrics ─▶ body limit / timeout
//!                                                                    │
//!                  ┌──────────────────────┬──────────────────────────┤
//!                  ▼                      ▼                          ▼
//!            GET / , /profile-picture   POST /update-profile    GET /get-profile
//!            (static assets)            sanitize ─▶ upsert      point lookup
//!                                              │                     │
//!                                              └──────▶ ProfileStore ◀┘
//!                                                       (r2d2 + SQLite)
//! ```

use std::path::PathBuf;

use clap::Parser;

use profile_server::config::load_config;
use profile_server::lifecycle::{bind, bootstrap, Shutdown};
use profile_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "profile-server")]
#[command(about = "Static profile page with a single-record profile store", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("profile-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        collection = %config.store.collection,
        rate_limit_window_ms = config.rate_limit.window_ms,
        rate_limit_max = config.rate_limit.max_requests,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener_config = config.listener.clone();
    let server = bootstrap(config).await?;
    let listener = bind(&listener_config).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
