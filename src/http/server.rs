//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, rate limit, limits, headers)
//! - Bind server to listener
//! - Shut down gracefully and release the store pool

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{AssetConfig, ServerConfig};
use crate::http::request::with_request_tracing;
use crate::http::{assets, handlers};
use crate::observability::metrics;
use crate::profile::ProfileStore;
use crate::security::{rate_limit_middleware, with_limits, with_security_headers, RateLimiterState};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: ProfileStore,
    pub assets: Arc<AssetConfig>,
}

/// HTTP server for the profile site.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    store: ProfileStore,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and store.
    pub fn new(config: ServerConfig, store: ProfileStore) -> Self {
        let state = AppState {
            store: store.clone(),
            assets: Arc::new(config.assets.clone()),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            store,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers added later wrap earlier ones, so the request ID is assigned
    /// first and the security headers cover rate-limit rejections too.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let routes = Router::new()
            .route("/", get(assets::index))
            .route("/profile-picture", get(assets::profile_picture))
            .route("/update-profile", post(handlers::update_profile))
            .route("/get-profile", get(handlers::get_profile))
            .fallback(handlers::not_found)
            .with_state(state);

        let mut router = with_limits(routes, &config.security, &config.timeouts)
            .layer(middleware::from_fn(metrics::track_requests));

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        if config.security.enable_headers {
            router = with_security_headers(router);
        }

        with_request_tracing(router)
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit = self.config.rate_limit.enabled,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        drop(self.store);
        tracing::info!("HTTP server stopped, profile store released");
        Ok(())
    }

    /// A clone of the fully layered router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
