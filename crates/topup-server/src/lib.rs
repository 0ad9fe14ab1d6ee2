//! # Topup Server
//!
//! REST server for the Topup deposit allocator.
//!
//! ## Features
//!
//! - Stores one user's holdings and pending deposit
//! - Computes allocation plans and applies them to the stored holdings
//! - Single-user login with Argon2 password hashes and bearer sessions
//! - Configuration via TOML file
//!
//! ## Usage
//!
//! ```ignore
//! use topup_server::{Server, ServerConfig};
//!
//! let server = Server::from_config(ServerConfig::default())?;
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use topup_storage::{DataStore, JsonFileStore, UserData};

pub use auth::SessionManager;
pub use config::ServerConfig;
pub use handlers::AppState;

/// The Topup server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Create a server around existing state.
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Build the catalog, store and session manager described by `config`.
    pub fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        let catalog = config.catalog()?;
        if !catalog.targets_sum_to_hundred() {
            warn!(
                "asset targets sum to {}%, allocations are normalised",
                catalog.total_target()
            );
        }

        let store = JsonFileStore::open_with_fallback(&config.data_path, UserData::empty(&catalog))?;
        info!(
            "Using {} store at {}",
            store.backend_name(),
            store.path().display()
        );

        let sessions = SessionManager::new(config.auth.clone())?;
        if !sessions.is_enabled() {
            warn!("No [auth] section configured; the API is open");
        }

        let state = Arc::new(AppState::new(Arc::new(store), catalog, sessions));
        Ok(Self::new(config, state))
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let addr = SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        );

        info!("Starting Topup server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await
    }
}
