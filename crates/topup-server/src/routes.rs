//! Route definitions.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::auth::{self, require_session};
use crate::handlers::{self, AppState};

/// Create the API router.
///
/// `/health` and `/api/login` are public; everything else under `/api`
/// requires the active session token when authentication is configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/api/data", get(handlers::get_data).put(handlers::put_data))
        .route("/api/assets", get(handlers::get_assets))
        .route("/api/allocate", post(handlers::allocate))
        .route("/api/apply", post(handlers::apply))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}
