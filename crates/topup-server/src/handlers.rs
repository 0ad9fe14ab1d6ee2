//! Request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use topup_core::{allocate_plan, AllocationPlan, AssetCatalog, AssetSpec, TopupError};
use topup_storage::{DataStore, DataUpdate, StorageError, UserData};

use crate::auth::SessionManager;

/// Application state.
pub struct AppState {
    /// Holdings store
    pub store: Arc<dyn DataStore>,
    /// Assets holdings are aligned with
    pub catalog: AssetCatalog,
    /// Login and session checks
    pub sessions: SessionManager,
}

impl AppState {
    /// Bundles the store, catalog and session manager.
    pub fn new(store: Arc<dyn DataStore>, catalog: AssetCatalog, sessions: SessionManager) -> Self {
        Self {
            store,
            catalog,
            sessions,
        }
    }
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Error response.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Errors returned by the data and allocation handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The allocator rejected its input.
    #[error(transparent)]
    Allocation(#[from] TopupError),

    /// The store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Request body is well-formed JSON but not acceptable.
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Allocation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::InvalidData(_)) => StatusCode::CONFLICT,
            ApiError::Storage(e) => {
                error!("storage failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Acknowledgement body for writes.
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    /// Always true
    pub ok: bool,
}

// =============================================================================
// DATA
// =============================================================================

/// Returns the stored holdings and deposit.
pub async fn get_data(State(state): State<Arc<AppState>>) -> Result<Json<UserData>, ApiError> {
    Ok(Json(state.store.load()?))
}

/// Merges a partial update into the stored record.
pub async fn put_data(
    State(state): State<Arc<AppState>>,
    Json(update): Json<DataUpdate>,
) -> Result<Json<OkResponse>, ApiError> {
    validate_update(&update, &state.catalog)?;
    let merged = state.store.update(update)?;
    debug!(
        "stored {} holdings, deposit {}",
        merged.holdings.len(),
        merged.deposit
    );
    Ok(Json(OkResponse { ok: true }))
}

fn validate_update(update: &DataUpdate, catalog: &AssetCatalog) -> Result<(), ApiError> {
    if let Some(holdings) = &update.holdings {
        if holdings.len() != catalog.len() {
            return Err(ApiError::BadRequest(format!(
                "expected {} holdings, got {}",
                catalog.len(),
                holdings.len()
            )));
        }
        if holdings.iter().any(|h| *h < Decimal::ZERO) {
            return Err(ApiError::BadRequest(
                "holdings must be non-negative".to_string(),
            ));
        }
    }
    if let Some(deposit) = update.deposit {
        if deposit < Decimal::ZERO {
            return Err(ApiError::BadRequest(
                "deposit must be non-negative".to_string(),
            ));
        }
    }
    Ok(())
}

// =============================================================================
// ALLOCATION
// =============================================================================

/// Returns the configured asset catalog.
pub async fn get_assets(State(state): State<Arc<AppState>>) -> Json<Vec<AssetSpec>> {
    Json(state.catalog.assets().to_vec())
}

/// Allocation request. Absent fields fall back to the stored values.
#[derive(Debug, Default, Deserialize)]
pub struct AllocateRequest {
    /// Holdings to allocate against
    #[serde(default)]
    pub holdings: Option<Vec<Decimal>>,
    /// Deposit to allocate
    #[serde(default)]
    pub deposit: Option<Decimal>,
}

/// Computes an allocation plan without changing stored data.
pub async fn allocate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AllocateRequest>,
) -> Result<Json<AllocationPlan>, ApiError> {
    let stored = if request.holdings.is_some() && request.deposit.is_some() {
        None
    } else {
        let data = state.store.load()?;
        data.check_catalog(&state.catalog)?;
        Some(data)
    };

    let holdings = request
        .holdings
        .or_else(|| stored.as_ref().map(|d| d.holdings.clone()))
        .unwrap_or_default();
    let deposit = request
        .deposit
        .or_else(|| stored.as_ref().map(|d| d.deposit))
        .unwrap_or_default();

    let plan = allocate_plan(&holdings, deposit, state.catalog.assets())?;
    debug!("allocated {} across {} assets", deposit, plan.results().len());
    Ok(Json(plan))
}

/// Result of applying a plan to the stored holdings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyResponse {
    /// Record before the buys; PUT it back to undo
    pub previous: UserData,
    /// Record after the buys
    pub current: UserData,
    /// The plan that was applied
    pub plan: AllocationPlan,
}

/// Allocates `previous.deposit` and builds the record with the buys applied.
fn plan_apply(previous: &UserData, catalog: &AssetCatalog) -> Result<ApplyResponse, ApiError> {
    previous.check_catalog(catalog)?;
    let plan = allocate_plan(&previous.holdings, previous.deposit, catalog.assets())?;
    let current = UserData::new(plan.apply_to(&previous.holdings)?, Decimal::ZERO);
    Ok(ApplyResponse {
        previous: previous.clone(),
        current,
        plan,
    })
}

/// Allocates the stored deposit and records the buys as executed.
///
/// The read, allocation and write happen inside one store transaction, so a
/// concurrent PUT or apply cannot slip in between.
pub async fn apply(State(state): State<Arc<AppState>>) -> Result<Json<ApplyResponse>, ApiError> {
    let mut applied = None;
    state.store.modify(&mut |previous| {
        let outcome = plan_apply(previous, &state.catalog);
        let next = outcome.as_ref().ok().map(|response| response.current.clone());
        applied = Some(outcome);
        next
    })?;
    let response = applied.ok_or_else(|| {
        ApiError::Storage(StorageError::InvalidData(
            "store skipped the apply step".to_string(),
        ))
    })??;

    info!(
        "applied deposit {} ({} units bought)",
        response.previous.deposit,
        response.plan.total_buy()
    );
    Ok(Json(response))
}
