use crate::{
    errors::ServiceError,
    services::replenishment::{DraftView, ReplenishmentPolicy, SaveOutcome},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Policy input for generating a draft. Omitted fields fall back to the
/// configured defaults. This is the trust boundary for policy values: the
/// calculator itself accepts whatever it is handed.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateDraftRequest {
    #[validate(range(min = 1, max = 365))]
    pub coverage_days: Option<i32>,
    #[validate(range(min = 0))]
    pub safety_stock: Option<i32>,
}

/// Quantity overrides are passed through as given, matching the editor
/// contract: the form constrains them, the core does not.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub qty: i32,
}

#[derive(Debug, Deserialize)]
pub struct SelectAllRequest {
    pub included: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/drafts", post(create_draft))
        .route("/drafts/:draft_id", get(get_draft))
        .route(
            "/drafts/:draft_id/lines/:product_id/quantity",
            put(set_quantity),
        )
        .route(
            "/drafts/:draft_id/lines/:product_id/toggle",
            post(toggle_line),
        )
        .route("/drafts/:draft_id/select-all", post(select_all))
        .route("/drafts/:draft_id/save", post(save_draft))
}

/// Generates reorder suggestions from a fresh stock snapshot and opens an
/// editing session over them.
async fn create_draft(
    State(state): State<AppState>,
    Json(req): Json<GenerateDraftRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let defaults = &state.config.replenishment;
    let policy = ReplenishmentPolicy {
        coverage_days: req.coverage_days.unwrap_or(defaults.coverage_days),
        safety_stock: req.safety_stock.unwrap_or(defaults.safety_stock),
    };

    let view = state.replenishment.generate_draft(policy).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DraftView>, ServiceError> {
    Ok(Json(state.replenishment.draft(draft_id)?))
}

async fn set_quantity(
    State(state): State<AppState>,
    Path((draft_id, product_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<DraftView>, ServiceError> {
    Ok(Json(
        state.replenishment.set_quantity(draft_id, product_id, req.qty)?,
    ))
}

async fn toggle_line(
    State(state): State<AppState>,
    Path((draft_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DraftView>, ServiceError> {
    Ok(Json(state.replenishment.toggle_line(draft_id, product_id)?))
}

async fn select_all(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(req): Json<SelectAllRequest>,
) -> Result<Json<DraftView>, ServiceError> {
    Ok(Json(state.replenishment.select_all(draft_id, req.included)?))
}

/// Persists the draft's selected lines, one order per vendor group. On a
/// partial failure the response names the failed group; groups committed
/// before it remain in the store, and the draft is kept for a retry.
async fn save_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<SaveOutcome>, ServiceError> {
    Ok(Json(state.replenishment.save_draft(draft_id).await?))
}
