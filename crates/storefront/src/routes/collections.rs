//! Collection route handlers.

use axum::{Json, extract::State};
use boutique_core::Collection;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// List navigation collections.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    Ok(Json(state.catalog().collections().await?))
}
