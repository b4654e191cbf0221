use axum::{extract::Extension, response::Json};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::city_model::City;
use crate::schedule::shape_cities;
use crate::AppState;

/// GET /cinemas — city catalog keyed by city key, with nested locations.
pub async fn list_cities(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, City>>, ApiError> {
    let raw = state.upstream.fetch_cities().await?;
    Ok(Json(shape_cities(raw, &state.config.domain_server)))
}
