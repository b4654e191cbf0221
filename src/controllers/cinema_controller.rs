use axum::{
    extract::{Extension, Path},
    response::Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::datetime::ShowtimeMode;
use crate::error::ApiError;
use crate::models::cinema_model::{Cinema, CinemaToday};
use crate::models::movie_model::Movie;
use crate::schedule::{build_city_schedule, movie_view, today_view};
use crate::AppState;

/// GET /cinemas/:cityKey — every cinema in the city with its full schedule,
/// showtimes as raw epoch strings.
pub async fn city_schedule(
    Path(city_key): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Cinema>>, ApiError> {
    let cinemas = build_city_schedule(
        &state.upstream,
        &state.config.domain_server,
        &city_key,
        ShowtimeMode::Epoch,
    )
    .await?;
    Ok(Json(cinemas))
}

/// GET /cinemas/:cityKey/:cinemaKey/all — one cinema, full schedule.
pub async fn cinema_full(
    Path((city_key, cinema_key)): Path<(String, String)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Cinema>, ApiError> {
    let mut cinemas = build_city_schedule(
        &state.upstream,
        &state.config.domain_server,
        &city_key,
        ShowtimeMode::Epoch,
    )
    .await?;
    cinemas
        .remove(&cinema_key)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("cinema {cinema_key} in city {city_key}")))
}

/// GET /cinemas/:cityKey/:cinemaKey — today view, localized showtimes.
pub async fn cinema_today(
    Path((city_key, cinema_key)): Path<(String, String)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<CinemaToday>, ApiError> {
    let cinema = lookup_cinema(&state, &city_key, &cinema_key).await?;
    today_view(&cinema)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("schedule for cinema {cinema_key}")))
}

/// GET /cinemas/:cityKey/:cinemaKey/:movieKey — one movie from today's
/// schedule.
pub async fn movie_today(
    Path((city_key, cinema_key, movie_key)): Path<(String, String, String)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Movie>, ApiError> {
    let cinema = lookup_cinema(&state, &city_key, &cinema_key).await?;
    let today = today_view(&cinema)
        .ok_or_else(|| ApiError::NotFound(format!("schedule for cinema {cinema_key}")))?;
    movie_view(today, &movie_key)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("movie {movie_key} at cinema {cinema_key}")))
}

async fn lookup_cinema(
    state: &AppState,
    city_key: &str,
    cinema_key: &str,
) -> Result<Cinema, ApiError> {
    let mut cinemas = build_city_schedule(
        &state.upstream,
        &state.config.domain_server,
        city_key,
        ShowtimeMode::Localized(state.config.timezone),
    )
    .await?;
    cinemas
        .remove(cinema_key)
        .ok_or_else(|| ApiError::NotFound(format!("cinema {cinema_key} in city {city_key}")))
}
