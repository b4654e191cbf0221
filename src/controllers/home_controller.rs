use axum::{extract::Extension, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::models::city_model::ResourceLink;
use crate::AppState;

#[derive(Serialize)]
pub struct Home {
    pub message: &'static str,
    pub links: Vec<ResourceLink>,
}

pub async fn index(Extension(state): Extension<Arc<AppState>>) -> Json<Home> {
    Json(Home {
        message: "cinema showtimes gateway",
        links: vec![ResourceLink::new(
            "cinemas",
            format!("{}/cinemas", state.config.domain_server),
        )],
    })
}

pub async fn timezones() -> Json<Vec<&'static str>> {
    Json(chrono_tz::TZ_VARIANTS.iter().map(|tz| tz.name()).collect())
}
