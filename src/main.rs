use axum::{
    extract::Extension,
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod config;
mod controllers;
mod datetime;
mod error;
pub mod models;
mod schedule;
mod upstream;

use config::Config;
use controllers::{cinema_controller, city_controller, home_controller};
use upstream::UpstreamClient;

pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState {
        upstream: UpstreamClient::new(&config)?,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/", get(home_controller::index))
        .route("/timezones", get(home_controller::timezones))
        .route("/cinemas", get(city_controller::list_cities))
        .route("/cinemas/:cityKey", get(cinema_controller::city_schedule))
        .route(
            "/cinemas/:cityKey/:cinemaKey",
            get(cinema_controller::cinema_today),
        )
        .route(
            "/cinemas/:cityKey/:cinemaKey/all",
            get(cinema_controller::cinema_full),
        )
        .route(
            "/cinemas/:cityKey/:cinemaKey/:movieKey",
            get(cinema_controller::movie_today),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_origin(Any)
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(Extension(state));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, timezone = %config.timezone, "cinema gateway listening");
    axum::serve(listener, app).await?;

    Ok(())
}
