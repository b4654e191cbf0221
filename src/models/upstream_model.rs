//! Raw upstream payload shapes, deserialized as-is from the third-party
//! backend. Field names follow the upstream wire contract; unknown fields
//! are ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RawCity {
    #[serde(rename = "Clave")]
    pub key: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "GeoX", default)]
    pub geo_x: Option<f64>,
    #[serde(rename = "GeoY", default)]
    pub geo_y: Option<f64>,
    #[serde(rename = "Complejos", default)]
    pub complexes: Vec<RawComplex>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawComplex {
    #[serde(rename = "Clave")]
    pub key: String,
    #[serde(rename = "Nombre")]
    pub name: String,
}

/// Wrapper object around a schedule response. The `d` payload field may be
/// missing entirely, typically on the VIP pass for cities without VIP
/// screens.
#[derive(Debug, Deserialize, Default)]
pub struct ScheduleEnvelope {
    #[serde(default)]
    pub d: Option<ScheduleDocument>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleDocument {
    #[serde(default)]
    pub cinemas: Vec<RawCinema>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RawCinema {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city_key: String,
    #[serde(default)]
    pub dates: Vec<RawDate>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RawDate {
    #[serde(default)]
    pub showtime_date: String,
    pub filter_date: String,
    #[serde(default)]
    pub movies: Vec<RawMovie>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RawMovie {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub run_time: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub trailer: Option<String>,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RawFormat {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_experience: bool,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub showtimes: Vec<RawShowtime>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RawShowtime {
    pub time_filter: String,
}
