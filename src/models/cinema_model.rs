use std::collections::BTreeMap;

use serde::Serialize;

use super::city_model::ResourceLink;
use super::movie_model::Movie;

/// One calendar date of a cinema's schedule, keyed in the parent mapping by
/// its normalized epoch string.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDate {
    pub date_title: String,
    pub date: String,
    pub movies: BTreeMap<String, Movie>,
}

/// A cinema with its full multi-date schedule. Cinema keys are unique only
/// within a city; lookups are always scoped by city first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cinema {
    pub key: String,
    pub name: String,
    pub schedule: BTreeMap<String, ScheduleDate>,
    pub links: Vec<ResourceLink>,
}

/// Today-view projection of a [`Cinema`]: the chronologically first date's
/// movies exposed directly, no multi-date schedule field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaToday {
    pub key: String,
    pub name: String,
    pub movies: BTreeMap<String, Movie>,
    pub links: Vec<ResourceLink>,
}
