//! The merge and resource-shaping pipeline.
//!
//! Raw upstream payloads come in bottom-up through the shapers (formats →
//! movies → dates → cinemas) and leave as hyperlinked resources keyed by
//! their stable upstream identifiers. Every keyed mapping has
//! overwrite-on-duplicate semantics: a later record with the same key
//! silently replaces the earlier one.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::datetime::{epoch_string, ShowtimeMode};
use crate::error::ApiError;
use crate::models::cinema_model::{Cinema, CinemaToday, ScheduleDate};
use crate::models::city_model::{City, Location, ResourceLink};
use crate::models::movie_model::{Format, Movie};
use crate::models::upstream_model::{
    RawCinema, RawCity, RawDate, RawFormat, RawMovie, ScheduleEnvelope,
};
use crate::upstream::{deep_merge, ScheduleFetch, UpstreamClient};

/// One clean format per raw record, in the same order.
pub fn shape_formats(formats: Vec<RawFormat>, mode: ShowtimeMode) -> Result<Vec<Format>, ApiError> {
    formats
        .into_iter()
        .map(|format| {
            let show_times = format
                .showtimes
                .iter()
                .map(|showtime| mode.render(&showtime.time_filter))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Format {
                name: format.name,
                is_experience: format.is_experience,
                language: format.language,
                show_times,
            })
        })
        .collect()
}

/// Movies keyed by movie key, each carrying its `movie` navigation link
/// scoped to `city/cinema/movieKey`.
pub fn shape_movies(
    movies: Vec<RawMovie>,
    base_url: &str,
    city_key: &str,
    cinema_key: &str,
    mode: ShowtimeMode,
) -> Result<BTreeMap<String, Movie>, ApiError> {
    let mut shaped = BTreeMap::new();
    for movie in movies {
        let links = vec![ResourceLink::new(
            "movie",
            format!("{base_url}/cinemas/{city_key}/{cinema_key}/{}", movie.key),
        )];
        let clean = Movie {
            formats: shape_formats(movie.formats, mode)?,
            key: movie.key,
            title: movie.title,
            original_title: movie.original_title,
            rating: movie.rating,
            run_time: movie.run_time,
            poster: movie.poster,
            trailer: movie.trailer,
            links,
        };
        shaped.insert(clean.key.clone(), clean);
    }
    Ok(shaped)
}

/// Schedule dates keyed by the normalized `FilterDate` epoch string.
pub fn shape_dates(
    dates: Vec<RawDate>,
    base_url: &str,
    city_key: &str,
    cinema_key: &str,
    mode: ShowtimeMode,
) -> Result<BTreeMap<String, ScheduleDate>, ApiError> {
    let mut schedule = BTreeMap::new();
    for date in dates {
        let normalized = epoch_string(&date.filter_date)?;
        let entry = ScheduleDate {
            date_title: date.showtime_date,
            movies: shape_movies(date.movies, base_url, city_key, cinema_key, mode)?,
            date: normalized.clone(),
        };
        schedule.insert(normalized, entry);
    }
    Ok(schedule)
}

fn shape_cinema(
    raw: RawCinema,
    base_url: &str,
    requested_city: &str,
    mode: ShowtimeMode,
) -> Result<Cinema, ApiError> {
    // Upstream records carry their own CityKey; fall back to the requested
    // city when the merged record lost it.
    let city_key = if raw.city_key.is_empty() {
        requested_city
    } else {
        raw.city_key.as_str()
    };
    let schedule = shape_dates(raw.dates, base_url, city_key, &raw.key, mode)?;
    Ok(Cinema {
        links: vec![
            ResourceLink::new("self", format!("{base_url}/cinemas/{city_key}/{}", raw.key)),
            ResourceLink::new("parent", format!("{base_url}/cinemas/{city_key}")),
        ],
        key: raw.key,
        name: raw.name,
        schedule,
    })
}

/// Unifies the standard and VIP passes into one wrapper object, VIP merged
/// onto standard. A pass with no payload contributes nothing; both passes
/// empty means the city has no schedule at all.
pub fn merge_passes(
    city_key: &str,
    standard: ScheduleFetch,
    vip: ScheduleFetch,
) -> Result<Value, ApiError> {
    match (standard, vip) {
        (ScheduleFetch::Present(standard), ScheduleFetch::Present(vip)) => {
            Ok(deep_merge(standard, vip))
        }
        (ScheduleFetch::Present(only), ScheduleFetch::Absent)
        | (ScheduleFetch::Absent, ScheduleFetch::Present(only)) => Ok(only),
        (ScheduleFetch::Absent, ScheduleFetch::Absent) => {
            Err(ApiError::NotFound(format!("city {city_key}")))
        }
    }
}

/// Shapes a merged wrapper object into the final cinema-key → Cinema
/// mapping for a city.
pub fn shape_city_schedule(
    merged: Value,
    base_url: &str,
    city_key: &str,
    mode: ShowtimeMode,
) -> Result<BTreeMap<String, Cinema>, ApiError> {
    let envelope: ScheduleEnvelope = serde_json::from_value(merged)
        .map_err(|e| ApiError::UpstreamContract(format!("schedule payload decode: {e}")))?;
    let document = envelope.d.unwrap_or_default();

    let mut cinemas = BTreeMap::new();
    for raw in document.cinemas {
        let cinema = shape_cinema(raw, base_url, city_key, mode)?;
        cinemas.insert(cinema.key.clone(), cinema);
    }
    Ok(cinemas)
}

/// The complete per-city pipeline: both upstream passes fetched
/// concurrently, joined, merged, and shaped.
pub async fn build_city_schedule(
    upstream: &UpstreamClient,
    base_url: &str,
    city_key: &str,
    mode: ShowtimeMode,
) -> Result<BTreeMap<String, Cinema>, ApiError> {
    let (standard, vip) = tokio::try_join!(
        upstream.fetch_schedule(city_key, false),
        upstream.fetch_schedule(city_key, true),
    )?;
    let merged = merge_passes(city_key, standard, vip)?;
    shape_city_schedule(merged, base_url, city_key, mode)
}

/// Cities keyed by city key, each with its shaped location list.
pub fn shape_cities(cities: Vec<RawCity>, base_url: &str) -> BTreeMap<String, City> {
    let mut shaped = BTreeMap::new();
    for city in cities {
        let locations = city
            .complexes
            .into_iter()
            .map(|complex| Location {
                links: vec![ResourceLink::new(
                    "cinemas",
                    format!("{base_url}/cinemas/{}/{}", city.key, complex.key),
                )],
                key: complex.key,
                name: complex.name,
            })
            .collect();
        let clean = City {
            links: vec![ResourceLink::new(
                "self",
                format!("{base_url}/cinemas/{}", city.key),
            )],
            key: city.key,
            name: city.name,
            geo_x: city.geo_x,
            geo_y: city.geo_y,
            locations,
        };
        shaped.insert(clean.key.clone(), clean);
    }
    shaped
}

/// Read-only today projection: the schedule entry with the smallest numeric
/// date value, its movies exposed directly. Returns `None` when the cinema
/// has no schedule dates. The canonical [`Cinema`] is left untouched.
pub fn today_view(cinema: &Cinema) -> Option<CinemaToday> {
    let (_, today) = cinema
        .schedule
        .iter()
        .min_by_key(|(date, _)| date.parse::<i64>().unwrap_or(i64::MAX))?;
    Some(CinemaToday {
        key: cinema.key.clone(),
        name: cinema.name.clone(),
        movies: today.movies.clone(),
        links: cinema.links.clone(),
    })
}

/// Narrows a today view to a single movie.
pub fn movie_view(mut today: CinemaToday, movie_key: &str) -> Option<Movie> {
    today.movies.remove(movie_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Mexico_City;
    use serde_json::json;

    const BASE: &str = "http://localhost:3001";

    fn standard_payload() -> Value {
        json!({
            "d": {
                "Cinemas": [{
                    "Key": "X",
                    "Name": "Cine A",
                    "CityKey": "C1",
                    "Dates": [{
                        "FilterDate": "/Date(1700000000000)/",
                        "ShowtimeDate": "Today",
                        "Movies": [{
                            "Key": "M1",
                            "Title": "Movie One",
                            "Formats": []
                        }]
                    }]
                }]
            }
        })
    }

    fn schedule_from(payload: Value) -> BTreeMap<String, Cinema> {
        let merged = merge_passes(
            "C1",
            ScheduleFetch::classify(payload),
            ScheduleFetch::Absent,
        )
        .unwrap();
        shape_city_schedule(merged, BASE, "C1", ShowtimeMode::Epoch).unwrap()
    }

    #[test]
    fn shapes_city_schedule_scenario() {
        let cinemas = schedule_from(standard_payload());
        let cinema = &cinemas["X"];
        assert_eq!(cinema.key, "X");
        assert_eq!(cinema.name, "Cine A");
        assert_eq!(
            cinema.links,
            vec![
                ResourceLink::new("self", format!("{BASE}/cinemas/C1/X")),
                ResourceLink::new("parent", format!("{BASE}/cinemas/C1")),
            ]
        );

        let date = &cinema.schedule["1700000000000"];
        assert_eq!(date.date_title, "Today");
        assert_eq!(date.date, "1700000000000");

        let movie = &date.movies["M1"];
        assert_eq!(movie.title, "Movie One");
        assert_eq!(movie.key, "M1");
        assert!(movie.formats.is_empty());
        assert_eq!(
            movie.links,
            vec![ResourceLink::new(
                "movie",
                format!("{BASE}/cinemas/C1/X/M1")
            )]
        );
    }

    #[test]
    fn single_side_merge_equals_that_side_reshaped() {
        let standard_only = schedule_from(standard_payload());

        let merged = merge_passes(
            "C1",
            ScheduleFetch::Absent,
            ScheduleFetch::classify(standard_payload()),
        )
        .unwrap();
        let vip_only = shape_city_schedule(merged, BASE, "C1", ShowtimeMode::Epoch).unwrap();

        assert_eq!(
            serde_json::to_value(&standard_only).unwrap(),
            serde_json::to_value(&vip_only).unwrap()
        );
    }

    #[test]
    fn both_passes_absent_is_not_found() {
        let err = merge_passes("C9", ScheduleFetch::Absent, ScheduleFetch::Absent).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn vip_fields_merge_onto_standard() {
        let vip = json!({
            "d": {
                "Cinemas": [{
                    "Key": "X",
                    "Name": "Cine A VIP",
                    "CityKey": "C1",
                    "Dates": [{
                        "FilterDate": "/Date(1700000000000)/",
                        "ShowtimeDate": "Today",
                        "Movies": [{
                            "Key": "M1",
                            "Title": "Movie One",
                            "Rating": "B",
                            "Formats": []
                        }]
                    }]
                }]
            }
        });
        let merged = merge_passes(
            "C1",
            ScheduleFetch::classify(standard_payload()),
            ScheduleFetch::classify(vip),
        )
        .unwrap();
        let cinemas = shape_city_schedule(merged, BASE, "C1", ShowtimeMode::Epoch).unwrap();

        let cinema = &cinemas["X"];
        // VIP side wins the conflicting name; fields unique to either side
        // survive untouched.
        assert_eq!(cinema.name, "Cine A VIP");
        let movie = &cinema.schedule["1700000000000"].movies["M1"];
        assert_eq!(movie.title, "Movie One");
        assert_eq!(movie.rating.as_deref(), Some("B"));
    }

    #[test]
    fn city_with_zero_cinemas_yields_empty_mapping() {
        let cinemas = schedule_from(json!({"d": {"Cinemas": []}}));
        assert!(cinemas.is_empty());
        let cinemas = schedule_from(json!({"d": {}}));
        assert!(cinemas.is_empty());
    }

    #[test]
    fn movie_shaping_is_idempotent() {
        let raw: Vec<RawMovie> = serde_json::from_value(json!([
            {"Key": "M1", "Title": "Movie One", "Formats": [
                {"Name": "ESP", "IsExperience": false, "Language": "ES",
                 "Showtimes": [{"TimeFilter": "/Date(1700000000000)/"}]}
            ]},
            {"Key": "M2", "Title": "Movie Two", "Formats": []}
        ]))
        .unwrap();

        let first =
            shape_movies(raw.clone(), BASE, "C1", "X", ShowtimeMode::Epoch).unwrap();
        let second = shape_movies(raw, BASE, "C1", "X", ShowtimeMode::Epoch).unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn duplicate_movie_keys_overwrite() {
        let raw: Vec<RawMovie> = serde_json::from_value(json!([
            {"Key": "M1", "Title": "First", "Formats": []},
            {"Key": "M1", "Title": "Second", "Formats": []}
        ]))
        .unwrap();
        let movies = shape_movies(raw, BASE, "C1", "X", ShowtimeMode::Epoch).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies["M1"].title, "Second");
    }

    #[test]
    fn formats_keep_positional_order_and_localize() {
        let raw: Vec<RawFormat> = serde_json::from_value(json!([
            {"Name": "IMAX", "IsExperience": true, "Language": "EN",
             "Showtimes": [{"TimeFilter": "/Date(1700000000000)/"}]},
            {"Name": "ESP", "IsExperience": false, "Language": "ES", "Showtimes": []}
        ]))
        .unwrap();
        let formats =
            shape_formats(raw, ShowtimeMode::Localized(Mexico_City)).unwrap();
        assert_eq!(formats.len(), 2);
        assert_eq!(formats[0].name, "IMAX");
        assert_eq!(formats[0].show_times, vec!["04:13 PM"]);
        assert_eq!(formats[1].name, "ESP");
    }

    #[test]
    fn malformed_date_token_fails_shaping() {
        let err = schedule_err(json!({
            "d": {"Cinemas": [{
                "Key": "X", "Name": "Cine A", "CityKey": "C1",
                "Dates": [{"FilterDate": "not-a-date", "ShowtimeDate": "Today", "Movies": []}]
            }]}
        }));
        assert!(matches!(err, ApiError::UpstreamContract(_)));
    }

    fn schedule_err(payload: Value) -> ApiError {
        let merged = merge_passes(
            "C1",
            ScheduleFetch::classify(payload),
            ScheduleFetch::Absent,
        )
        .unwrap();
        shape_city_schedule(merged, BASE, "C1", ShowtimeMode::Epoch).unwrap_err()
    }

    #[test]
    fn today_view_picks_chronological_minimum() {
        // A 12-digit epoch sorts after the 13-digit one lexicographically;
        // the projection must compare numerically.
        let cinemas = schedule_from(json!({
            "d": {"Cinemas": [{
                "Key": "X", "Name": "Cine A", "CityKey": "C1",
                "Dates": [
                    {"FilterDate": "/Date(1700000000000)/", "ShowtimeDate": "Later",
                     "Movies": [{"Key": "M2", "Title": "Later Movie", "Formats": []}]},
                    {"FilterDate": "/Date(999999999999)/", "ShowtimeDate": "Sooner",
                     "Movies": [{"Key": "M1", "Title": "Sooner Movie", "Formats": []}]}
                ]
            }]}
        }));
        let today = today_view(&cinemas["X"]).unwrap();
        assert!(today.movies.contains_key("M1"));
        assert!(!today.movies.contains_key("M2"));
        // Projection does not consume the canonical schedule.
        assert_eq!(cinemas["X"].schedule.len(), 2);
    }

    #[test]
    fn today_view_drops_schedule_field() {
        let cinemas = schedule_from(standard_payload());
        let today = today_view(&cinemas["X"]).unwrap();
        let serialized = serde_json::to_value(&today).unwrap();
        assert!(serialized.get("schedule").is_none());
        assert_eq!(serialized["movies"]["M1"]["title"], "Movie One");
    }

    #[test]
    fn today_view_of_empty_schedule_is_none() {
        let cinemas = schedule_from(json!({
            "d": {"Cinemas": [{"Key": "X", "Name": "Cine A", "CityKey": "C1", "Dates": []}]}
        }));
        assert!(today_view(&cinemas["X"]).is_none());
    }

    #[test]
    fn movie_view_narrows_to_one_key() {
        let cinemas = schedule_from(standard_payload());
        let today = today_view(&cinemas["X"]).unwrap();
        let movie = movie_view(today, "M1").unwrap();
        assert_eq!(movie.title, "Movie One");

        let today = today_view(&cinemas["X"]).unwrap();
        assert!(movie_view(today, "M9").is_none());
    }

    #[test]
    fn shapes_cities_with_linked_locations() {
        let raw: Vec<RawCity> = serde_json::from_value(json!([{
            "Clave": "C1",
            "Nombre": "Monterrey",
            "GeoX": 25.67,
            "GeoY": -100.31,
            "Complejos": [{"Clave": "L1", "Nombre": "Centro"}]
        }]))
        .unwrap();
        let cities = shape_cities(raw, BASE);

        let city = &cities["C1"];
        assert_eq!(city.name, "Monterrey");
        assert_eq!(city.geo_x, Some(25.67));
        assert_eq!(
            city.links,
            vec![ResourceLink::new("self", format!("{BASE}/cinemas/C1"))]
        );
        assert_eq!(city.locations.len(), 1);
        assert_eq!(
            city.locations[0].links,
            vec![ResourceLink::new(
                "cinemas",
                format!("{BASE}/cinemas/C1/L1")
            )]
        );
    }
}
