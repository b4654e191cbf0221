//! Client for the two upstream POST endpoints.
//!
//! Schedule responses are classified into an explicit `Present`/`Absent`
//! variant before any merging happens; the "no VIP screens in this city"
//! case is a value, not a missing-field probe.

use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::upstream_model::RawCity;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(20);

/// Outcome of one schedule fetch. `Present` holds the whole wrapper object
/// so the standard and VIP sides can be merged wrapper-to-wrapper.
#[derive(Debug)]
pub enum ScheduleFetch {
    Present(Value),
    Absent,
}

impl ScheduleFetch {
    pub fn classify(body: Value) -> Self {
        match body.get("d") {
            Some(Value::Null) | None => ScheduleFetch::Absent,
            Some(_) => ScheduleFetch::Present(body),
        }
    }
}

#[derive(Serialize)]
struct ScheduleQuery<'a> {
    #[serde(rename = "claveCiudad")]
    city_key: &'a str,
    #[serde(rename = "esVIP")]
    is_vip: bool,
}

pub struct UpstreamClient {
    http: reqwest::Client,
    cities_url: String,
    schedule_url: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .context("failed to build upstream http client")?;
        Ok(Self {
            http,
            cities_url: config.cities_url.clone(),
            schedule_url: config.schedule_url.clone(),
        })
    }

    /// Fetches the raw city/location catalog.
    pub async fn fetch_cities(&self) -> Result<Vec<RawCity>, ApiError> {
        tracing::debug!(url = %self.cities_url, "upstream city catalog request");
        let resp = self.http.post(&self.cities_url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "city catalog returned {}",
                resp.status()
            )));
        }
        resp.json()
            .await
            .map_err(|e| ApiError::UpstreamContract(format!("city catalog decode: {e}")))
    }

    /// Fetches one schedule pass (standard or VIP) for a city.
    pub async fn fetch_schedule(
        &self,
        city_key: &str,
        is_vip: bool,
    ) -> Result<ScheduleFetch, ApiError> {
        tracing::debug!(url = %self.schedule_url, city_key, is_vip, "upstream schedule request");
        let resp = self
            .http
            .post(&self.schedule_url)
            .json(&ScheduleQuery { city_key, is_vip })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "schedule for {city_key} returned {}",
                resp.status()
            )));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| ApiError::UpstreamContract(format!("schedule decode: {e}")))?;
        Ok(ScheduleFetch::classify(body))
    }
}

/// Recursive merge of two JSON values, overlay onto base. Objects merge
/// key-by-key, arrays element-wise by position with the overlay's tail
/// appended, scalar conflicts resolve to the overlay. A `null` overlay
/// leaves the base value in place.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (Value::Array(mut base), Value::Array(overlay)) => {
            for (idx, value) in overlay.into_iter().enumerate() {
                if idx < base.len() {
                    let existing = std::mem::take(&mut base[idx]);
                    base[idx] = deep_merge(existing, value);
                } else {
                    base.push(value);
                }
            }
            Value::Array(base)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_keeps_fields_unique_to_either_side() {
        let merged = deep_merge(json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4}));
        assert_eq!(merged, json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn merge_prefers_overlay_on_scalar_conflict() {
        let merged = deep_merge(
            json!({"Name": "Cine A", "Screens": 5}),
            json!({"Name": "Cine A VIP"}),
        );
        assert_eq!(merged, json!({"Name": "Cine A VIP", "Screens": 5}));
    }

    #[test]
    fn merge_combines_arrays_by_position() {
        let merged = deep_merge(
            json!({"Cinemas": [{"Key": "X"}, {"Key": "Y"}]}),
            json!({"Cinemas": [{"Vip": true}]}),
        );
        assert_eq!(
            merged,
            json!({"Cinemas": [{"Key": "X", "Vip": true}, {"Key": "Y"}]})
        );
    }

    #[test]
    fn merge_appends_overlay_array_tail() {
        let merged = deep_merge(json!([1]), json!([2, 3]));
        assert_eq!(merged, json!([2, 3]));
        let merged = deep_merge(json!({"xs": []}), json!({"xs": [{"Key": "Z"}]}));
        assert_eq!(merged, json!({"xs": [{"Key": "Z"}]}));
    }

    #[test]
    fn merge_null_overlay_keeps_base() {
        let merged = deep_merge(json!({"a": 1}), json!({"a": null}));
        assert_eq!(merged, json!({"a": 1}));
    }

    #[test]
    fn classify_tags_missing_payload_as_absent() {
        assert!(matches!(
            ScheduleFetch::classify(json!({})),
            ScheduleFetch::Absent
        ));
        assert!(matches!(
            ScheduleFetch::classify(json!({"d": null})),
            ScheduleFetch::Absent
        ));
        assert!(matches!(
            ScheduleFetch::classify(json!({"d": {"Cinemas": []}})),
            ScheduleFetch::Present(_)
        ));
    }
}
