use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;

static DATE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/Date\((\d+)\)/").expect("valid date token regex"));

/// Extracts the epoch-millisecond value embedded in an upstream
/// `/Date(<millis>)/` token. A token without digits violates the upstream
/// contract and is reported as such, never rendered as a placeholder.
pub fn parse_date_token(token: &str) -> Result<i64, ApiError> {
    let captures = DATE_TOKEN_RE.captures(token).ok_or_else(|| {
        ApiError::UpstreamContract(format!("malformed date token: {token:?}"))
    })?;
    captures[1]
        .parse::<i64>()
        .map_err(|_| ApiError::UpstreamContract(format!("date token out of range: {token:?}")))
}

/// Raw display mode: the epoch value re-rendered as a string, no timezone
/// applied.
pub fn epoch_string(token: &str) -> Result<String, ApiError> {
    parse_date_token(token).map(|millis| millis.to_string())
}

/// Localized display mode: "hh:mm AM/PM" in the given timezone.
pub fn localized_time(token: &str, tz: Tz) -> Result<String, ApiError> {
    let millis = parse_date_token(token)?;
    let utc = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        ApiError::UpstreamContract(format!("date token out of range: {token:?}"))
    })?;
    Ok(utc.with_timezone(&tz).format("%I:%M %p").to_string())
}

/// How a showtime token is rendered for a given endpoint: full-schedule
/// responses keep the raw epoch string, today/movie views localize it.
#[derive(Debug, Clone, Copy)]
pub enum ShowtimeMode {
    Epoch,
    Localized(Tz),
}

impl ShowtimeMode {
    pub fn render(self, token: &str) -> Result<String, ApiError> {
        match self {
            ShowtimeMode::Epoch => epoch_string(token),
            ShowtimeMode::Localized(tz) => localized_time(token, tz),
        }
    }
}
