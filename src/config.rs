use anyhow::anyhow;
use chrono_tz::Tz;

/// Runtime configuration, read once at startup.
///
/// The display timezone is parsed here and passed down explicitly wherever
/// showtimes are localized; nothing reads timezone state ambiently.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL used in every generated `href`.
    pub domain_server: String,
    /// Upstream POST endpoint returning the city/location catalog.
    pub cities_url: String,
    /// Upstream POST endpoint returning a city's cinema schedule.
    pub schedule_url: String,
    pub port: u16,
    pub timezone: Tz,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let domain_server = std::env::var("DOMAIN_SERVER")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .trim_end_matches('/')
            .to_string();
        let cities_url = std::env::var("EXTERNAL_API_CINEMAS")
            .map_err(|_| anyhow!("EXTERNAL_API_CINEMAS must be set"))?;
        let schedule_url = std::env::var("EXTERNAL_API_MOVIES")
            .map_err(|_| anyhow!("EXTERNAL_API_MOVIES must be set"))?;
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);
        let timezone = std::env::var("TIMEZONE")
            .unwrap_or_else(|_| "America/Mexico_City".into())
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid TIMEZONE: {e}"))?;

        Ok(Self {
            domain_server,
            cities_url,
            schedule_url,
            port,
            timezone,
        })
    }
}
