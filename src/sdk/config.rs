use anyhow::{Context, Result};
use std::{env, str::FromStr, time::Duration};

pub const DEFAULT_USER_AGENT: &str = "CheapMaps/1.0";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OSRM_URL: &str = "http://router.project-osrm.org";
pub const DEFAULT_IPAPI_URL: &str = "http://ip-api.com";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com";

/// Endpoints and timing for every provider the app talks to.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Sent as `User-Agent` on every request; Nominatim rejects anonymous clients.
    pub user_agent: String,
    pub nominatim_url: String,
    pub osrm_url: String,
    pub ipapi_url: String,
    pub weather_url: String,
    /// Suggestion and reverse lookups.
    pub lookup_timeout: Duration,
    /// Everything else.
    pub search_timeout: Duration,
    pub debounce: Duration,
    pub requests_per_minute: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            ipapi_url: DEFAULT_IPAPI_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            lookup_timeout: Duration::from_secs(3),
            search_timeout: Duration::from_secs(15),
            debounce: Duration::from_millis(500),
            requests_per_minute: 60,
        }
    }
}

impl MapConfig {
    /// Reads `CHEAPMAPS_*` variables, keeping the default for any that are unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("CHEAPMAPS_USER_AGENT") {
            config.user_agent = v;
        }
        if let Some(v) = lookup("CHEAPMAPS_NOMINATIM_URL") {
            config.nominatim_url = v;
        }
        if let Some(v) = lookup("CHEAPMAPS_OSRM_URL") {
            config.osrm_url = v;
        }
        if let Some(v) = lookup("CHEAPMAPS_IPAPI_URL") {
            config.ipapi_url = v;
        }
        if let Some(v) = lookup("CHEAPMAPS_WEATHER_URL") {
            config.weather_url = v;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "CHEAPMAPS_LOOKUP_TIMEOUT_MS")? {
            config.lookup_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "CHEAPMAPS_SEARCH_TIMEOUT_MS")? {
            config.search_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "CHEAPMAPS_DEBOUNCE_MS")? {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var::<u32>(&lookup, "CHEAPMAPS_REQUESTS_PER_MINUTE")? {
            config.requests_per_minute = n;
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{} has an invalid value: {:?}", key, raw))
        })
        .transpose()
}
