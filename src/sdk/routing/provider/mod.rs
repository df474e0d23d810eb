pub mod nominatim;
pub mod osrm;
pub mod types;
pub mod weather;

pub use nominatim::NominatimGeocoder;
pub use osrm::OsrmRouter;
pub use weather::{describe_weather_code, DailyForecast, Weather, WeatherClient};

use crate::sdk::routing::error::GeoError;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, GeoError> {
    Ok(Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Sends the request and returns the status with the raw body.
pub(crate) async fn fetch_text(request: RequestBuilder) -> Result<(StatusCode, String), GeoError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    Ok((status, text))
}

/// Sends the request and decodes a 2xx JSON body into `T`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<T, GeoError> {
    let (status, text) = fetch_text(request).await?;
    if !status.is_success() {
        log::warn!("{} answered with HTTP {}", what, status);
        return Err(GeoError::Status {
            status: status.as_u16(),
        });
    }
    serde_json::from_str(&text).map_err(|e| {
        log::error!("Failed to parse {} response. Error: {}. Body: {}", what, e, text);
        GeoError::Parse(e)
    })
}

#[cfg(test)]
mod tests {
    use super::endpoint;

    #[test]
    fn endpoint_joins_with_single_slash() {
        assert_eq!(
            endpoint("https://nominatim.openstreetmap.org/", "/search"),
            "https://nominatim.openstreetmap.org/search"
        );
        assert_eq!(endpoint("http://localhost:5000", "route/v1"), "http://localhost:5000/route/v1");
    }
}
