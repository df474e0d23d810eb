use super::types::DirectionsResponse;
use super::{build_client, endpoint, fetch_text};
use crate::sdk::config::MapConfig;
use crate::sdk::routing::error::{GeoError, OsrmErrorPayload};
use crate::sdk::routing::geocode::LatLon;
use crate::sdk::routing::route::RouteSet;
use crate::sdk::routing::service::RouteProvider;
use async_trait::async_trait;
use reqwest::Client;

/// Driving routes with alternatives from an OSRM server.
pub struct OsrmRouter {
    client: Client,
    base_url: String,
}

impl OsrmRouter {
    pub fn new(config: &MapConfig) -> Result<Self, GeoError> {
        Ok(Self {
            client: build_client(&config.user_agent, config.search_timeout)?,
            base_url: config.osrm_url.clone(),
        })
    }
}

/// OSRM takes `lon,lat` pairs joined by `;`.
pub fn coordinate_path(points: &[LatLon]) -> String {
    points
        .iter()
        .map(|(lat, lon)| format!("{},{}", lon, lat))
        .collect::<Vec<_>>()
        .join(";")
}

#[async_trait]
impl RouteProvider for OsrmRouter {
    async fn route(&self, points: &[LatLon]) -> Result<RouteSet, GeoError> {
        if points.len() < 2 {
            return Err(GeoError::InvalidInput(format!(
                "a route needs at least 2 points, got {}",
                points.len()
            )));
        }

        let url = endpoint(
            &self.base_url,
            &format!("route/v1/driving/{}", coordinate_path(points)),
        );
        log::debug!("[PROVIDER] OSRM route through {} points", points.len());

        let request = self.client.get(&url).query(&[
            ("overview", "full"),
            ("geometries", "geojson"),
            ("alternatives", "true"),
        ]);
        let (status, text) = fetch_text(request).await?;

        if !status.is_success() {
            // Try to parse the structured refusal first
            if let Ok(payload) = serde_json::from_str::<OsrmErrorPayload>(&text) {
                return Err(GeoError::Rejected {
                    code: payload.code,
                    message: payload.message,
                });
            }
            log::error!(
                "OSRM returned non-success status: {}. Unparseable Body: {}",
                status,
                text
            );
            return Err(GeoError::Status {
                status: status.as_u16(),
            });
        }

        let response: DirectionsResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to parse DirectionsResponse. URL: {}\nError: {}", url, e);
            e
        })?;
        let routes = response.into_route_set()?;
        log::debug!("[PROVIDER] OSRM returned {} alternative(s)", routes.len());
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_path_swaps_to_lon_lat() {
        assert_eq!(
            coordinate_path(&[(48.85, 2.35), (52.0, 13.0), (52.52, 13.4)]),
            "2.35,48.85;13,52;13.4,52.52"
        );
    }
}
