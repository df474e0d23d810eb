use super::types::{IpLocation, ReverseHit, SearchHit};
use super::{build_client, endpoint, fetch_json};
use crate::sdk::config::MapConfig;
use crate::sdk::routing::error::GeoError;
use crate::sdk::routing::geocode::Place;
use crate::sdk::routing::service::GeocodeProvider;
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Forward, suggestion and reverse lookups against Nominatim, plus IP
/// location through ip-api. One attempt per call, no retries.
pub struct NominatimGeocoder {
    client: Client,
    nominatim_url: String,
    ipapi_url: String,
    lookup_timeout: Duration,
    limiter: Limiter,
}

impl NominatimGeocoder {
    pub fn new(config: &MapConfig, limiter: Limiter) -> Result<Self, GeoError> {
        Ok(Self {
            client: build_client(&config.user_agent, config.search_timeout)?,
            nominatim_url: config.nominatim_url.clone(),
            ipapi_url: config.ipapi_url.clone(),
            lookup_timeout: config.lookup_timeout,
            limiter,
        })
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        timeout: Option<Duration>,
    ) -> Result<Vec<SearchHit>, GeoError> {
        self.limiter.until_ready().await;
        let url = endpoint(&self.nominatim_url, "search");
        log::debug!("[PROVIDER] Nominatim search for \"{}\" (limit {})", query, limit);

        let limit = limit.to_string();
        let mut request = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())]);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        fetch_json(request, "Nominatim search").await
    }
}

#[async_trait]
impl GeocodeProvider for NominatimGeocoder {
    async fn forward_geocode(&self, query: &str) -> Result<Place, GeoError> {
        let hits = self.search(query, 1, None).await?;
        hits.into_iter()
            .next()
            .ok_or_else(|| GeoError::NotFound(query.to_string()))?
            .into_place()
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<String>, GeoError> {
        let hits = self.search(query, limit, Some(self.lookup_timeout)).await?;
        Ok(hits.into_iter().map(|hit| hit.display_name).collect())
    }

    async fn locate_by_network(&self) -> Result<Place, GeoError> {
        let url = endpoint(&self.ipapi_url, "json");
        log::debug!("[PROVIDER] IP location lookup");
        let location: IpLocation = fetch_json(self.client.get(&url), "IP location").await?;
        location.into_place()
    }

    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, GeoError> {
        self.limiter.until_ready().await;
        let url = endpoint(&self.nominatim_url, "reverse");
        log::debug!("[PROVIDER] Nominatim reverse for ({}, {})", lat, lon);

        let request = self
            .client
            .get(&url)
            .query(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            .query(&[("format", "json")])
            .timeout(self.lookup_timeout);
        let hit: ReverseHit = fetch_json(request, "Nominatim reverse").await?;
        Ok(hit.into_place(lat, lon))
    }
}
