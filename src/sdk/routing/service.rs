use super::error::GeoError;
use super::geocode::{LatLon, Place};
use super::provider::weather::{DailyForecast, Weather};
use super::route::RouteSet;
use async_trait::async_trait;

#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Resolves free text to its best match.
    async fn forward_geocode(&self, query: &str) -> Result<Place, GeoError>;

    /// Display names of up to `limit` matches, in provider order.
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<String>, GeoError>;

    /// Approximate position of this machine, from its public IP.
    async fn locate_by_network(&self) -> Result<Place, GeoError>;

    /// Resolves a coordinate to an address.
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, GeoError>;
}

#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Driving routes through `points` (at least two), best first.
    async fn route(&self, points: &[LatLon]) -> Result<RouteSet, GeoError>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, lat: f64, lon: f64) -> Result<Weather, GeoError>;

    /// Daily outlook for the coming week, first day first.
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<DailyForecast>, GeoError>;
}
