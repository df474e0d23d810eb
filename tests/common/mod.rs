//! In-memory providers shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use cheapmaps::sdk::routing::LatLon;
use cheapmaps::{
    DailyForecast, GeoError, GeocodeProvider, Place, RouteAlternative, RouteProvider, RouteSet,
    Weather, WeatherProvider,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Geocoder backed by a fixed table. Unknown names are `NotFound`.
#[derive(Default)]
pub struct FakeGeocoder {
    places: HashMap<String, Place>,
    here: Option<Place>,
    pub forward_calls: Mutex<Vec<String>>,
    pub suggest_calls: Mutex<Vec<String>>,
    pub locate_calls: Mutex<usize>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, lat: f64, lon: f64) -> Self {
        self.places
            .insert(name.to_string(), Place::new(lat, lon, format!("{}, Europe", name)));
        self
    }

    pub fn located_at(mut self, lat: f64, lon: f64) -> Self {
        self.here = Some(Place::new(lat, lon, "Berlin, Germany"));
        self
    }

    pub fn forward_calls(&self) -> Vec<String> {
        self.forward_calls.lock().unwrap().clone()
    }

    pub fn suggest_calls(&self) -> Vec<String> {
        self.suggest_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodeProvider for FakeGeocoder {
    async fn forward_geocode(&self, query: &str) -> Result<Place, GeoError> {
        self.forward_calls.lock().unwrap().push(query.to_string());
        self.places
            .get(query)
            .cloned()
            .ok_or_else(|| GeoError::NotFound(query.to_string()))
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<String>, GeoError> {
        self.suggest_calls.lock().unwrap().push(query.to_string());
        Ok((1..=limit).map(|i| format!("{} #{}", query, i)).collect())
    }

    async fn locate_by_network(&self) -> Result<Place, GeoError> {
        *self.locate_calls.lock().unwrap() += 1;
        self.here
            .clone()
            .ok_or_else(|| GeoError::NotFound("current location".to_string()))
    }

    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, GeoError> {
        Ok(Place::new(lat, lon, "Unter den Linden 1, Berlin"))
    }
}

/// Router that answers with `alternatives` made-up routes, or refuses.
pub struct FakeRouter {
    alternatives: usize,
    pub calls: Mutex<Vec<Vec<LatLon>>>,
}

impl FakeRouter {
    pub fn with_alternatives(alternatives: usize) -> Self {
        Self {
            alternatives,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn refusing() -> Self {
        Self::with_alternatives(0)
    }

    pub fn calls(&self) -> Vec<Vec<LatLon>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RouteProvider for FakeRouter {
    async fn route(&self, points: &[LatLon]) -> Result<RouteSet, GeoError> {
        self.calls.lock().unwrap().push(points.to_vec());
        if self.alternatives == 0 {
            return Err(GeoError::Rejected {
                code: "NoRoute".to_string(),
                message: "Impossible route between points".to_string(),
            });
        }
        Ok(RouteSet::new(
            (0..self.alternatives)
                .map(|i| RouteAlternative {
                    polyline: points.to_vec(),
                    distance_meters: 10_000.0 * (i + 1) as f64,
                    duration_seconds: 600.0 * (i + 1) as f64,
                    summary_label: format!("alt-{}", i),
                })
                .collect(),
        ))
    }
}

/// Reports the latitude as the temperature, so tests can tell places apart.
#[derive(Default)]
pub struct FakeWeather {
    pub calls: Mutex<Vec<LatLon>>,
}

impl FakeWeather {
    pub fn calls(&self) -> Vec<LatLon> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current_weather(&self, lat: f64, lon: f64) -> Result<Weather, GeoError> {
        self.calls.lock().unwrap().push((lat, lon));
        Ok(Weather {
            temperature_c: lat,
            weather_code: 0,
            description: "Clear sky",
        })
    }

    async fn forecast(&self, _lat: f64, _lon: f64) -> Result<Vec<DailyForecast>, GeoError> {
        Ok(Vec::new())
    }
}

pub fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn route_labels(set: &RouteSet) -> Vec<String> {
    set.alternatives()
        .iter()
        .map(|a| a.summary_label.clone())
        .collect()
}
