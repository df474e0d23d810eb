//! Messages exchanged with the map surface, as JSON.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::sdk::orchestrator::{RouteSetId, WaypointMarker};
use crate::sdk::routing::route::RouteSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    Dark,
    Light,
    Satellite,
    Terrain,
}

impl MapLayer {
    pub const ALL: [MapLayer; 4] = [
        MapLayer::Dark,
        MapLayer::Light,
        MapLayer::Satellite,
        MapLayer::Terrain,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MapLayer::Dark => "dark",
            MapLayer::Light => "light",
            MapLayer::Satellite => "satellite",
            MapLayer::Terrain => "terrain",
        }
    }
}

impl fmt::Display for MapLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MapLayer {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapLayer::ALL
            .into_iter()
            .find(|layer| layer.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown map layer: {}", s))
    }
}

/// Raised by the map surface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DisplayEvent {
    MapClicked {
        lat: f64,
        lng: f64,
    },
    /// The user clicked alternative `index` of the drawn route set.
    RouteSelected {
        #[serde(rename = "routeSet")]
        route_set: RouteSetId,
        index: usize,
    },
}

/// Sent to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum DisplayCommand {
    DrawRoute {
        #[serde(rename = "routeSet")]
        route_set: RouteSetId,
        routes: RouteSet,
        waypoints: Vec<WaypointMarker>,
    },
    UpdateLocation {
        lat: f64,
        lng: f64,
        name: String,
    },
    SwitchLayer {
        layer: MapLayer,
    },
}

impl DisplayEvent {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl DisplayCommand {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
