use serde::Serialize;

/// A `(lat, lon)` pair. Providers that speak `lon,lat` are converted at the edge.
pub type LatLon = (f64, f64);

/// Waypoint text that resolves through the IP locate service instead of a search.
pub const MY_LOCATION: &str = "My Location";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl Place {
    pub fn new(lat: f64, lon: f64, display_name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            display_name: display_name.into(),
        }
    }

    pub fn coord(&self) -> LatLon {
        (self.lat, self.lon)
    }

    pub fn short_name(&self) -> &str {
        short_name(&self.display_name)
    }
}

/// Text before the first comma, used where a full Nominatim name is too long.
pub fn short_name(name: &str) -> &str {
    name.split(',').next().unwrap_or(name).trim()
}

pub fn is_my_location(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case(MY_LOCATION)
}

/// Name used for a coordinate that has no address.
pub fn format_coords(lat: f64, lon: f64) -> String {
    format!("{:.4}, {:.4}", lat, lon)
}
