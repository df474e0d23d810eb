use serde::Serialize;

use super::geocode::LatLon;

/// One way of driving through all waypoints, as ranked by the routing service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAlternative {
    #[serde(rename = "coordinates")]
    pub polyline: Vec<LatLon>,
    #[serde(rename = "distance")]
    pub distance_meters: f64,
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
    #[serde(rename = "summary")]
    pub summary_label: String,
}

/// Alternatives for the current plan. Index 0 is the primary route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteSet {
    alternatives: Vec<RouteAlternative>,
}

impl RouteSet {
    pub fn new(alternatives: Vec<RouteAlternative>) -> Self {
        Self { alternatives }
    }

    pub fn alternatives(&self) -> &[RouteAlternative] {
        &self.alternatives
    }

    pub fn primary(&self) -> Option<&RouteAlternative> {
        self.alternatives.first()
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Moves the alternative at `index` to the front; the others keep their
    /// relative order. Returns `None` and leaves the set untouched when
    /// `index` is out of bounds.
    pub fn select(&mut self, index: usize) -> Option<&RouteAlternative> {
        if index >= self.alternatives.len() {
            return None;
        }
        self.alternatives[..=index].rotate_right(1);
        self.alternatives.first()
    }

    pub fn stats(&self) -> Option<RouteStats> {
        self.primary().map(|primary| RouteStats {
            distance_meters: primary.distance_meters,
            duration_seconds: primary.duration_seconds,
            alternatives: self.alternatives.len() - 1,
        })
    }
}

/// Figures shown for the primary route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteStats {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Alternatives besides the primary one.
    pub alternatives: usize,
}

impl RouteStats {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// `"1h 5min"`, or `"42min"` under an hour.
    pub fn duration_label(&self) -> String {
        let total = self.duration_seconds.max(0.0) as u64;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        if hours > 0 {
            format!("{}h {}min", hours, minutes)
        } else {
            format!("{}min", minutes)
        }
    }

    pub fn distance_label(&self) -> String {
        format!("{:.1} km", self.distance_km())
    }

    pub fn headline(&self) -> String {
        if self.alternatives > 0 {
            format!("BEST ROUTE (+{} ALTERNATIVES)", self.alternatives)
        } else {
            "FASTEST ROUTE".to_string()
        }
    }
}
