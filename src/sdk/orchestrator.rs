use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sdk::routing::error::{GeoError, PlanError};
use crate::sdk::routing::geocode::{is_my_location, LatLon, Place};
use crate::sdk::routing::route::{RouteAlternative, RouteSet, RouteStats};
use crate::sdk::routing::service::{GeocodeProvider, RouteProvider};
use crate::sdk::waypoints::WaypointKind;

/// Identifies one stored [`RouteSet`]. Selection events carry it so that
/// clicks on a route set that has since been replaced can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteSetId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Resolving,
    Routed,
}

/// Marker the map draws for one resolved waypoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointMarker {
    pub lat: f64,
    #[serde(rename = "lng")]
    pub lon: f64,
    #[serde(rename = "name")]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: WaypointKind,
    /// 1-based position among the stops; only set for stops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

/// Everything the map needs to draw a freshly planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub id: RouteSetId,
    pub routes: RouteSet,
    pub waypoints: Vec<WaypointMarker>,
    pub stats: RouteStats,
}

/// Turns waypoint labels into routes and owns the live [`RouteSet`].
pub struct RouteOrchestrator<G: ?Sized, R: ?Sized> {
    geocoder: Arc<G>,
    router: Arc<R>,
    state: OrchestratorState,
    current: Option<(RouteSetId, RouteSet)>,
    next_id: u64,
}

impl<G, R> RouteOrchestrator<G, R>
where
    G: GeocodeProvider + ?Sized,
    R: RouteProvider + ?Sized,
{
    pub fn new(geocoder: Arc<G>, router: Arc<R>) -> Self {
        Self {
            geocoder,
            router,
            state: OrchestratorState::Idle,
            current: None,
            next_id: 0,
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn current(&self) -> Option<(RouteSetId, &RouteSet)> {
        self.current.as_ref().map(|(id, set)| (*id, set))
    }

    /// Geocodes `labels` one after the other and asks for routes through them.
    ///
    /// The previous route set is discarded as soon as planning starts. Any
    /// failure leaves the orchestrator idle with nothing stored.
    pub async fn plan(&mut self, labels: &[String]) -> Result<RoutePlan, PlanError> {
        if labels.len() < 2 {
            return Err(PlanError::InsufficientWaypoints {
                found: labels.len(),
            });
        }

        self.current = None;
        self.state = OrchestratorState::Resolving;

        let result = self.resolve_and_route(labels).await;
        match result {
            Ok((places, routes)) => {
                self.next_id += 1;
                let id = RouteSetId(self.next_id);
                let waypoints = build_manifest(labels, &places);
                let Some(stats) = routes.stats() else {
                    self.state = OrchestratorState::Idle;
                    return Err(PlanError::RouteNotFound {
                        source: GeoError::NotFound("route".to_string()),
                    });
                };

                log::info!(
                    "Planned route {:?} through {} waypoints ({} alternative(s), {})",
                    id,
                    labels.len(),
                    routes.len(),
                    stats.distance_label()
                );
                self.current = Some((id, routes.clone()));
                self.state = OrchestratorState::Routed;
                Ok(RoutePlan {
                    id,
                    routes,
                    waypoints,
                    stats,
                })
            }
            Err(err) => {
                log::warn!("Planning failed: {}", err);
                self.state = OrchestratorState::Idle;
                Err(err)
            }
        }
    }

    async fn resolve_and_route(
        &self,
        labels: &[String],
    ) -> Result<(Vec<Place>, RouteSet), PlanError> {
        let mut places = Vec::with_capacity(labels.len());
        for label in labels {
            let resolved = if is_my_location(label) {
                self.geocoder.locate_by_network().await
            } else {
                self.geocoder.forward_geocode(label).await
            };
            match resolved {
                Ok(place) => {
                    log::debug!("Resolved \"{}\" to ({}, {})", label, place.lat, place.lon);
                    places.push(place);
                }
                Err(source) => {
                    return Err(PlanError::UnknownWaypoint {
                        label: label.clone(),
                        source,
                    });
                }
            }
        }

        let coords: Vec<LatLon> = places.iter().map(Place::coord).collect();
        let routes = self
            .router
            .route(&coords)
            .await
            .map_err(|source| PlanError::RouteNotFound { source })?;
        Ok((places, routes))
    }

    /// Promotes alternative `index` of route set `id` to primary.
    ///
    /// Returns the new primary's figures, or `None` when the event refers to a
    /// route set that is no longer live or to an index it does not have.
    pub fn select(&mut self, id: RouteSetId, index: usize) -> Option<RouteStats> {
        if self.state != OrchestratorState::Routed {
            log::debug!("Ignoring selection {} while {:?}", index, self.state);
            return None;
        }
        let (live_id, routes) = self.current.as_mut()?;
        if *live_id != id {
            log::debug!("Ignoring selection for replaced route set {:?}", id);
            return None;
        }
        if routes.select(index).is_none() {
            log::debug!(
                "Ignoring out-of-range selection {} of {} alternatives",
                index,
                routes.len()
            );
            return None;
        }
        routes.stats()
    }

    pub fn primary(&self) -> Option<&RouteAlternative> {
        self.current.as_ref().and_then(|(_, set)| set.primary())
    }
}

fn build_manifest(labels: &[String], places: &[Place]) -> Vec<WaypointMarker> {
    let len = places.len();
    labels
        .iter()
        .zip(places)
        .enumerate()
        .map(|(position, (label, place))| {
            let kind = WaypointKind::at(position, len);
            WaypointMarker {
                lat: place.lat,
                lon: place.lon,
                label: label.clone(),
                kind,
                index: (kind == WaypointKind::Stop).then_some(position),
            }
        })
        .collect()
}
