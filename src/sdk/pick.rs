use std::sync::Arc;

use tokio::sync::mpsc;

use crate::sdk::routing::geocode::format_coords;
use crate::sdk::routing::service::GeocodeProvider;
use crate::sdk::waypoints::WaypointId;

/// Address found for a map click, addressed to the waypoint that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PickDelivery {
    pub slot: WaypointId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Fills a waypoint from a click on the map.
///
/// At most one waypoint waits for a click. A click spawns a reverse lookup
/// whose result comes back on the channel returned by [`PickResolver::new`];
/// the owner hands it to [`PickResolver::finish`].
pub struct PickResolver<G: ?Sized> {
    geocoder: Arc<G>,
    pending: Option<WaypointId>,
    deliveries: mpsc::UnboundedSender<PickDelivery>,
}

impl<G: GeocodeProvider + ?Sized + 'static> PickResolver<G> {
    pub fn new(geocoder: Arc<G>) -> (Self, mpsc::UnboundedReceiver<PickDelivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let resolver = Self {
            geocoder,
            pending: None,
            deliveries: tx,
        };
        (resolver, rx)
    }

    pub fn pending(&self) -> Option<WaypointId> {
        self.pending
    }

    /// Replaces whichever waypoint was waiting before.
    pub fn request_pick(&mut self, slot: WaypointId) {
        if let Some(previous) = self.pending.replace(slot) {
            log::debug!("Pick for {:?} replaced by {:?}", previous, slot);
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Starts resolving the click if a waypoint is waiting. Must be called
    /// from within a tokio runtime.
    pub fn on_map_click(&self, lat: f64, lon: f64) -> bool {
        let Some(slot) = self.pending else {
            return false;
        };

        let geocoder = Arc::clone(&self.geocoder);
        let tx = self.deliveries.clone();
        tokio::spawn(async move {
            let name = match geocoder.reverse_geocode(lat, lon).await {
                Ok(place) => place.display_name,
                Err(err) => {
                    log::warn!("Reverse lookup for ({}, {}) failed: {}", lat, lon, err);
                    format_coords(lat, lon)
                }
            };
            if tx.send(PickDelivery { slot, name, lat, lon }).is_err() {
                log::debug!("Pick receiver is gone; result discarded");
            }
        });
        true
    }

    /// Delivery point: accepts the result if its waypoint is still the one
    /// waiting, and clears the pending pick.
    pub fn finish(&mut self, delivery: PickDelivery) -> Option<PickDelivery> {
        if self.pending == Some(delivery.slot) {
            self.pending = None;
            Some(delivery)
        } else {
            log::debug!("Dropping pick result for {:?}; no longer pending", delivery.slot);
            None
        }
    }
}
