//! The control flow behind the map window.
//!
//! [`MapSession`] owns every piece of mutable state: the waypoint list, the
//! orchestrator, the suggestion engine, the pending pick and the weather
//! panel. Background lookups only ever talk back through channels drained by
//! [`MapSession::next_update`], so all state changes happen here.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

use crate::sdk::display::{DisplayCommand, DisplayEvent, MapLayer};
use crate::sdk::orchestrator::{OrchestratorState, RouteOrchestrator, RoutePlan};
use crate::sdk::pick::{PickDelivery, PickResolver};
use crate::sdk::routing::cache::SuggestionCache;
use crate::sdk::routing::error::{GeoError, PlanError};
use crate::sdk::routing::geocode::{short_name, Place, MY_LOCATION};
use crate::sdk::routing::provider::weather::Weather;
use crate::sdk::routing::route::RouteStats;
use crate::sdk::routing::service::{GeocodeProvider, RouteProvider, WeatherProvider};
use crate::sdk::suggest::{FieldId, SuggestionDelivery, SuggestionEngine};
use crate::sdk::waypoints::{WaypointId, WaypointSequence};

/// Something the widgets should reflect.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Suggestions { field: FieldId, names: Vec<String> },
    /// A map click is being resolved for the pending waypoint.
    ResolvingPick { lat: f64, lon: f64 },
    WaypointPicked { slot: WaypointId, name: String },
    RouteStats(RouteStats),
    /// Conditions at the place last searched, located or picked.
    Weather { name: String, weather: Weather },
}

struct WeatherDelivery {
    ticket: u64,
    name: String,
    weather: Weather,
}

enum Incoming {
    Suggestion(SuggestionDelivery),
    Pick(PickDelivery),
    Weather(WeatherDelivery),
}

pub struct MapSession<G: ?Sized, R: ?Sized> {
    geocoder: Arc<G>,
    waypoints: WaypointSequence,
    directions_mode: bool,
    orchestrator: RouteOrchestrator<G, R>,
    suggestions: SuggestionEngine<G>,
    suggestion_rx: mpsc::UnboundedReceiver<SuggestionDelivery>,
    picks: PickResolver<G>,
    pick_rx: mpsc::UnboundedReceiver<PickDelivery>,
    weather: Option<Arc<dyn WeatherProvider>>,
    weather_ticket: u64,
    weather_tx: mpsc::UnboundedSender<WeatherDelivery>,
    weather_rx: mpsc::UnboundedReceiver<WeatherDelivery>,
    commands: mpsc::UnboundedSender<DisplayCommand>,
}

impl<G, R> MapSession<G, R>
where
    G: GeocodeProvider + ?Sized + 'static,
    R: RouteProvider + ?Sized,
{
    /// Returns the session and the stream of commands for the map surface.
    pub fn new(
        geocoder: Arc<G>,
        router: Arc<R>,
        cache: SuggestionCache,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<DisplayCommand>) {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (suggestions, suggestion_rx) =
            SuggestionEngine::new(Arc::clone(&geocoder), cache, debounce);
        let (picks, pick_rx) = PickResolver::new(Arc::clone(&geocoder));
        let (weather_tx, weather_rx) = mpsc::unbounded_channel();
        let session = Self {
            orchestrator: RouteOrchestrator::new(Arc::clone(&geocoder), router),
            geocoder,
            waypoints: WaypointSequence::new(),
            directions_mode: false,
            suggestions,
            suggestion_rx,
            picks,
            pick_rx,
            weather: None,
            weather_ticket: 0,
            weather_tx,
            weather_rx,
            commands,
        };
        (session, command_rx)
    }

    /// Fetches current weather after every search, locate and map pick.
    pub fn with_weather(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(provider);
        self
    }

    fn emit(&self, command: DisplayCommand) {
        if self.commands.send(command).is_err() {
            log::debug!("Map surface is gone; command dropped");
        }
    }

    pub fn waypoints(&self) -> &WaypointSequence {
        &self.waypoints
    }

    pub fn orchestrator(&self) -> &RouteOrchestrator<G, R> {
        &self.orchestrator
    }

    pub fn pending_pick(&self) -> Option<WaypointId> {
        self.picks.pending()
    }

    pub fn directions_mode(&self) -> bool {
        self.directions_mode
    }

    /// Entering directions mode pre-fills the start with "My Location".
    pub fn set_directions_mode(&mut self, enabled: bool) {
        self.directions_mode = enabled;
        if enabled {
            self.fill_start_with_my_location();
        }
    }

    /// Text written by the session itself. The suggestion engine must see it
    /// too, so that results for the replaced text are dropped.
    fn write_waypoint_text(&mut self, id: WaypointId, text: &str) {
        if self.waypoints.set_text(id, text) {
            self.suggestions.set_current_text(FieldId::Waypoint(id), text);
        }
    }

    fn fill_start_with_my_location(&mut self) {
        self.waypoints.set_start_text(MY_LOCATION);
        let start = self.waypoints.start();
        self.suggestions.set_current_text(FieldId::Waypoint(start), MY_LOCATION);
    }

    /// Only the most recently requested weather is shown.
    fn fetch_weather(&mut self, lat: f64, lon: f64, name: &str) {
        let Some(provider) = self.weather.clone() else {
            return;
        };
        self.weather_ticket += 1;
        let ticket = self.weather_ticket;
        let name = short_name(name).to_string();
        let tx = self.weather_tx.clone();
        tokio::spawn(async move {
            match provider.current_weather(lat, lon).await {
                Ok(weather) => {
                    if tx.send(WeatherDelivery { ticket, name, weather }).is_err() {
                        log::debug!("Weather receiver is gone; result discarded");
                    }
                }
                Err(err) => log::warn!("Weather for \"{}\" unavailable: {}", name, err),
            }
        });
    }

    // --- Widget input ---

    pub fn on_search_text(&mut self, text: &str) {
        self.suggestions.on_text_changed(FieldId::Search, text);
    }

    pub fn on_waypoint_text(&mut self, id: WaypointId, text: &str) {
        if self.waypoints.set_text(id, text) {
            self.suggestions.on_text_changed(FieldId::Waypoint(id), text);
        }
    }

    pub fn add_stop(&mut self) -> WaypointId {
        self.waypoints.add("")
    }

    pub fn move_waypoint_up(&mut self, id: WaypointId) -> bool {
        self.waypoints.move_up(id)
    }

    pub fn move_waypoint_down(&mut self, id: WaypointId) -> bool {
        self.waypoints.move_down(id)
    }

    pub fn remove_waypoint(&mut self, id: WaypointId) -> bool {
        if !self.waypoints.remove(id) {
            return false;
        }
        self.suggestions.forget(FieldId::Waypoint(id));
        if self.picks.pending() == Some(id) {
            self.picks.cancel();
        }
        true
    }

    pub fn request_pick(&mut self, id: WaypointId) -> bool {
        if !self.waypoints.contains(id) {
            return false;
        }
        self.picks.request_pick(id);
        true
    }

    pub fn switch_layer(&self, layer: MapLayer) {
        self.emit(DisplayCommand::SwitchLayer { layer });
    }

    // --- Actions ---

    /// Centres the map on the best match for `query`.
    pub async fn search(&mut self, query: &str) -> Result<Place, GeoError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeoError::InvalidInput("empty search".to_string()));
        }
        let place = self.geocoder.forward_geocode(query).await?;
        self.emit(DisplayCommand::UpdateLocation {
            lat: place.lat,
            lng: place.lon,
            name: place.display_name.clone(),
        });
        self.fetch_weather(place.lat, place.lon, &place.display_name);
        Ok(place)
    }

    /// In directions mode this only fills the start waypoint.
    pub async fn use_current_location(&mut self) -> Result<Place, GeoError> {
        let place = self.geocoder.locate_by_network().await?;
        if self.directions_mode {
            self.fill_start_with_my_location();
        } else {
            self.emit(DisplayCommand::UpdateLocation {
                lat: place.lat,
                lng: place.lon,
                name: MY_LOCATION.to_string(),
            });
        }
        self.fetch_weather(place.lat, place.lon, &place.display_name);
        Ok(place)
    }

    /// Plans a route through the current waypoints and draws it.
    pub async fn go(&mut self) -> Result<RoutePlan, PlanError> {
        let labels = self.waypoints.snapshot();
        let plan = self.orchestrator.plan(&labels).await?;
        self.emit(DisplayCommand::DrawRoute {
            route_set: plan.id,
            routes: plan.routes.clone(),
            waypoints: plan.waypoints.clone(),
        });
        Ok(plan)
    }

    // --- Map surface and background deliveries ---

    pub fn handle_event(&mut self, event: DisplayEvent) -> Option<SessionUpdate> {
        match event {
            DisplayEvent::MapClicked { lat, lng } => self
                .picks
                .on_map_click(lat, lng)
                .then_some(SessionUpdate::ResolvingPick { lat, lon: lng }),
            DisplayEvent::RouteSelected { route_set, index } => {
                if self.orchestrator.state() != OrchestratorState::Routed {
                    return None;
                }
                self.orchestrator
                    .select(route_set, index)
                    .map(SessionUpdate::RouteStats)
            }
        }
    }

    /// Waits for the next background result that is still relevant.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        loop {
            let incoming = tokio::select! {
                Some(delivery) = self.suggestion_rx.recv() => Incoming::Suggestion(delivery),
                Some(delivery) = self.pick_rx.recv() => Incoming::Pick(delivery),
                Some(delivery) = self.weather_rx.recv() => Incoming::Weather(delivery),
                else => return None,
            };

            match incoming {
                Incoming::Suggestion(delivery) => {
                    if let Some(delivery) = self.suggestions.accept(delivery) {
                        return Some(SessionUpdate::Suggestions {
                            field: delivery.field,
                            names: delivery.names,
                        });
                    }
                }
                Incoming::Pick(delivery) => {
                    if let Some(picked) = self.picks.finish(delivery) {
                        return Some(self.apply_pick(picked));
                    }
                }
                Incoming::Weather(delivery) => {
                    if delivery.ticket == self.weather_ticket {
                        return Some(SessionUpdate::Weather {
                            name: delivery.name,
                            weather: delivery.weather,
                        });
                    }
                    log::debug!("Dropping superseded weather for \"{}\"", delivery.name);
                }
            }
        }
    }

    fn apply_pick(&mut self, picked: PickDelivery) -> SessionUpdate {
        self.write_waypoint_text(picked.slot, &picked.name);
        self.emit(DisplayCommand::UpdateLocation {
            lat: picked.lat,
            lng: picked.lon,
            name: picked.name.clone(),
        });
        self.fetch_weather(picked.lat, picked.lon, &picked.name);
        SessionUpdate::WaypointPicked {
            slot: picked.slot,
            name: picked.name,
        }
    }
}
