pub mod sdk;

pub use sdk::config::MapConfig;
pub use sdk::display::{DisplayCommand, DisplayEvent, MapLayer};
pub use sdk::orchestrator::{
    OrchestratorState, RouteOrchestrator, RoutePlan, RouteSetId, WaypointMarker,
};
pub use sdk::pick::{PickDelivery, PickResolver};
pub use sdk::routing::{
    DailyForecast, GeoError, GeocodeProvider, NominatimGeocoder, OsrmRouter, Place, PlanError,
    RouteAlternative, RouteProvider, RouteSet, RouteStats, SuggestionCache, Weather,
    WeatherClient, WeatherProvider,
};
pub use sdk::session::{MapSession, SessionUpdate};
pub use sdk::suggest::{FieldId, SuggestionDelivery, SuggestionEngine};
pub use sdk::waypoints::{WaypointId, WaypointKind, WaypointSequence};
