pub mod cache;
pub mod error;
pub mod geocode;
pub mod provider;
pub mod route;
pub mod service;

pub use cache::SuggestionCache;
pub use error::{GeoError, PlanError};
pub use geocode::{format_coords, is_my_location, short_name, LatLon, Place, MY_LOCATION};
pub use provider::{DailyForecast, NominatimGeocoder, OsrmRouter, Weather, WeatherClient};
pub use route::{RouteAlternative, RouteSet, RouteStats};
pub use service::{GeocodeProvider, RouteProvider, WeatherProvider};
