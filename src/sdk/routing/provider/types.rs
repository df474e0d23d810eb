use serde::Deserialize;

use crate::sdk::routing::error::GeoError;
use crate::sdk::routing::geocode::{format_coords, Place};
use crate::sdk::routing::route::{RouteAlternative, RouteSet};

use super::weather::{describe_weather_code, DailyForecast};

// --- Nominatim ---

/// One `/search` hit. Nominatim sends coordinates as strings.
#[derive(Deserialize, Debug)]
pub struct SearchHit {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

impl SearchHit {
    pub fn into_place(self) -> Result<Place, GeoError> {
        let lat = parse_degrees(&self.lat, "lat")?;
        let lon = parse_degrees(&self.lon, "lon")?;
        Ok(Place::new(lat, lon, self.display_name))
    }
}

/// `/reverse` answer; `display_name` is absent for coordinates in the sea.
#[derive(Deserialize, Debug)]
pub struct ReverseHit {
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ReverseHit {
    pub fn into_place(self, lat: f64, lon: f64) -> Place {
        let name = self
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format_coords(lat, lon));
        Place::new(lat, lon, name)
    }
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, GeoError> {
    raw.trim()
        .parse()
        .map_err(|_| GeoError::Malformed(format!("{} is not a number: {:?}", field, raw)))
}

// --- ip-api ---

#[derive(Deserialize, Debug)]
pub struct IpLocation {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl IpLocation {
    pub fn into_place(self) -> Result<Place, GeoError> {
        if self.status != "success" {
            return Err(GeoError::NotFound(
                self.message.unwrap_or_else(|| "current location".to_string()),
            ));
        }
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(GeoError::Malformed(
                "ip lookup succeeded without coordinates".to_string(),
            ));
        };
        let name = format!(
            "{}, {}",
            self.city.as_deref().unwrap_or("Unknown"),
            self.country.as_deref().unwrap_or("Location")
        );
        Ok(Place::new(lat, lon, name))
    }
}

// --- OSRM ---

#[derive(Deserialize, Debug)]
pub struct DirectionsResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Deserialize, Debug)]
pub struct Route {
    pub geometry: LineString,
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub weight_name: Option<String>,
}

/// GeoJSON geometry; positions are `[lon, lat]`.
#[derive(Deserialize, Debug)]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}

impl DirectionsResponse {
    pub fn into_route_set(self) -> Result<RouteSet, GeoError> {
        if self.code != "Ok" {
            return Err(GeoError::Rejected {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }
        if self.routes.is_empty() {
            return Err(GeoError::NotFound("route".to_string()));
        }

        let alternatives = self
            .routes
            .into_iter()
            .map(|route| RouteAlternative {
                polyline: route
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(|[lon, lat]| (lat, lon))
                    .collect(),
                distance_meters: route.distance,
                duration_seconds: route.duration,
                summary_label: route.weight_name.unwrap_or_else(|| "Route".to_string()),
            })
            .collect();
        Ok(RouteSet::new(alternatives))
    }
}

// --- Open-Meteo ---

#[derive(Deserialize, Debug)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
    #[serde(default)]
    pub daily: Option<DailySeries>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub weathercode: u16,
}

/// Column-wise daily block; every series is indexed like `time`.
/// Open-Meteo sends `null` for days it has no value for.
#[derive(Deserialize, Debug)]
pub struct DailySeries {
    pub time: Vec<String>,
    #[serde(default)]
    pub weathercode: Vec<Option<u16>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<u8>>,
}

impl DailySeries {
    pub fn into_days(self) -> Vec<DailyForecast> {
        fn at<T: Copy>(series: &[Option<T>], i: usize) -> Option<T> {
            series.get(i).copied().flatten()
        }

        self.time
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let weather_code = at(&self.weathercode, i);
                DailyForecast {
                    date: date.clone(),
                    weather_code,
                    description: weather_code.map_or("Unknown", describe_weather_code),
                    max_c: at(&self.temperature_2m_max, i),
                    min_c: at(&self.temperature_2m_min, i),
                    precipitation_probability: at(&self.precipitation_probability_max, i),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_hit_parses_string_coordinates() {
        let hits: Vec<SearchHit> = serde_json::from_str(
            r#"[{"place_id":1,"lat":"48.8588897","lon":"2.3200410","display_name":"Paris, France"}]"#,
        )
        .unwrap();
        let place = hits.into_iter().next().unwrap().into_place().unwrap();
        assert_eq!(place, Place::new(48.8588897, 2.3200410, "Paris, France"));
    }

    #[test]
    fn search_hit_with_garbage_coordinates_is_malformed() {
        let hit = SearchHit {
            lat: "north".into(),
            lon: "2.0".into(),
            display_name: "x".into(),
        };
        assert!(matches!(hit.into_place(), Err(GeoError::Malformed(_))));
    }

    #[test]
    fn reverse_hit_without_name_falls_back_to_coordinates() {
        let hit: ReverseHit = serde_json::from_str(r#"{"error":"Unable to geocode"}"#).unwrap();
        let place = hit.into_place(44.123456, -30.5);
        assert_eq!(place.display_name, "44.1235, -30.5000");
        assert_eq!(place.coord(), (44.123456, -30.5));
    }

    #[test]
    fn ip_location_builds_city_country_name() {
        let loc: IpLocation = serde_json::from_str(
            r#"{"status":"success","lat":52.0,"lon":13.0,"city":"Berlin","country":"Germany"}"#,
        )
        .unwrap();
        assert_eq!(loc.into_place().unwrap(), Place::new(52.0, 13.0, "Berlin, Germany"));
    }

    #[test]
    fn ip_location_missing_fields_use_placeholders() {
        let loc: IpLocation =
            serde_json::from_str(r#"{"status":"success","lat":1.5,"lon":2.5}"#).unwrap();
        assert_eq!(loc.into_place().unwrap().display_name, "Unknown, Location");
    }

    #[test]
    fn ip_location_failure_is_not_found() {
        let loc: IpLocation =
            serde_json::from_str(r#"{"status":"fail","message":"reserved range"}"#).unwrap();
        assert!(loc.into_place().unwrap_err().is_not_found());
    }

    #[test]
    fn directions_invert_provider_coordinate_order() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "geometry": {"type": "LineString", "coordinates": [[2.35, 48.85], [13.40, 52.52]]},
                "distance": 1054000.5,
                "duration": 36000.0,
                "weight_name": "routability"
            }]
        }"#;
        let set = serde_json::from_str::<DirectionsResponse>(body)
            .unwrap()
            .into_route_set()
            .unwrap();
        let primary = set.primary().unwrap();
        assert_eq!(primary.polyline, vec![(48.85, 2.35), (52.52, 13.40)]);
        assert_eq!(primary.distance_meters, 1054000.5);
        assert_eq!(primary.duration_seconds, 36000.0);
        assert_eq!(primary.summary_label, "routability");
    }

    #[test]
    fn directions_keep_provider_order_and_default_label() {
        let body = r#"{"code":"Ok","routes":[
            {"geometry":{"coordinates":[]},"distance":900.0,"duration":90.0},
            {"geometry":{"coordinates":[]},"distance":100.0,"duration":10.0}
        ]}"#;
        let set = serde_json::from_str::<DirectionsResponse>(body)
            .unwrap()
            .into_route_set()
            .unwrap();
        let distances: Vec<f64> = set.alternatives().iter().map(|a| a.distance_meters).collect();
        assert_eq!(distances, [900.0, 100.0]);
        assert_eq!(set.alternatives()[1].summary_label, "Route");
    }

    #[test]
    fn directions_with_bad_code_or_no_routes_are_not_found() {
        let refused: DirectionsResponse =
            serde_json::from_str(r#"{"code":"NoRoute","message":"Impossible route"}"#).unwrap();
        assert!(refused.into_route_set().unwrap_err().is_not_found());

        let empty: DirectionsResponse =
            serde_json::from_str(r#"{"code":"Ok","routes":[]}"#).unwrap();
        assert!(empty.into_route_set().unwrap_err().is_not_found());
    }

    #[test]
    fn daily_series_become_one_entry_per_day() {
        let body = r#"{"daily":{
            "time":["2026-10-18","2026-10-19","2026-10-20"],
            "weathercode":[61,null,0],
            "temperature_2m_max":[14.2,12.9,16.0],
            "temperature_2m_min":[7.1,6.4,null],
            "precipitation_probability_max":[80,35]
        }}"#;
        let days = serde_json::from_str::<ForecastResponse>(body)
            .unwrap()
            .daily
            .unwrap()
            .into_days();

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, "2026-10-18");
        assert_eq!(days[0].description, "Rain");
        assert_eq!(days[0].precipitation_probability, Some(80));
        assert_eq!(days[1].weather_code, None);
        assert_eq!(days[1].description, "Unknown");
        assert_eq!(days[2].min_c, None);
        assert_eq!(days[2].max_c, Some(16.0));
        assert_eq!(days[2].precipitation_probability, None);
    }
}
