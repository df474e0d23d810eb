use anyhow::{Context, Result};
use cheapmaps::{
    sdk::util::{log::init_logging, rate_limit::geocode_limiter},
    FieldId, GeocodeProvider, MapConfig, NominatimGeocoder, OsrmRouter, RouteOrchestrator,
    RouteStats, SuggestionCache, SuggestionEngine, WeatherClient, WeatherProvider,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;

/// Place search, multi-stop routing and weather on OpenStreetMap services
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Overrides CHEAPMAPS_NOMINATIM_URL
    #[arg(long)]
    nominatim_url: Option<String>,

    /// Overrides CHEAPMAPS_OSRM_URL
    #[arg(long)]
    osrm_url: Option<String>,

    /// Overrides CHEAPMAPS_USER_AGENT
    #[arg(long)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the best match for a place name
    Search { query: String },

    /// List autocomplete suggestions for partial input (3+ characters)
    Suggest { text: String },

    /// Approximate location of this machine
    Locate,

    /// Address of a coordinate
    Reverse {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Plan a route through two or more places ("my location" allowed)
    Route {
        #[arg(required = true, num_args = 2..)]
        waypoints: Vec<String>,

        /// Promote this alternative to primary before printing
        #[arg(long)]
        select: Option<usize>,

        /// Print the map payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Current weather at a coordinate
    Weather {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Also print the daily forecast for the coming week
        #[arg(long)]
        forecast: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut config = MapConfig::from_env().context("Invalid CHEAPMAPS_* configuration")?;
    if let Some(url) = cli.nominatim_url {
        config.nominatim_url = url;
    }
    if let Some(url) = cli.osrm_url {
        config.osrm_url = url;
    }
    if let Some(agent) = cli.user_agent {
        config.user_agent = agent;
    }

    let geocoder = Arc::new(
        NominatimGeocoder::new(&config, geocode_limiter(config.requests_per_minute))
            .context("Failed to build geocoding client")?,
    );

    match cli.command {
        Command::Search { query } => {
            let place = geocoder
                .forward_geocode(&query)
                .await
                .with_context(|| format!("Could not find location: {}", query))?;
            println!("{:.6}, {:.6}  {}", place.lat, place.lon, place.display_name);
        }
        Command::Suggest { text } => {
            let (mut engine, mut rx) =
                SuggestionEngine::new(geocoder, SuggestionCache::new(), config.debounce);
            if !engine.on_text_changed(FieldId::Search, &text) {
                log::warn!("Suggestions need at least 3 characters");
                return Ok(());
            }
            if let Some(delivery) = rx.recv().await {
                for name in delivery.names {
                    println!("{}", name);
                }
            }
        }
        Command::Locate => {
            let place = geocoder
                .locate_by_network()
                .await
                .context("Location undetected")?;
            println!("{:.4}, {:.4}  {}", place.lat, place.lon, place.display_name);
        }
        Command::Reverse { lat, lon } => {
            let place = geocoder
                .reverse_geocode(lat, lon)
                .await
                .context("Reverse lookup failed")?;
            println!("{}", place.display_name);
        }
        Command::Route {
            waypoints,
            select,
            json,
        } => {
            let router =
                Arc::new(OsrmRouter::new(&config).context("Failed to build routing client")?);
            let mut orchestrator = RouteOrchestrator::new(geocoder, router);
            let plan = orchestrator.plan(&waypoints).await?;

            let mut stats = plan.stats;
            if let Some(index) = select {
                match orchestrator.select(plan.id, index) {
                    Some(selected) => stats = selected,
                    None => log::warn!("No alternative #{} to select", index),
                }
            }

            if json {
                let routes = orchestrator
                    .current()
                    .map(|(_, set)| set.clone())
                    .unwrap_or_default();
                let payload = serde_json::json!({
                    "routes": routes,
                    "waypoints": plan.waypoints,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print_stats(&stats);
                for marker in &plan.waypoints {
                    println!(
                        "  {:>5}  {:.5}, {:.5}  {}",
                        format!("{:?}", marker.kind).to_lowercase(),
                        marker.lat,
                        marker.lon,
                        marker.label
                    );
                }
            }
        }
        Command::Weather { lat, lon, forecast } => {
            let client = WeatherClient::new(&config).context("Failed to build weather client")?;
            let weather = client
                .current_weather(lat, lon)
                .await
                .context("Weather unavailable")?;
            println!("{:.1}°C  {}", weather.temperature_c, weather.description);

            if forecast {
                let days = client
                    .forecast(lat, lon)
                    .await
                    .context("Forecast unavailable")?;
                for day in days {
                    println!(
                        "{}  {:>6} / {:>6}  rain {:>4}  {}",
                        day.date,
                        celsius(day.max_c),
                        celsius(day.min_c),
                        day.precipitation_probability
                            .map_or_else(|| "-".to_string(), |p| format!("{}%", p)),
                        day.description
                    );
                }
            }
        }
    }

    Ok(())
}

fn celsius(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |t| format!("{:.0}°C", t))
}

fn print_stats(stats: &RouteStats) {
    println!("{}", stats.headline());
    println!("{}  ({})", stats.duration_label(), stats.distance_label());
}
