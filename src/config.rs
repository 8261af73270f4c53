use anyhow::{Context, Result};
use serde::Deserialize;

use crate::projection::{LngLat, Viewport};

/// Environment variable overriding [`MapConfig::stations_source`].
pub const STATIONS_ENV: &str = "BIKEWATCH_STATIONS";
/// Environment variable overriding [`MapConfig::trips_source`].
pub const TRIPS_ENV: &str = "BIKEWATCH_TRIPS";

/// A named GeoJSON source for a decorative route layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteSource {
    pub name: String,
    pub source: String,
}

/// Map and data-source settings.
///
/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// {
///   "center": { "lon": -71.0589, "lat": 42.3601 },
///   "zoom": 12,
///   "stations_source": "https://example.org/stations.json",
///   "routes": [{ "name": "boston", "source": "data/boston.geojson" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: LngLat,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub width: f64,
    pub height: f64,
    pub stations_source: String,
    pub trips_source: String,
    pub routes: Vec<RouteSource>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LngLat {
                lon: -71.0589,
                lat: 42.3601,
            },
            zoom: 12.0,
            min_zoom: 5.0,
            max_zoom: 18.0,
            width: 1024.0,
            height: 768.0,
            stations_source: "data/bluebikes-stations.json".to_string(),
            trips_source: "data/bluebikes-traffic.csv".to_string(),
            routes: vec![
                RouteSource {
                    name: "boston".to_string(),
                    source: "data/boston-bike-network.geojson".to_string(),
                },
                RouteSource {
                    name: "cambridge".to_string(),
                    source: "data/cambridge-bike-facilities.geojson".to_string(),
                },
            ],
        }
    }
}

impl MapConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        let config: MapConfig =
            serde_json::from_str(&content).with_context(|| format!("invalid config {path}"))?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults, then applies env overrides.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(source) = lookup(STATIONS_ENV) {
            self.stations_source = source;
        }
        if let Some(source) = lookup(TRIPS_ENV) {
            self.trips_source = source;
        }
        self
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.center, self.zoom, self.width, self.height)
            .with_zoom_bounds(self.min_zoom, self.max_zoom)
    }
}
