//! Data types shared by the loader, the aggregator and the view binder.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A bike-share dock location, identified by its short name.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Station {
    #[serde(alias = "Number")]
    pub short_name: String,
    #[serde(rename = "lon", alias = "Long")]
    pub longitude: f64,
    #[serde(rename = "lat", alias = "Lat")]
    pub latitude: f64,
}

impl Station {
    pub fn new(short_name: &str, longitude: f64, latitude: f64) -> Self {
        Self {
            short_name: short_name.to_string(),
            longitude,
            latitude,
        }
    }
}

/// One rental. A timestamp that failed to parse is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
}

/// Arrival and departure counts for one station.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Traffic {
    pub arrivals: usize,
    pub departures: usize,
}

impl Traffic {
    pub fn total(&self) -> usize {
        self.arrivals + self.departures
    }
}

/// A station together with its traffic under the current time filter.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTraffic {
    pub station: Station,
    pub traffic: Traffic,
}

impl StationTraffic {
    pub fn total_traffic(&self) -> usize {
        self.traffic.total()
    }

    /// Hover text shown on the station marker.
    pub fn tooltip(&self) -> String {
        format!(
            "{} trips ({} departures, {} arrivals)",
            self.total_traffic(),
            self.traffic.departures,
            self.traffic.arrivals
        )
    }
}

/// Flat row written to CSV / JSON output.
#[derive(Debug, Serialize)]
pub struct TrafficRecord<'a> {
    pub short_name: &'a str,
    pub longitude: f64,
    pub latitude: f64,
    pub arrivals: usize,
    pub departures: usize,
    pub total_traffic: usize,
}

impl<'a> From<&'a StationTraffic> for TrafficRecord<'a> {
    fn from(row: &'a StationTraffic) -> Self {
        TrafficRecord {
            short_name: &row.station.short_name,
            longitude: row.station.longitude,
            latitude: row.station.latitude,
            arrivals: row.traffic.arrivals,
            departures: row.traffic.departures,
            total_traffic: row.total_traffic(),
        }
    }
}
