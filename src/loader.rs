//! Station metadata and trip history loaders.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::fetch::{HttpClient, load_source};
use crate::model::{Station, Trip};
use crate::routes::RouteLayer;
use crate::time_format::parse_timestamp;

/// Station documents come either wrapped as `{"data": {"stations": [...]}}`
/// or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StationDocument {
    Wrapped { data: StationList },
    Bare(Vec<Station>),
}

#[derive(Deserialize)]
struct StationList {
    stations: Vec<Station>,
}

/// One row of the trip history CSV. Other columns are ignored.
#[derive(Debug, Deserialize)]
struct TripRecord {
    start_station_id: String,
    end_station_id: String,
    started_at: String,
    ended_at: String,
}

impl From<TripRecord> for Trip {
    fn from(r: TripRecord) -> Self {
        Trip {
            started_at: parse_timestamp(&r.started_at),
            ended_at: parse_timestamp(&r.ended_at),
            start_station_id: r.start_station_id,
            end_station_id: r.end_station_id,
        }
    }
}

pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let doc: StationDocument =
        serde_json::from_slice(bytes).context("station document is not in a known shape")?;
    Ok(match doc {
        StationDocument::Wrapped { data } => data.stations,
        StationDocument::Bare(stations) => stations,
    })
}

/// Parses trip history CSV. Rows that do not fit the expected columns are
/// skipped with a warning; unparseable timestamps are kept as `None`.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<Trip>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    // fail fast when the header is missing a required column
    let headers = rdr.headers().context("trip CSV has no header row")?.clone();
    for column in ["start_station_id", "end_station_id", "started_at", "ended_at"] {
        if !headers.iter().any(|h| h == column) {
            anyhow::bail!("trip CSV is missing column {column}");
        }
    }

    let mut trips = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.deserialize::<TripRecord>() {
        match result {
            Ok(record) => trips.push(record.into()),
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "Skipping malformed trip row");
            }
        }
    }

    let bad_timestamps = trips
        .iter()
        .filter(|t: &&Trip| t.started_at.is_none() || t.ended_at.is_none())
        .count();
    info!(
        trips = trips.len(),
        skipped, bad_timestamps, "Trip history parsed"
    );

    Ok(trips)
}

#[tracing::instrument(skip(client))]
pub async fn load_stations<C: HttpClient>(client: &C, source: &str) -> Result<Vec<Station>> {
    let bytes = load_source(client, source).await?;
    let stations = parse_stations(&bytes)?;
    info!(stations = stations.len(), "Stations loaded");
    Ok(stations)
}

#[tracing::instrument(skip(client))]
pub async fn load_trips<C: HttpClient>(client: &C, source: &str) -> Result<Vec<Trip>> {
    let bytes = load_source(client, source).await?;
    parse_trips(&bytes)
}

#[tracing::instrument(skip(client))]
pub async fn load_route_layer<C: HttpClient>(
    client: &C,
    name: &str,
    source: &str,
) -> Result<RouteLayer> {
    let bytes = load_source(client, source).await?;
    let layer = RouteLayer::from_geojson(name, &bytes)?;
    info!(lines = layer.lines.len(), "Route layer loaded");
    Ok(layer)
}
