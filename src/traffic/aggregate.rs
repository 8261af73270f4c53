use crate::filter::TimeFilter;
use crate::model::{Station, StationTraffic, Traffic, Trip};
use crate::time_format::minutes_since_midnight;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Whether either end of `trip` falls inside the filter window.
///
/// A timestamp that failed to parse never matches on its own side.
pub fn trip_matches(trip: &Trip, filter: TimeFilter) -> bool {
    if !filter.is_active() {
        return true;
    }

    let side_matches = |ts: &Option<NaiveDateTime>| {
        ts.as_ref()
            .is_some_and(|ts| filter.matches(minutes_since_midnight(ts)))
    };

    side_matches(&trip.started_at) || side_matches(&trip.ended_at)
}

/// Counts departures (by start station) and arrivals (by end station) over
/// the trips matching `filter`.
///
/// Stations that no matching trip touches are absent from the map; use
/// [`station_traffic`] to get a zero-filled row per known station.
pub fn aggregate(trips: &[Trip], filter: TimeFilter) -> HashMap<String, Traffic> {
    let mut counts: HashMap<String, Traffic> = HashMap::new();

    for trip in trips.iter().filter(|t| trip_matches(t, filter)) {
        counts
            .entry(trip.start_station_id.clone())
            .or_default()
            .departures += 1;
        counts
            .entry(trip.end_station_id.clone())
            .or_default()
            .arrivals += 1;
    }

    counts
}

/// Joins aggregated counts onto the station list, in station order.
pub fn station_traffic(
    stations: &[Station],
    counts: &HashMap<String, Traffic>,
) -> Vec<StationTraffic> {
    stations
        .iter()
        .map(|station| StationTraffic {
            station: station.clone(),
            traffic: counts
                .get(&station.short_name)
                .copied()
                .unwrap_or_default(),
        })
        .collect()
}
