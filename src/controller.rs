//! The map session: owns stations, trips, the time filter and the viewport,
//! and re-binds the overlay on every event.
//!
//! Events are applied one at a time through `&mut self`; each runs to
//! completion (aggregation and binding included) before the next.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::binder::{Overlay, bind, bind_routes};
use crate::config::MapConfig;
use crate::fetch::HttpClient;
use crate::filter::TimeFilter;
use crate::loader::{load_route_layer, load_stations, load_trips};
use crate::model::{Station, StationTraffic, Trip};
use crate::projection::{MapEvent, Viewport};
use crate::routes::RouteLayer;
use crate::time_format::format_time;
use crate::traffic::{aggregate, station_traffic};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

impl LoadState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoadState::Pending)
    }
}

/// Tracks the two startup loads. Aggregation is allowed once both have
/// either succeeded or failed, in whichever order they finish.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DataGate {
    pub stations: LoadState,
    pub trips: LoadState,
}

impl DataGate {
    pub fn is_open(&self) -> bool {
        self.stations.is_settled() && self.trips.is_settled()
    }
}

/// Everything the host event loop can deliver to the session.
#[derive(Debug)]
pub enum AppEvent {
    StationsLoaded(Result<Vec<Station>>),
    TripsLoaded(Result<Vec<Trip>>),
    RouteLoaded(Result<RouteLayer>),
    Slider(i32),
    Map(MapEvent),
}

pub struct MapSession<O: Overlay> {
    stations: Vec<Station>,
    trips: Vec<Trip>,
    filter: TimeFilter,
    label: Option<String>,
    gate: DataGate,
    rows: Vec<StationTraffic>,
    routes: Vec<RouteLayer>,
    viewport: Viewport,
    overlay: O,
}

impl<O: Overlay> MapSession<O> {
    /// Starts unfiltered with no data and binds the (empty) view.
    pub fn new(viewport: Viewport, overlay: O) -> Self {
        let mut session = Self {
            stations: Vec::new(),
            trips: Vec::new(),
            filter: TimeFilter::Any,
            label: None,
            gate: DataGate::default(),
            rows: Vec::new(),
            routes: Vec::new(),
            viewport,
            overlay,
        };
        session.overlay.update_label(None);
        session.refresh();
        session
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    /// Selected time as shown next to the slider; `None` means any time.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn gate(&self) -> DataGate {
        self.gate
    }

    /// Per-station traffic for the current filter. Empty until the data gate opens.
    pub fn rows(&self) -> &[StationTraffic] {
        &self.rows
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn dispatch(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::StationsLoaded(result) => self.on_stations_loaded(result),
            AppEvent::TripsLoaded(result) => self.on_trips_loaded(result),
            AppEvent::RouteLoaded(result) => self.on_route_loaded(result),
            AppEvent::Slider(value) => return self.on_slider_input(value),
            AppEvent::Map(event) => self.on_map_event(event),
        }
        Ok(())
    }

    pub fn on_stations_loaded(&mut self, result: Result<Vec<Station>>) {
        match result {
            Ok(stations) => {
                info!(count = stations.len(), "Stations ready");
                self.stations = stations;
                self.gate.stations = LoadState::Loaded;
            }
            Err(e) => {
                error!(error = %e, "Station load failed");
                self.stations.clear();
                self.gate.stations = LoadState::Failed;
            }
        }
        self.refresh();
    }

    pub fn on_trips_loaded(&mut self, result: Result<Vec<Trip>>) {
        match result {
            Ok(trips) => {
                info!(count = trips.len(), "Trips ready");
                self.trips = trips;
                self.gate.trips = LoadState::Loaded;
            }
            Err(e) => {
                error!(error = %e, "Trip load failed");
                self.trips.clear();
                self.gate.trips = LoadState::Failed;
            }
        }
        self.refresh();
    }

    pub fn on_route_loaded(&mut self, result: Result<RouteLayer>) {
        match result {
            Ok(layer) => {
                info!(layer = %layer.name, lines = layer.lines.len(), "Route layer added");
                self.routes.push(layer);
                bind_routes(&self.routes, &self.viewport, &mut self.overlay);
            }
            Err(e) => error!(error = %e, "Route layer load failed"),
        }
    }

    /// Applies a raw slider value (`-1` or `0..=1439`). Out-of-range values
    /// are rejected and leave the session unchanged.
    pub fn on_slider_input(&mut self, value: i32) -> Result<()> {
        let filter = TimeFilter::from_slider(value)?;
        self.set_filter(filter);
        Ok(())
    }

    pub fn set_filter(&mut self, filter: TimeFilter) {
        self.filter = filter;
        self.label = match filter {
            TimeFilter::Any => None,
            TimeFilter::At(minute) => Some(format_time(minute)),
        };
        debug!(label = ?self.label, "Time filter changed");
        self.overlay.update_label(self.label.as_deref());
        self.refresh();
    }

    /// Viewport changes only move markers and lines; traffic is unchanged.
    pub fn on_map_event(&mut self, event: MapEvent) {
        self.viewport.apply(event);
        debug!(?event, zoom = self.viewport.zoom(), "Viewport changed");
        self.rebind();
    }

    /// Re-aggregates the full trip set under the current filter and re-binds.
    fn refresh(&mut self) {
        self.rows = if self.gate.is_open() {
            let counts = aggregate(&self.trips, self.filter);
            station_traffic(&self.stations, &counts)
        } else {
            Vec::new()
        };
        self.rebind();
    }

    fn rebind(&mut self) {
        bind(
            &self.rows,
            &self.viewport,
            self.filter.is_active(),
            &mut self.overlay,
        );
        bind_routes(&self.routes, &self.viewport, &mut self.overlay);
    }
}

/// Creates an unfiltered session, then loads stations, trips and route
/// layers concurrently. Each result is applied in the order it arrives;
/// a failed load is logged by the session and leaves that data empty.
pub async fn load_session<C, O>(config: &MapConfig, client: Arc<C>, overlay: O) -> MapSession<O>
where
    C: HttpClient + 'static,
    O: Overlay,
{
    let mut session = MapSession::new(config.viewport(), overlay);
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    {
        let (client, tx, source) = (client.clone(), tx.clone(), config.stations_source.clone());
        tokio::spawn(async move {
            let result = load_stations(client.as_ref(), &source).await;
            let _ = tx.send(AppEvent::StationsLoaded(result));
        });
    }

    {
        let (client, tx, source) = (client.clone(), tx.clone(), config.trips_source.clone());
        tokio::spawn(async move {
            let result = load_trips(client.as_ref(), &source).await;
            let _ = tx.send(AppEvent::TripsLoaded(result));
        });
    }

    for route in &config.routes {
        let (client, tx, route) = (client.clone(), tx.clone(), route.clone());
        tokio::spawn(async move {
            let result = load_route_layer(client.as_ref(), &route.name, &route.source).await;
            let _ = tx.send(AppEvent::RouteLoaded(result));
        });
    }

    drop(tx);

    while let Some(event) = rx.recv().await {
        if let Err(e) = session.dispatch(event) {
            warn!(error = %e, "Load event rejected");
        }
    }

    info!(
        stations = ?session.gate().stations,
        trips = ?session.gate().trips,
        "Startup loads settled"
    );
    session
}
