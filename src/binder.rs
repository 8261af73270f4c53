//! Binds per-station traffic to overlay markers.

use crate::model::StationTraffic;
use crate::projection::{Projector, ScreenPoint};
use crate::routes::RouteLayer;
use crate::traffic::RadiusScale;

/// One station circle as drawn on the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub center: ScreenPoint,
    pub radius: f64,
    pub tooltip: String,
}

/// Stroke style of a route layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "#32D400".to_string(),
            width: 5.0,
            opacity: 0.6,
        }
    }
}

/// A route layer projected into screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePath {
    pub layer: String,
    pub points: Vec<ScreenPoint>,
    pub style: LineStyle,
}

/// Surface that draws markers and route lines.
///
/// Each call replaces what the overlay showed before, keyed by marker id.
pub trait Overlay {
    fn update_markers(&mut self, markers: Vec<Marker>);
    fn update_lines(&mut self, lines: Vec<LinePath>);
    fn update_label(&mut self, label: Option<&str>);
}

/// Computes one marker per row. Radii are scaled against the busiest
/// station among `rows`.
pub fn markers(
    rows: &[StationTraffic],
    projector: &impl Projector,
    filter_active: bool,
) -> Vec<Marker> {
    let max_traffic = rows.iter().map(StationTraffic::total_traffic).max().unwrap_or(0);
    let scale = RadiusScale::new(max_traffic, filter_active);

    rows.iter()
        .map(|row| Marker {
            id: row.station.short_name.clone(),
            center: projector.project(row.station.longitude, row.station.latitude),
            radius: scale.radius(row.total_traffic()),
            tooltip: row.tooltip(),
        })
        .collect()
}

pub fn bind(
    rows: &[StationTraffic],
    projector: &impl Projector,
    filter_active: bool,
    overlay: &mut impl Overlay,
) {
    overlay.update_markers(markers(rows, projector, filter_active));
}

/// Re-projects every route layer and pushes them to the overlay.
pub fn bind_routes(layers: &[RouteLayer], projector: &impl Projector, overlay: &mut impl Overlay) {
    let lines = layers
        .iter()
        .flat_map(|layer| {
            layer.lines.iter().map(|line| LinePath {
                layer: layer.name.clone(),
                points: line
                    .iter()
                    .map(|p| projector.project(p.lon, p.lat))
                    .collect(),
                style: layer.style.clone(),
            })
        })
        .collect();
    overlay.update_lines(lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Station, Traffic};
    use crate::projection::LngLat;

    /// Maps degrees straight to pixels, scaled by 100.
    struct Flat;

    impl Projector for Flat {
        fn project(&self, lon: f64, lat: f64) -> ScreenPoint {
            ScreenPoint {
                x: lon * 100.0,
                y: lat * 100.0,
            }
        }
    }

    #[derive(Default)]
    struct Recording {
        markers: Vec<Marker>,
        lines: Vec<LinePath>,
        updates: usize,
    }

    impl Overlay for Recording {
        fn update_markers(&mut self, markers: Vec<Marker>) {
            self.markers = markers;
            self.updates += 1;
        }

        fn update_lines(&mut self, lines: Vec<LinePath>) {
            self.lines = lines;
        }

        fn update_label(&mut self, _label: Option<&str>) {}
    }

    fn row(id: &str, lon: f64, lat: f64, arrivals: usize, departures: usize) -> StationTraffic {
        StationTraffic {
            station: Station::new(id, lon, lat),
            traffic: Traffic {
                arrivals,
                departures,
            },
        }
    }

    #[test]
    fn test_bind_sets_position_radius_and_tooltip() {
        let rows = vec![row("A", 1.0, 2.0, 60, 40), row("B", 3.0, 4.0, 0, 25)];
        let mut overlay = Recording::default();

        bind(&rows, &Flat, false, &mut overlay);

        let a = &overlay.markers[0];
        assert_eq!(a.id, "A");
        assert_eq!(a.center, ScreenPoint { x: 100.0, y: 200.0 });
        assert_eq!(a.radius, 25.0);
        assert_eq!(a.tooltip, "100 trips (40 departures, 60 arrivals)");

        let b = &overlay.markers[1];
        assert_eq!(b.radius, 13.5);
    }

    #[test]
    fn test_filtered_markers_use_wider_range() {
        let rows = vec![row("A", 0.0, 0.0, 1, 0), row("B", 0.0, 0.0, 0, 0)];
        let m = markers(&rows, &Flat, true);

        assert_eq!(m[0].radius, 50.0);
        assert_eq!(m[1].radius, 3.0);
    }

    #[test]
    fn test_all_zero_traffic_uses_lower_bound() {
        let rows = vec![row("A", 0.0, 0.0, 0, 0), row("B", 0.0, 0.0, 0, 0)];

        assert!(markers(&rows, &Flat, false).iter().all(|m| m.radius == 2.0));
    }

    #[test]
    fn test_rebind_replaces_markers() {
        let mut overlay = Recording::default();
        bind(&[row("A", 0.0, 0.0, 1, 1)], &Flat, false, &mut overlay);
        bind(&[], &Flat, false, &mut overlay);

        assert!(overlay.markers.is_empty());
        assert_eq!(overlay.updates, 2);
    }

    #[test]
    fn test_bind_routes_projects_every_line() {
        let layers = vec![RouteLayer {
            name: "boston".to_string(),
            lines: vec![
                vec![LngLat { lon: 1.0, lat: 1.0 }, LngLat { lon: 2.0, lat: 1.0 }],
                vec![LngLat { lon: 3.0, lat: 3.0 }, LngLat { lon: 3.0, lat: 4.0 }],
            ],
            style: LineStyle::default(),
        }];
        let mut overlay = Recording::default();

        bind_routes(&layers, &Flat, &mut overlay);

        assert_eq!(overlay.lines.len(), 2);
        assert_eq!(overlay.lines[1].points[1], ScreenPoint { x: 300.0, y: 400.0 });
        assert_eq!(overlay.lines[0].layer, "boston");
    }
}
