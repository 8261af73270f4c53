//! Decorative bike-route layers drawn beneath the station markers.

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};

use crate::binder::LineStyle;
use crate::projection::LngLat;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayer {
    pub name: String,
    pub lines: Vec<Vec<LngLat>>,
    pub style: LineStyle,
}

impl RouteLayer {
    /// Builds a layer from the line geometries in a GeoJSON document.
    /// Points and polygons are ignored.
    pub fn from_geojson(name: &str, bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).context("route source is not UTF-8")?;
        let geojson: GeoJson = text
            .parse()
            .with_context(|| format!("invalid GeoJSON for route layer {name}"))?;

        let mut lines = Vec::new();
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in fc.features {
                    if let Some(geometry) = feature.geometry {
                        collect_lines(&geometry, &mut lines);
                    }
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(geometry) = feature.geometry {
                    collect_lines(&geometry, &mut lines);
                }
            }
            GeoJson::Geometry(geometry) => collect_lines(&geometry, &mut lines),
        }

        Ok(Self {
            name: name.to_string(),
            lines,
            style: LineStyle::default(),
        })
    }
}

fn collect_lines(geometry: &Geometry, out: &mut Vec<Vec<LngLat>>) {
    match &geometry.value {
        Value::LineString(line) => out.push(to_points(line)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(|l| to_points(l))),
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_lines(g, out);
            }
        }
        _ => {}
    }
}

fn to_points(line: &[Vec<f64>]) -> Vec<LngLat> {
    line.iter()
        .filter_map(|pos| match pos.as_slice() {
            [lon, lat, ..] => Some(LngLat {
                lon: *lon,
                lat: *lat,
            }),
            _ => None,
        })
        .collect()
}
