//! Web Mercator viewport and the geo → pixel projection the overlay uses.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tile edge length in pixels at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude beyond which Web Mercator is undefined.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

/// Converts a geographic coordinate into a pixel position on the overlay.
pub trait Projector {
    fn project(&self, lon: f64, lat: f64) -> ScreenPoint;
}

/// Viewport changes reported by the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// The view was dragged by `dx`, `dy` pixels.
    Move { dx: f64, dy: f64 },
    Zoom { zoom: f64 },
    Resize { width: f64, height: f64 },
    /// A pan or zoom gesture finished.
    MoveEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    center: LngLat,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(center: LngLat, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            min_zoom: 0.0,
            max_zoom: 22.0,
            width,
            height,
        }
    }

    /// Sets the allowed zoom range and clamps the current zoom into it.
    pub fn with_zoom_bounds(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    fn to_world(&self, lon: f64, lat: f64) -> (f64, f64) {
        let ws = self.world_size();
        let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (lon + 180.0) / 360.0 * ws;
        let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * ws;
        (x, y)
    }

    fn from_world(&self, x: f64, y: f64) -> LngLat {
        let ws = self.world_size();
        let lon = x / ws * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y / ws)).sinh().atan().to_degrees();
        LngLat { lon, lat }
    }

    /// Inverse of [`Projector::project`].
    pub fn unproject(&self, point: ScreenPoint) -> LngLat {
        let (cx, cy) = self.to_world(self.center.lon, self.center.lat);
        self.from_world(
            point.x - self.width / 2.0 + cx,
            point.y - self.height / 2.0 + cy,
        )
    }

    /// Moves the view so the pixel at (`dx`, `dy`) from the centre becomes the centre.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.center = self.unproject(ScreenPoint {
            x: self.width / 2.0 + dx,
            y: self.height / 2.0 + dy,
        });
    }

    pub fn zoom_to(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn apply(&mut self, event: MapEvent) {
        match event {
            MapEvent::Move { dx, dy } => self.pan_by(dx, dy),
            MapEvent::Zoom { zoom } => self.zoom_to(zoom),
            MapEvent::Resize { width, height } => self.resize(width, height),
            MapEvent::MoveEnd => {}
        }
    }
}

impl Projector for Viewport {
    fn project(&self, lon: f64, lat: f64) -> ScreenPoint {
        let (cx, cy) = self.to_world(self.center.lon, self.center.lat);
        let (x, y) = self.to_world(lon, lat);
        ScreenPoint {
            x: x - cx + self.width / 2.0,
            y: y - cy + self.height / 2.0,
        }
    }
}
