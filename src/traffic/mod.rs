//! Time-windowed traffic aggregation and marker sizing.
//!
//! [`aggregate`] counts arrivals and departures per station for the trips
//! that match a [`TimeFilter`](crate::filter::TimeFilter), and
//! [`RadiusScale`] turns those counts into marker radii.

pub mod aggregate;
pub mod scale;

pub use aggregate::{aggregate, station_traffic};
pub use scale::{RadiusScale, radius_for};
