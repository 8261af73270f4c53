//! Output formatting and persistence for station traffic and rendered frames.
//!
//! Supports JSON logging, CSV export and SVG frames.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::model::{StationTraffic, TrafficRecord};
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// Logs station traffic as pretty-printed JSON.
pub fn print_json(rows: &[StationTraffic]) -> Result<()> {
    let records: Vec<TrafficRecord> = rows.iter().map(TrafficRecord::from).collect();
    info!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Writes one CSV row per station, replacing any existing file.
pub fn write_traffic_csv(path: &str, rows: &[StationTraffic]) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(TrafficRecord::from(row))?;
    }
    writer.flush()?;

    debug!(path, rows = rows.len(), "Traffic CSV written");
    Ok(())
}

pub fn write_svg(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = document.len(), "SVG frame written");
    Ok(())
}

fn create_parent(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Station, Traffic};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn rows() -> Vec<StationTraffic> {
        vec![
            StationTraffic {
                station: Station::new("A", -71.06, 42.36),
                traffic: Traffic {
                    arrivals: 2,
                    departures: 3,
                },
            },
            StationTraffic {
                station: Station::new("B", -71.09, 42.35),
                traffic: Traffic::default(),
            },
        ]
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&rows()).unwrap();
    }

    #[test]
    fn test_write_traffic_csv() {
        let path = temp_path("bikewatch_test_traffic.csv");
        let _ = fs::remove_file(&path);

        write_traffic_csv(&path, &rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "short_name,longitude,latitude,arrivals,departures,total_traffic"
        );
        assert_eq!(lines[1], "A,-71.06,42.36,2,3,5");
        assert_eq!(lines[2], "B,-71.09,42.35,0,0,0");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_traffic_csv_overwrites() {
        let path = temp_path("bikewatch_test_traffic_overwrite.csv");

        write_traffic_csv(&path, &rows()).unwrap();
        write_traffic_csv(&path, &rows()[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_svg_creates_directories() {
        let dir = env::temp_dir().join("bikewatch_test_frames");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("frame-000.svg");

        write_svg(&path, "<svg></svg>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<svg></svg>");
        fs::remove_dir_all(&dir).unwrap();
    }
}
