//! SVG rendition of the map overlay.

use anyhow::Result;
use std::fmt::Write;

use crate::binder::{LinePath, Marker, Overlay};

const MARKER_FILL: &str = "steelblue";
const MARKER_FILL_OPACITY: f64 = 0.6;
const MARKER_STROKE: &str = "white";
const ANY_TIME_LABEL: &str = "(any time)";

/// Keeps the most recently bound markers, lines and label, and renders
/// them as a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgOverlay {
    markers: Vec<Marker>,
    lines: Vec<LinePath>,
    label: Option<String>,
}

impl SvgOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn lines(&self) -> &[LinePath] {
        &self.lines
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn render(&self, width: f64, height: f64) -> Result<String> {
        let mut out = String::new();
        self.write_document(&mut out, width, height)?;
        Ok(out)
    }

    fn write_document(&self, out: &mut String, width: f64, height: f64) -> std::fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )?;

        writeln!(out, r#"  <g class="routes" fill="none">"#)?;
        for line in &self.lines {
            let points = line
                .points
                .iter()
                .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                out,
                r#"    <polyline data-layer="{}" points="{}" stroke="{}" stroke-width="{}" stroke-opacity="{}"/>"#,
                escape(&line.layer),
                points,
                escape(&line.style.color),
                line.style.width,
                line.style.opacity
            )?;
        }
        writeln!(out, "  </g>")?;

        writeln!(
            out,
            r#"  <g class="stations" fill="{MARKER_FILL}" fill-opacity="{MARKER_FILL_OPACITY}" stroke="{MARKER_STROKE}">"#
        )?;
        for m in &self.markers {
            writeln!(
                out,
                r#"    <circle data-id="{}" cx="{:.2}" cy="{:.2}" r="{:.2}"><title>{}</title></circle>"#,
                escape(&m.id),
                m.center.x,
                m.center.y,
                m.radius,
                escape(&m.tooltip)
            )?;
        }
        writeln!(out, "  </g>")?;

        let label = self.label.as_deref().unwrap_or(ANY_TIME_LABEL);
        writeln!(
            out,
            r#"  <text class="time-label" x="10" y="24">{}</text>"#,
            escape(label)
        )?;
        writeln!(out, "</svg>")
    }
}

impl Overlay for SvgOverlay {
    fn update_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    fn update_lines(&mut self, lines: Vec<LinePath>) {
        self.lines = lines;
    }

    fn update_label(&mut self, label: Option<&str>) {
        self.label = label.map(str::to_string);
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::LineStyle;
    use crate::projection::ScreenPoint;

    fn marker(id: &str) -> Marker {
        Marker {
            id: id.to_string(),
            center: ScreenPoint { x: 10.0, y: 20.5 },
            radius: 4.0,
            tooltip: "3 trips (2 departures, 1 arrivals)".to_string(),
        }
    }

    #[test]
    fn test_render_circles_with_tooltips() {
        let mut overlay = SvgOverlay::new();
        overlay.update_markers(vec![marker("A"), marker("B")]);

        let svg = overlay.render(800.0, 600.0).unwrap();

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(r#"cx="10.00" cy="20.50" r="4.00""#));
        assert!(svg.contains("<title>3 trips (2 departures, 1 arrivals)</title>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_label_defaults_to_any_time() {
        let mut overlay = SvgOverlay::new();
        assert!(overlay.render(1.0, 1.0).unwrap().contains("(any time)"));

        overlay.update_label(Some("2:00 PM"));
        let svg = overlay.render(1.0, 1.0).unwrap();
        assert!(svg.contains(">2:00 PM</text>"));
        assert!(!svg.contains("(any time)"));
    }

    #[test]
    fn test_render_lines() {
        let mut overlay = SvgOverlay::new();
        overlay.update_lines(vec![LinePath {
            layer: "cambridge".to_string(),
            points: vec![ScreenPoint { x: 0.0, y: 0.0 }, ScreenPoint { x: 5.0, y: 5.0 }],
            style: LineStyle::default(),
        }]);

        let svg = overlay.render(10.0, 10.0).unwrap();
        assert!(svg.contains(r#"points="0.00,0.00 5.00,5.00""#));
        assert!(svg.contains(r##"stroke="#32D400""##));
    }

    #[test]
    fn test_escapes_text() {
        assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
