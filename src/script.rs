//! Text scripts of user interactions, replayed against a session.
//!
//! One command per line; blank lines and `#` comments are ignored:
//!
//! ```text
//! slider 480
//! pan 120 -40
//! zoom 14
//! resize 1280 800
//! moveend
//! ```

use anyhow::{Context, Result, anyhow, bail};

use crate::controller::AppEvent;
use crate::projection::MapEvent;

/// Parses a single script line. Returns `None` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<AppEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let event = match (command, args.as_slice()) {
        ("slider", [v]) => AppEvent::Slider(parse_arg(v)?),
        ("pan", [dx, dy]) => AppEvent::Map(MapEvent::Move {
            dx: parse_arg(dx)?,
            dy: parse_arg(dy)?,
        }),
        ("zoom", [z]) => AppEvent::Map(MapEvent::Zoom { zoom: parse_arg(z)? }),
        ("resize", [w, h]) => AppEvent::Map(MapEvent::Resize {
            width: parse_arg(w)?,
            height: parse_arg(h)?,
        }),
        ("moveend", []) => AppEvent::Map(MapEvent::MoveEnd),
        ("slider" | "pan" | "zoom" | "resize" | "moveend", _) => {
            bail!("wrong number of arguments for {command}: {line:?}")
        }
        _ => return Err(anyhow!("unknown command {command:?}")),
    };

    Ok(Some(event))
}

fn parse_arg<T: std::str::FromStr>(raw: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("invalid argument {raw:?}"))
}

/// Parses a whole script, reporting the first bad line by number.
pub fn parse_script(text: &str) -> Result<Vec<AppEvent>> {
    let mut events = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(event) = parse_line(line).with_context(|| format!("script line {}", i + 1))? {
            events.push(event);
        }
    }
    Ok(events)
}
