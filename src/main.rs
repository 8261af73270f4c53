//! CLI entry point for bikewatch.
//!
//! Loads bike-share stations and trip history, sizes each station by the
//! traffic inside the selected time window, and renders the map overlay as
//! SVG or exports the per-station counts.

use anyhow::{Context, Result};
use bikewatch::{
    config::MapConfig,
    controller::{AppEvent, MapSession, load_session},
    fetch::BasicClient,
    output::{print_json, write_svg, write_traffic_csv},
    script::parse_script,
    svg::SvgOverlay,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikewatch")]
#[command(about = "Bike-share station traffic by time of day", long_about = None)]
struct Cli {
    /// JSON file with map and data-source settings
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the station map as an SVG file
    Render {
        /// Minute of day to filter on, or -1 for any time
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        filter: i32,

        /// SVG file to write
        #[arg(short, long, default_value = "map.svg")]
        output: String,
    },
    /// Export per-station arrivals and departures as CSV
    Traffic {
        /// Minute of day to filter on, or -1 for any time
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        filter: i32,

        /// CSV file to write
        #[arg(short, long, default_value = "traffic.csv")]
        output: String,

        /// Also log the rows as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay a script of slider and map events, writing one SVG frame per event
    Replay {
        /// Script file (one command per line)
        #[arg(value_name = "SCRIPT")]
        script: String,

        /// Directory to write frames into
        #[arg(short = 'd', long, default_value = "frames")]
        output_dir: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikewatch.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikewatch.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = MapConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { filter, output } => {
            let mut session = start_session(&config).await;
            session.on_slider_input(filter)?;

            let (width, height) = session.viewport().size();
            write_svg(Path::new(&output), &session.overlay().render(width, height)?)?;
            info!(output, stations = session.rows().len(), "Map rendered");
        }
        Commands::Traffic {
            filter,
            output,
            json,
        } => {
            let mut session = start_session(&config).await;
            session.on_slider_input(filter)?;

            write_traffic_csv(&output, session.rows())?;
            if json {
                print_json(session.rows())?;
            }
            info!(output, stations = session.rows().len(), "Traffic exported");
        }
        Commands::Replay { script, output_dir } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("failed to read script {script}"))?;
            let events = parse_script(&text)?;
            replay(&config, events, Path::new(&output_dir)).await?;
        }
    }

    Ok(())
}

async fn start_session(config: &MapConfig) -> MapSession<SvgOverlay> {
    load_session(config, Arc::new(BasicClient::new()), SvgOverlay::new()).await
}

/// Writes the initial frame, then one frame after every scripted event.
/// A rejected event is logged and the previous state is rendered again.
#[tracing::instrument(skip(config, events), fields(events = events.len()))]
async fn replay(config: &MapConfig, events: Vec<AppEvent>, output_dir: &Path) -> Result<()> {
    let mut session = start_session(config).await;

    let frame_path = |n: usize| -> PathBuf { output_dir.join(format!("frame-{n:03}.svg")) };
    let render = |session: &MapSession<SvgOverlay>| {
        let (width, height) = session.viewport().size();
        session.overlay().render(width, height)
    };

    write_svg(&frame_path(0), &render(&session)?)?;

    for (i, event) in events.into_iter().enumerate() {
        if let Err(e) = session.dispatch(event) {
            warn!(frame = i + 1, error = %e, "Event rejected");
        }
        write_svg(&frame_path(i + 1), &render(&session)?)?;
    }

    info!(output_dir = %output_dir.display(), "Replay finished");
    Ok(())
}
