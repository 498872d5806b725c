//! Geonav Coordinate Tool
//!
//! This binary runs points through the map and transect transforms and
//! reports how many steps an animated view change would take.
//!
//! Usage:
//!   cargo run --bin geonav -- map --point 40.0,-105.3,1600
//!   cargo run --bin geonav -- map --point 40.0,-105.3 --mercator -100
//!   cargo run --bin geonav -- transect --line "39,-110 38,-107 41,-105" --point 39.5,-108
//!   cargo run --bin geonav -- steps --displacement 2.5

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geonav::navigation::step_count;
use geonav::{
    CoordinateAdapter, GeographicPoint, LatLonProjection, MapArea, MercatorProjection,
    NavigatorConfig, Projection, Transect, TransectProjector,
};
use tracing_subscriber::EnvFilter;

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Geonav coordinate tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Converts points between geographic and display coordinates",
    long_about = None
)]
struct Args {
    /// JSON navigator configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a point to map display coordinates and back
    Map {
        /// Point as LAT,LON[,ALT]
        #[arg(long, allow_hyphen_values = true)]
        point: String,

        /// Lat/lon map area as X,Y,WIDTH,HEIGHT (degrees)
        #[arg(long, allow_hyphen_values = true)]
        area: Option<String>,

        /// Use a Mercator projection with this central meridian
        #[arg(long, allow_negative_numbers = true, conflicts_with = "area")]
        mercator: Option<f64>,
    },

    /// Project a point onto a transect and back
    Transect {
        /// Space separated LAT,LON pairs
        #[arg(long, allow_hyphen_values = true)]
        line: String,

        /// Point as LAT,LON[,ALT]
        #[arg(long, allow_hyphen_values = true)]
        point: String,

        /// Cross-track culling distance in kilometers
        #[arg(long)]
        max_cross_track: Option<f64>,
    },

    /// Report the animation step count for a displacement
    Steps {
        /// Largest on-screen displacement in display units
        #[arg(long)]
        displacement: f64,
    },
}

/// Parses a comma separated list of numbers
fn parse_values(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {}", v.trim(), e).into())
        })
        .collect()
}

fn parse_point(text: &str) -> Result<GeographicPoint> {
    Ok(GeographicPoint::try_from(parse_values(text)?.as_slice())?)
}

fn parse_line(text: &str) -> Result<Transect> {
    let points = text
        .split_whitespace()
        .map(parse_point)
        .collect::<Result<Vec<_>>>()?;
    Ok(Transect::new(points)?)
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

fn run_map<P: Projection>(
    projection: P,
    point: &GeographicPoint,
    config: &NavigatorConfig,
) -> Result<()> {
    let adapter = CoordinateAdapter::new(projection)?.with_vertical_scale(config.vertical.scale()?);

    print_section_header("Map transform");
    println!("Projection:      {:?}", adapter.projection());
    println!("Longitude mode:  {:?}", adapter.longitude_mode());
    println!("Input:           {}", point);

    let display = adapter.to_display(point);
    println!(
        "Display:         x {:.6}, y {:.6}, z {:.6}",
        display.x, display.y, display.z
    );
    println!("Round trip:      {}", adapter.to_geographic(&display));
    Ok(())
}

fn run_transect(
    transect: Transect,
    point: &GeographicPoint,
    max_cross_track: Option<f64>,
    config: &NavigatorConfig,
) -> Result<()> {
    let mut projector = TransectProjector::new(transect).with_config(&config.transect);
    let limit = max_cross_track.unwrap_or_else(|| projector.max_cross_track_km());

    print_section_header("Transect");
    let geometry = projector.geometry();
    println!("Segments:        {}", geometry.segment_distances().len());
    println!("Total length:    {:.3} km", geometry.total_length());
    for (i, (bearing, distance)) in geometry
        .segment_bearings()
        .iter()
        .zip(geometry.segment_distances())
        .enumerate()
    {
        println!("  segment {:>3}: {:8.3} km at {:7.3}°", i, distance, bearing);
    }

    print_section_header("Projection");
    println!("Input:           {}", point);
    if let Some((segment, bearing)) = projector.closest_segment(point) {
        println!(
            "Closest segment: {} ({:.3} km at {:.3}°)",
            segment, bearing.distance, bearing.azimuth
        );
    }

    let display = projector.to_display(point, limit);
    if display.is_nan() {
        println!("Display:         off transect (limit {} km)", limit);
        return Ok(());
    }
    println!(
        "Display:         x {:.6}, y {:.1}, z {:.1}",
        display.x, display.y, display.z
    );
    println!("On line:         {}", projector.to_geographic(&display));
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => NavigatorConfig::from_json_file(path)?,
        None => NavigatorConfig::default(),
    };

    match args.command {
        Command::Map {
            point,
            area,
            mercator,
        } => {
            let point = parse_point(&point)?;
            match (mercator, area) {
                (Some(central_meridian), _) => {
                    run_map(MercatorProjection::new(central_meridian), &point, &config)?
                }
                (None, Some(area)) => {
                    let values = parse_values(&area)?;
                    let [x, y, width, height] = values[..] else {
                        return Err(format!("area needs 4 values, got {}", values.len()).into());
                    };
                    let projection = LatLonProjection::new(MapArea::new(x, y, width, height)?);
                    run_map(projection, &point, &config)?
                }
                (None, None) => run_map(LatLonProjection::world(), &point, &config)?,
            }
        }
        Command::Transect {
            line,
            point,
            max_cross_track,
        } => {
            let transect = parse_line(&line)?;
            let point = parse_point(&point)?;
            run_transect(transect, &point, max_cross_track, &config)?;
        }
        Command::Steps { displacement } => {
            let steps = step_count(displacement, &config.animation);
            println!(
                "{} steps ({} ms at {} ms per step)",
                steps,
                steps as u64 * config.animation.step_delay_ms,
                config.animation.step_delay_ms
            );
        }
    }

    Ok(())
}
