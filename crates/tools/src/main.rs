use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::math::GeoPoint;
use journey::JourneyConfig;
use serde::Serialize;
use tools::{distance_report, parse_geo_point, plan_report, simulate};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inspect bridge journeys toward the reference city.
#[derive(Parser)]
#[command(name = "journey")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON config overriding the built-in parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out bridge segments from HOME to the reference city.
    Plan {
        /// Home city as LAT,LNG.
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        home: GeoPoint,

        /// Number of segments to emit; defaults to the full route.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Great-circle distance from HOME to the reference city.
    Distance {
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        home: GeoPoint,
    },
    /// Step through every milestone with a locked camera.
    Simulate {
        #[arg(long, value_parser = parse_geo_point, allow_hyphen_values = true)]
        home: GeoPoint,

        #[arg(long, default_value = "600")]
        frames: u64,

        /// Frames between "next" presses.
        #[arg(long, default_value = "60")]
        frames_per_milestone: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading journey config");
            JourneyConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => JourneyConfig::default(),
    };

    match cli.command {
        Commands::Plan { home, count } => print_json(&plan_report(&config, home, count)),
        Commands::Distance { home } => print_json(&distance_report(&config, home)),
        Commands::Simulate {
            home,
            frames,
            frames_per_milestone,
        } => print_json(&simulate(&config, home, frames, frames_per_milestone)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}
