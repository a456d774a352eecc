//! Fahrplan CLI
//!
//! Manual test driver: issues HTTP requests against a running REST
//! façade instance and reports colorized pass/fail per endpoint.

#![allow(clippy::print_stdout)]

mod checks;

use clap::{Parser, Subcommand};

use crate::checks::ApiChecker;

/// Fahrplan API test driver
#[derive(Parser)]
#[command(name = "fahrplan-cli")]
#[command(author, version, about = "Manual test driver for the Fahrplan REST API", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(short, long, global = true, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the health endpoint
    Health,

    /// Stations within a radius
    Stations {
        /// Latitude of the search center
        #[arg(long, default_value_t = 47.999)]
        lat: f64,

        /// Longitude of the search center
        #[arg(long, default_value_t = 7.842)]
        lon: f64,

        /// Radius in meters
        #[arg(long, default_value_t = 1000)]
        radius: u32,

        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Search stations by name
    Search {
        /// Search term
        #[arg(default_value = "Freiburg")]
        query: String,

        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Nearest station to a point
    Nearest {
        /// Latitude
        #[arg(long, default_value_t = 47.999)]
        lat: f64,

        /// Longitude
        #[arg(long, default_value_t = 7.842)]
        lon: f64,
    },

    /// Departures for a station
    Departures {
        /// Station id, e.g. "8000107"
        #[arg(default_value = "8000107")]
        station: String,

        /// Board start time (ISO-8601)
        #[arg(long)]
        time: Option<String>,

        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Plan a route between two stations
    Route {
        /// Origin station id
        #[arg(long = "from", default_value = "8000107")]
        origin: String,

        /// Destination station id
        #[arg(long = "to", default_value = "8000105")]
        destination: String,

        /// Departure time (ISO-8601)
        #[arg(long)]
        time: Option<String>,

        /// Maximum number of route options
        #[arg(long, default_value_t = 3)]
        limit: u32,
    },

    /// Run the whole check suite
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let checker = ApiChecker::new(&cli.url)?;

    let ok = match cli.command {
        Commands::Health => checker.check_health().await,
        Commands::Stations {
            lat,
            lon,
            radius,
            limit,
        } => checker.check_stations(lat, lon, radius, limit).await,
        Commands::Search { query, limit } => checker.check_search(&query, limit).await,
        Commands::Nearest { lat, lon } => checker.check_nearest(lat, lon).await,
        Commands::Departures {
            station,
            time,
            limit,
        } => {
            checker
                .check_departures(&station, time.as_deref(), limit)
                .await
        }
        Commands::Route {
            origin,
            destination,
            time,
            limit,
        } => {
            checker
                .check_route(&origin, &destination, time.as_deref(), limit)
                .await
        }
        Commands::All => {
            let summary = checker.run_all().await;
            summary.print();
            summary.failed == 0
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
