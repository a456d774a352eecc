//! Endpoint checks with colorized reporting

#![allow(clippy::print_stdout)]

use std::time::Duration;

use serde_json::Value;

mod color {
    pub const HEADER: &str = "\x1b[95m";
    pub const BLUE: &str = "\x1b[94m";
    pub const CYAN: &str = "\x1b[96m";
    pub const GREEN: &str = "\x1b[92m";
    pub const RED: &str = "\x1b[91m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Aggregate result of the check suite
#[derive(Debug, Default)]
pub struct Summary {
    pub passed: u32,
    pub failed: u32,
}

impl Summary {
    fn record(&mut self, ok: bool) {
        if ok {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Print the final tally
    pub fn print(&self) {
        println!(
            "\n{}{}Summary: {} passed, {} failed{}",
            color::BOLD,
            if self.failed == 0 {
                color::GREEN
            } else {
                color::RED
            },
            self.passed,
            self.failed,
            color::RESET
        );
    }
}

/// Issues requests against a running REST façade
#[derive(Debug)]
pub struct ApiChecker {
    base_url: String,
    client: reqwest::Client,
}

impl ApiChecker {
    /// Create a checker for a server URL
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn print_header(text: &str) {
        let line = "=".repeat(60);
        println!("\n{}{}{}{}", color::BOLD, color::HEADER, line, color::RESET);
        println!("{}{}{:^60}{}", color::BOLD, color::HEADER, text, color::RESET);
        println!("{}{}{}{}\n", color::BOLD, color::HEADER, line, color::RESET);
    }

    fn print_success(text: &str) {
        println!("{}✓ {text}{}", color::GREEN, color::RESET);
    }

    fn print_error(text: &str) {
        println!("{}✗ {text}{}", color::RED, color::RESET);
    }

    fn print_info(label: &str, value: &str) {
        println!("  {}{label}:{} {value}", color::CYAN, color::RESET);
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> (bool, Value) {
        let url = format!("{}{path}", self.base_url);
        println!("{}→ GET {url}{}", color::BLUE, color::RESET);

        let response = self.client.get(&url).query(params).send().await;
        match response {
            Ok(response) => {
                let ok = response.status().as_u16() == 200;
                let body = response
                    .json::<Value>()
                    .await
                    .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }));
                (ok, body)
            }
            Err(e) => (false, serde_json::json!({ "error": e.to_string() })),
        }
    }

    pub async fn check_health(&self) -> bool {
        Self::print_header("Health Check");
        let (ok, data) = self.get_json("/api/health", &[]).await;

        if ok {
            Self::print_success("API is reachable");
            Self::print_info("Service", data["service"].as_str().unwrap_or("unknown"));
            true
        } else {
            Self::print_error(&format!("API unreachable: {}", error_of(&data)));
            false
        }
    }

    pub async fn check_stations(&self, lat: f64, lon: f64, radius: u32, limit: u32) -> bool {
        Self::print_header("Check: stations in radius");

        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("radius", radius.to_string()),
            ("limit", limit.to_string()),
        ];
        let (ok, data) = self.get_json("/api/stations", &params).await;

        if !ok {
            Self::print_error(&format!("Request failed: {}", error_of(&data)));
            return false;
        }

        Self::print_success(&format!("{} stations found", count_of(&data)));
        Self::print_info("Center", &format!("{lat}, {lon}"));
        Self::print_info("Radius", &format!("{radius}m"));

        println!("\n{}Stations:{}", color::BOLD, color::RESET);
        for station in data["stations"].as_array().into_iter().flatten().take(10) {
            println!(
                "  • {} (ID: {}) - {}m",
                station["name"].as_str().unwrap_or("?"),
                station["id"].as_str().unwrap_or("?"),
                station["distance_meters"].as_f64().unwrap_or(0.0)
            );
        }
        true
    }

    pub async fn check_search(&self, query: &str, limit: u32) -> bool {
        Self::print_header("Check: station search");

        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        let (ok, data) = self.get_json("/api/stations/search", &params).await;

        if !ok {
            Self::print_error(&format!("Request failed: {}", error_of(&data)));
            return false;
        }

        Self::print_success(&format!("{} stations found", count_of(&data)));
        Self::print_info("Query", query);

        println!("\n{}Results:{}", color::BOLD, color::RESET);
        for station in data["stations"].as_array().into_iter().flatten() {
            println!(
                "  • {} (ID: {})",
                station["name"].as_str().unwrap_or("?"),
                station["id"].as_str().unwrap_or("?")
            );
        }
        true
    }

    pub async fn check_nearest(&self, lat: f64, lon: f64) -> bool {
        Self::print_header("Check: nearest station");

        let params = [("lat", lat.to_string()), ("lon", lon.to_string())];
        let (ok, data) = self.get_json("/api/stations/nearest", &params).await;

        if !ok {
            Self::print_error(&format!("Request failed: {}", error_of(&data)));
            return false;
        }

        let station = &data["station"];
        Self::print_success("Nearest station found");
        Self::print_info("Name", station["name"].as_str().unwrap_or(""));
        Self::print_info("ID", station["id"].as_str().unwrap_or(""));
        Self::print_info(
            "Distance",
            &format!("{}m", station["distance_meters"].as_f64().unwrap_or(0.0)),
        );
        true
    }

    pub async fn check_departures(&self, station: &str, time: Option<&str>, limit: u32) -> bool {
        Self::print_header("Check: departures");

        let mut params = vec![
            ("station", station.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(time) = time {
            params.push(("time", time.to_string()));
        }
        let (ok, data) = self.get_json("/api/departures", &params).await;

        if !ok {
            Self::print_error(&format!("Request failed: {}", error_of(&data)));
            return false;
        }

        Self::print_success(&format!("{} departures found", count_of(&data)));
        Self::print_info("Station ID", station);

        println!("\n{}Departures:{}", color::BOLD, color::RESET);
        for dep in data["departures"].as_array().into_iter().flatten().take(10) {
            let delay = dep["delay_minutes"].as_i64().unwrap_or(0);
            let delay_str = if delay > 0 {
                format!(" {}(+{delay}){}", color::RED, color::RESET)
            } else {
                String::new()
            };
            println!(
                "  • {} {}{:>8}{} → {}{delay_str}",
                format_time_hhmm(dep["scheduled_time"].as_str()),
                color::CYAN,
                dep["line"].as_str().unwrap_or("?"),
                color::RESET,
                dep["direction"].as_str().unwrap_or("?")
            );
        }
        true
    }

    pub async fn check_route(
        &self,
        origin: &str,
        destination: &str,
        time: Option<&str>,
        limit: u32,
    ) -> bool {
        Self::print_header("Check: route planning");

        let mut params = vec![
            ("from", origin.to_string()),
            ("to", destination.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(time) = time {
            params.push(("time", time.to_string()));
        }
        let (ok, data) = self.get_json("/api/route", &params).await;

        if !ok {
            Self::print_error(&format!("Request failed: {}", error_of(&data)));
            return false;
        }

        Self::print_success(&format!("{} routes found", count_of(&data)));
        Self::print_info("From", origin);
        Self::print_info("To", destination);

        println!("\n{}Routes:{}", color::BOLD, color::RESET);
        for (i, route) in data["routes"].as_array().into_iter().flatten().enumerate() {
            println!(
                "  {}. {} → {} ({}min, {} transfers, {} legs)",
                i + 1,
                format_time_hhmm(route["departure_time"].as_str()),
                format_time_hhmm(route["arrival_time"].as_str()),
                route["duration_minutes"].as_i64().unwrap_or(0),
                route["num_transfers"].as_u64().unwrap_or(0),
                route["legs"].as_array().map_or(0, Vec::len)
            );
        }
        true
    }

    /// Run every check once and tally the results
    pub async fn run_all(&self) -> Summary {
        let mut summary = Summary::default();

        summary.record(self.check_health().await);
        summary.record(self.check_stations(47.999, 7.842, 1000, 10).await);
        summary.record(self.check_search("Freiburg", 10).await);
        summary.record(self.check_nearest(47.999, 7.842).await);
        summary.record(self.check_departures("8000107", None, 10).await);
        summary.record(self.check_route("8000107", "8000105", None, 3).await);

        summary
    }
}

fn count_of(data: &Value) -> u64 {
    data["count"].as_u64().unwrap_or(0)
}

fn error_of(data: &Value) -> String {
    data["error"]
        .as_str()
        .unwrap_or("unknown error")
        .to_string()
}

/// Shorten an ISO timestamp to HH:MM for display
fn format_time_hhmm(iso: Option<&str>) -> String {
    let Some(iso) = iso else {
        return "?".to_string();
    };
    // "2026-08-06T10:15:00Z" → "10:15"
    iso.split('T')
        .nth(1)
        .map_or_else(|| iso.to_string(), |t| t.chars().take(5).collect())
}
