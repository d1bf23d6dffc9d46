//! Exporter configuration.
//!
//! Every option can be given as a flag or through its environment variable.

use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "findmy-exporter",
    version,
    about = "Export Find My device locations as Prometheus metrics"
)]
pub struct Config {
    /// Address the metrics server binds to.
    #[arg(long, env = "EXPORTER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the metrics server binds to.
    #[arg(long, env = "EXPORTER_PORT", default_value = "9824")]
    pub port: u16,

    /// Per-device location query timeout, in seconds.
    #[arg(
        long = "location-timeout",
        env = "LOCATION_TIMEOUT_SECONDS",
        default_value = "30",
        value_parser = parse_timeout
    )]
    pub location_timeout: Duration,

    /// Log verbosity: DEBUG, INFO, WARNING, ERROR or CRITICAL.
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Base URL of the locator bridge.
    #[arg(long, env = "LOCATOR_URL", default_value = "http://127.0.0.1:9825")]
    pub locator_url: String,
}

impl Config {
    /// Tracing filter directive for the configured log level.
    pub fn log_filter(&self) -> &'static str {
        log_filter(&self.log_level)
    }
}

/// Map a log level name to a tracing filter directive.
///
/// Unknown names fall back to `info`.
pub fn log_filter(level: &str) -> &'static str {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" | "FATAL" => "error",
        _ => "info",
    }
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid timeout {s:?}: {e}"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be a positive number of seconds, got {s:?}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid timeout {s:?}: {e}"))
}
