//! findmy-metrics — per-scrape location collection for tracked devices.
//!
//! Every scrape queries each registered device once, picks its freshest
//! report with coordinates, and renders the result as Prometheus gauges.
//! Nothing is cached between scrapes.
//!
//! # Architecture
//!
//! ```text
//! DeviceCollector
//!   └── scrape() → ScrapeBatch (one DeviceOutcome per device, shared "now")
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```

pub mod collector;
pub mod prometheus;

pub use collector::{DeviceCollector, DeviceOutcome, DeviceSample, ScrapeBatch};
pub use prometheus::{DeviceMetric, render_prometheus};
