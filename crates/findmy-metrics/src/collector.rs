//! Device collector — queries every registered device once per scrape.
//!
//! Devices are queried strictly in registry order, one at a time. A failure
//! for one device is captured as its [`DeviceOutcome`] and never aborts the
//! scrape for the others.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, error};

use findmy_core::{Device, DeviceRegistry, LocateError, LocationReport, LocationSource};

/// Result of querying one device during a scrape.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOutcome {
    /// At least one report carried coordinates; `latest` is the freshest.
    Located {
        report_count: usize,
        latest: LocationReport,
    },
    /// The query succeeded but no report carried both coordinates.
    NoFix { report_count: usize },
    /// The query failed or timed out.
    Failed { reason: String },
}

impl DeviceOutcome {
    /// Reports returned by the locator; zero for failed queries.
    pub fn report_count(&self) -> usize {
        match self {
            Self::Located { report_count, .. } | Self::NoFix { report_count } => *report_count,
            Self::Failed { .. } => 0,
        }
    }

    /// The freshest coordinate-bearing report, if any.
    pub fn latest(&self) -> Option<&LocationReport> {
        match self {
            Self::Located { latest, .. } => Some(latest),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Located { .. })
    }
}

/// One device's outcome within a scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSample {
    pub device: Device,
    pub outcome: DeviceOutcome,
}

/// Everything collected in a single scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeBatch {
    /// Unix time (seconds) captured once at scrape start. Every report age
    /// in this batch is measured against it.
    pub now: f64,
    /// One sample per registered device, in registry order.
    pub samples: Vec<DeviceSample>,
}

impl ScrapeBatch {
    /// Age of `report` relative to this scrape, clamped at zero.
    pub fn report_age(&self, report: &LocationReport) -> f64 {
        (self.now - report.time).max(0.0)
    }
}

/// Collects per-device location outcomes on demand.
pub struct DeviceCollector {
    registry: Arc<DeviceRegistry>,
    source: Arc<dyn LocationSource>,
    /// Upper bound on each device's location query.
    timeout: Duration,
}

impl DeviceCollector {
    /// Create a collector over a loaded registry.
    pub fn new(
        registry: Arc<DeviceRegistry>,
        source: Arc<dyn LocationSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            source,
            timeout,
        }
    }

    /// Run a full scrape against the current wall clock.
    pub async fn scrape(&self) -> ScrapeBatch {
        self.scrape_at(epoch_secs()).await
    }

    /// Run a full scrape using `now` as the reference time.
    pub async fn scrape_at(&self, now: f64) -> ScrapeBatch {
        let mut samples = Vec::with_capacity(self.registry.len());

        for device in self.registry.iter() {
            let outcome = self.collect_device(device).await;
            samples.push(DeviceSample {
                device: device.clone(),
                outcome,
            });
        }

        debug!(
            devices = samples.len(),
            located = samples.iter().filter(|s| s.outcome.is_success()).count(),
            "scrape complete"
        );

        ScrapeBatch { now, samples }
    }

    async fn collect_device(&self, device: &Device) -> DeviceOutcome {
        let result = tokio::time::timeout(self.timeout, self.source.locate(device, self.timeout))
            .await
            .unwrap_or(Err(LocateError::Timeout(self.timeout)));

        match result {
            Ok(reports) => {
                let report_count = reports.len();
                match latest_coordinate_report(&reports) {
                    Some(latest) => DeviceOutcome::Located {
                        report_count,
                        latest: latest.clone(),
                    },
                    None => {
                        debug!(
                            device_name = %device.name,
                            device_id = %device.id,
                            report_count,
                            "no report with coordinates"
                        );
                        DeviceOutcome::NoFix { report_count }
                    }
                }
            }
            Err(e) => {
                error!(
                    device_name = %device.name,
                    device_id = %device.id,
                    error = %e,
                    "failed scraping device"
                );
                DeviceOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Pick the most recent report that carries both coordinates.
///
/// Reports missing either coordinate never win, however recent. Among
/// reports with the same maximal `time`, the last one in input order wins.
pub fn latest_coordinate_report(reports: &[LocationReport]) -> Option<&LocationReport> {
    reports
        .iter()
        .filter(|r| r.coordinates().is_some())
        .max_by(|a, b| a.time.total_cmp(&b.time))
}

fn epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
