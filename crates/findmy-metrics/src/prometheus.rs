//! Prometheus text exposition format.
//!
//! Renders a scrape batch into the Prometheus text exposition format
//! (version 0.0.4). Every family is a gauge labelled with `device_id` and
//! `device_name`; families always appear in [`DeviceMetric::ALL`] order.

use crate::collector::{DeviceOutcome, ScrapeBatch};

/// The per-device gauge families exposed on `/metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMetric {
    Latitude,
    Longitude,
    Altitude,
    ReportTimestamp,
    Status,
    IsOwnReport,
    ReportAge,
    ReportCount,
    ScrapeSuccess,
}

impl DeviceMetric {
    /// Exposition order.
    pub const ALL: [DeviceMetric; 9] = [
        Self::Latitude,
        Self::Longitude,
        Self::Altitude,
        Self::ReportTimestamp,
        Self::Status,
        Self::IsOwnReport,
        Self::ReportAge,
        Self::ReportCount,
        Self::ScrapeSuccess,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Latitude => "google_find_my_device_latitude_degrees",
            Self::Longitude => "google_find_my_device_longitude_degrees",
            Self::Altitude => "google_find_my_device_altitude_meters",
            Self::ReportTimestamp => "google_find_my_device_report_timestamp_seconds",
            Self::Status => "google_find_my_device_status",
            Self::IsOwnReport => "google_find_my_device_is_own_report",
            Self::ReportAge => "google_find_my_device_report_age_seconds",
            Self::ReportCount => "google_find_my_device_reports_total",
            Self::ScrapeSuccess => "google_find_my_device_scrape_success",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Self::Latitude => "Latest latitude for a device",
            Self::Longitude => "Latest longitude for a device",
            Self::Altitude => "Latest altitude for a device",
            Self::ReportTimestamp => "Unix timestamp for latest coordinate report",
            Self::Status => "Status value for latest coordinate report",
            Self::IsOwnReport => "Whether latest coordinate report is own report (1=true,0=false)",
            Self::ReportAge => "Age in seconds of latest coordinate report",
            Self::ReportCount => "Number of reports returned for a device in this scrape",
            Self::ScrapeSuccess => "1 if device scrape succeeded, else 0",
        }
    }

    /// Sample value for one device, or `None` if the family has no sample
    /// for it in this scrape.
    ///
    /// Report count and scrape success are always present; everything else
    /// needs a coordinate-bearing report.
    pub fn value(self, batch: &ScrapeBatch, outcome: &DeviceOutcome) -> Option<f64> {
        let latest = outcome.latest();
        match self {
            Self::Latitude => latest?.latitude,
            Self::Longitude => latest?.longitude,
            Self::Altitude => latest.map(|r| r.altitude),
            Self::ReportTimestamp => latest.map(|r| r.time),
            Self::Status => latest.map(|r| r.status as f64),
            Self::IsOwnReport => latest.map(|r| if r.is_own_report { 1.0 } else { 0.0 }),
            Self::ReportAge => latest.map(|r| batch.report_age(r)),
            Self::ReportCount => Some(outcome.report_count() as f64),
            Self::ScrapeSuccess => Some(if outcome.is_success() { 1.0 } else { 0.0 }),
        }
    }
}

/// Render a scrape batch into Prometheus text format.
pub fn render_prometheus(batch: &ScrapeBatch) -> String {
    let mut out = String::new();

    for metric in DeviceMetric::ALL {
        let name = metric.name();
        out.push_str(&format!("# HELP {name} {}\n", metric.help()));
        out.push_str(&format!("# TYPE {name} gauge\n"));

        for sample in &batch.samples {
            let Some(value) = metric.value(batch, &sample.outcome) else {
                continue;
            };
            out.push_str(&format!(
                "{name}{{device_id=\"{}\",device_name=\"{}\"}} {}\n",
                escape_label(&sample.device.id),
                escape_label(&sample.device.name),
                format_value(value)
            ));
        }
    }

    out
}

/// Escape a label value (backslash, double quote, newline).
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::DeviceSample;
    use findmy_core::{Device, LocationReport};

    fn located(name: &str, id: &str, report_count: usize, time: f64) -> DeviceSample {
        DeviceSample {
            device: Device::new(name, id),
            outcome: DeviceOutcome::Located {
                report_count,
                latest: LocationReport {
                    latitude: Some(3.0),
                    longitude: Some(4.0),
                    altitude: 15.5,
                    time,
                    status: 2,
                    is_own_report: false,
                },
            },
        }
    }

    fn sample(name: &str, id: &str, outcome: DeviceOutcome) -> DeviceSample {
        DeviceSample {
            device: Device::new(name, id),
            outcome,
        }
    }

    #[test]
    fn render_empty_still_declares_families() {
        let output = render_prometheus(&ScrapeBatch {
            now: 0.0,
            samples: vec![],
        });
        for metric in DeviceMetric::ALL {
            assert!(output.contains(&format!("# HELP {} ", metric.name())));
            assert!(output.contains(&format!("# TYPE {} gauge", metric.name())));
        }
    }

    #[test]
    fn render_two_device_scenario() {
        let batch = ScrapeBatch {
            now: 260.0,
            samples: vec![
                located("Phone", "id1", 2, 200.0),
                sample("Tablet", "id2", DeviceOutcome::NoFix { report_count: 0 }),
            ],
        };
        let output = render_prometheus(&batch);

        let phone = "{device_id=\"id1\",device_name=\"Phone\"}";
        assert!(output.contains(&format!("google_find_my_device_latitude_degrees{phone} 3\n")));
        assert!(output.contains(&format!("google_find_my_device_longitude_degrees{phone} 4\n")));
        assert!(output.contains(&format!("google_find_my_device_altitude_meters{phone} 15.5\n")));
        assert!(output.contains(&format!(
            "google_find_my_device_report_timestamp_seconds{phone} 200\n"
        )));
        assert!(output.contains(&format!("google_find_my_device_status{phone} 2\n")));
        assert!(output.contains(&format!("google_find_my_device_is_own_report{phone} 0\n")));
        assert!(output.contains(&format!("google_find_my_device_report_age_seconds{phone} 60\n")));
        assert!(output.contains(&format!("google_find_my_device_reports_total{phone} 2\n")));
        assert!(output.contains(&format!("google_find_my_device_scrape_success{phone} 1\n")));

        let tablet = "{device_id=\"id2\",device_name=\"Tablet\"}";
        let tablet_lines: Vec<&str> = output.lines().filter(|l| l.contains(tablet)).collect();
        assert_eq!(
            tablet_lines,
            vec![
                "google_find_my_device_reports_total{device_id=\"id2\",device_name=\"Tablet\"} 0",
                "google_find_my_device_scrape_success{device_id=\"id2\",device_name=\"Tablet\"} 0",
            ]
        );
    }

    #[test]
    fn render_failed_device_only_count_and_success() {
        let batch = ScrapeBatch {
            now: 0.0,
            samples: vec![sample(
                "Phone",
                "id1",
                DeviceOutcome::Failed {
                    reason: "boom".to_string(),
                },
            )],
        };
        let output = render_prometheus(&batch);
        let samples: Vec<&str> = output.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(samples.len(), 2);
        assert!(samples[0].starts_with("google_find_my_device_reports_total{"));
        assert!(samples[0].ends_with(" 0"));
        assert!(samples[1].starts_with("google_find_my_device_scrape_success{"));
        assert!(samples[1].ends_with(" 0"));
    }

    #[test]
    fn render_families_in_fixed_order() {
        let batch = ScrapeBatch {
            now: 300.0,
            samples: vec![located("Phone", "id1", 1, 200.0)],
        };
        let output = render_prometheus(&batch);

        let order: Vec<&str> = output
            .lines()
            .filter_map(|l| l.strip_prefix("# TYPE "))
            .map(|l| l.trim_end_matches(" gauge"))
            .collect();
        let expected: Vec<&str> = DeviceMetric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn render_age_clamped_for_future_reports() {
        let batch = ScrapeBatch {
            now: 100.0,
            samples: vec![located("Phone", "id1", 1, 500.0)],
        };
        let output = render_prometheus(&batch);
        assert!(output.contains(
            "google_find_my_device_report_age_seconds{device_id=\"id1\",device_name=\"Phone\"} 0\n"
        ));
    }

    #[test]
    fn render_samples_follow_registry_order() {
        let batch = ScrapeBatch {
            now: 300.0,
            samples: vec![
                located("Zeta", "z", 1, 200.0),
                located("Alpha", "a", 1, 200.0),
            ],
        };
        let output = render_prometheus(&batch);
        let zeta = output.find("device_id=\"z\"").unwrap();
        let alpha = output.find("device_id=\"a\"").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn label_values_are_escaped() {
        assert_eq!(escape_label(r#"Bob's "Phone""#), r#"Bob's \"Phone\""#);
        assert_eq!(escape_label("a\\b\nc"), "a\\\\b\\nc");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(-12.25), "-12.25");
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let batch = ScrapeBatch {
            now: 300.0,
            samples: vec![located("Phone", "id1", 1, 200.0)],
        };
        let output = render_prometheus(&batch);

        // Every non-comment line should match: metric_name{labels} value
        for line in output.lines() {
            if line.starts_with('#') {
                continue;
            }
            let (series, value) = line.rsplit_once(' ').unwrap();
            assert!(series.contains('{') && series.ends_with('}'), "line: {line}");
            assert!(value.parse::<f64>().is_ok(), "line: {line}");
        }
    }
}
