//! Domain types for the exporter.
//!
//! Devices are loaded once at startup and never change. Location reports
//! are produced fresh by the locator on every scrape and are not kept.
//! All types are JSON-serializable since that is what the locator speaks.

use serde::{Deserialize, Serialize};

use crate::error::LocateResult;

/// Opaque identifier for a tracked device (its canonic id).
pub type DeviceId = String;

// ── Devices ────────────────────────────────────────────────────────

/// A device the exporter reports on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// User-defined display name.
    pub name: String,
}

impl Device {
    pub fn new(name: impl Into<String>, id: impl Into<DeviceId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Decoded device-list payload as returned by the locator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceListing {
    #[serde(default)]
    pub devices: Vec<ListedDevice>,
}

/// One entry of a device listing.
///
/// A single physical device may be known under several canonic ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedDevice {
    pub name: String,
    #[serde(default)]
    pub canonic_ids: Vec<DeviceId>,
}

impl DeviceListing {
    /// Decode a listing from its JSON encoding.
    pub fn decode(bytes: &[u8]) -> LocateResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Flatten the listing into one device per canonic id.
    ///
    /// Order follows the listing; entries without canonic ids contribute
    /// nothing.
    pub fn canonic_devices(&self) -> Vec<Device> {
        self.devices
            .iter()
            .flat_map(|d| d.canonic_ids.iter().map(move |id| Device::new(&d.name, id)))
            .collect()
    }
}

// ── Location reports ───────────────────────────────────────────────

/// A single location report for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Altitude in meters.
    pub altitude: f64,
    /// Unix timestamp (seconds) the report was taken at.
    pub time: f64,
    /// Vendor status code.
    pub status: i64,
    /// Whether the device reported its own position (vs. a crowdsourced one).
    pub is_own_report: bool,
}

impl LocationReport {
    /// Latitude and longitude, if the report carries both.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Decode a JSON array of reports.
    pub fn decode_all(bytes: &[u8]) -> LocateResult<Vec<Self>> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonic_devices_flattens_in_order() {
        let listing = DeviceListing {
            devices: vec![
                ListedDevice {
                    name: "Phone".to_string(),
                    canonic_ids: vec!["id1".to_string()],
                },
                ListedDevice {
                    name: "Keys".to_string(),
                    canonic_ids: vec![],
                },
                ListedDevice {
                    name: "Tablet".to_string(),
                    canonic_ids: vec!["id2".to_string(), "id3".to_string()],
                },
            ],
        };

        assert_eq!(
            listing.canonic_devices(),
            vec![
                Device::new("Phone", "id1"),
                Device::new("Tablet", "id2"),
                Device::new("Tablet", "id3"),
            ]
        );
    }

    #[test]
    fn decode_listing_tolerates_missing_fields() {
        let listing = DeviceListing::decode(br#"{"devices":[{"name":"Phone"}]}"#).unwrap();
        assert_eq!(listing.devices.len(), 1);
        assert!(listing.canonic_devices().is_empty());

        let empty = DeviceListing::decode(b"{}").unwrap();
        assert!(empty.devices.is_empty());
    }

    #[test]
    fn decode_reports_with_missing_coordinates() {
        let reports = LocationReport::decode_all(
            br#"[
                {"latitude": 1.5, "longitude": 2.5, "altitude": 10.0, "time": 100, "status": 0, "is_own_report": true},
                {"latitude": null, "altitude": 0.0, "time": 200, "status": 1, "is_own_report": false}
            ]"#,
        )
        .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].coordinates(), Some((1.5, 2.5)));
        assert_eq!(reports[0].time, 100.0);
        assert_eq!(reports[1].coordinates(), None);
    }

    #[test]
    fn decode_reports_rejects_malformed_body() {
        assert!(LocationReport::decode_all(b"not json").is_err());
        assert!(LocationReport::decode_all(br#"[{"latitude": 1.0}]"#).is_err());
    }

    #[test]
    fn coordinates_require_both_fields() {
        let report = LocationReport {
            latitude: Some(1.0),
            longitude: None,
            altitude: 0.0,
            time: 0.0,
            status: 0,
            is_own_report: false,
        };
        assert_eq!(report.coordinates(), None);
    }
}
