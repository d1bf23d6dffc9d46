//! Locator traits consumed by the exporter.
//!
//! The exporter never talks to the vendor API directly. It is handed a
//! [`DeviceDirectory`] for the one-time device listing and a
//! [`LocationSource`] for per-scrape location queries, so the collection
//! logic can be driven by an HTTP bridge in production and by in-memory
//! fakes in tests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::LocateResult;
use crate::types::{Device, DeviceListing, LocationReport};

/// Boxed future alias for locator calls.
pub type LocateFuture<'a, T> = Pin<Box<dyn Future<Output = LocateResult<T>> + Send + 'a>>;

/// Lists the devices on the account. Called once at startup.
pub trait DeviceDirectory: Send + Sync {
    fn list_devices(&self) -> LocateFuture<'_, DeviceListing>;
}

/// Fetches the current location reports for one device.
pub trait LocationSource: Send + Sync {
    /// Query reports for `device`. `timeout` is forwarded to the locator so
    /// it can stop waiting on the vendor side as well.
    fn locate<'a>(
        &'a self,
        device: &'a Device,
        timeout: Duration,
    ) -> LocateFuture<'a, Vec<LocationReport>>;
}
