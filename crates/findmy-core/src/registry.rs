//! Device registry — the fixed device list loaded once at startup.

use tracing::info;

use crate::error::{RegistryError, RegistryResult};
use crate::source::DeviceDirectory;
use crate::types::Device;

/// Ordered, non-empty, immutable list of devices.
///
/// Shared read-only across scrapes for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Build a registry from an explicit device list.
    ///
    /// Fails with [`RegistryError::Empty`] if `devices` is empty.
    pub fn new(devices: Vec<Device>) -> RegistryResult<Self> {
        if devices.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { devices })
    }

    /// Fetch, decode and canonicalize the device listing.
    ///
    /// Called exactly once; there are no retries. Any error here is fatal
    /// for the process.
    pub async fn load(directory: &dyn DeviceDirectory) -> RegistryResult<Self> {
        info!("loading devices once at startup");
        let listing = directory.list_devices().await?;
        let registry = Self::new(listing.canonic_devices())?;
        info!(devices = registry.len(), "loaded devices");
        Ok(registry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Always false; a registry can't be built empty.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
