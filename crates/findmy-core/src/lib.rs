//! findmy-core — shared types for the Find My location exporter.
//!
//! Holds the domain model (devices, device listings, location reports),
//! the two locator traits the exporter consumes, and the device registry
//! that is loaded once at startup.
//!
//! # Architecture
//!
//! ```text
//! DeviceDirectory ── list_devices() ──► DeviceListing
//!                                         └── canonic_devices() ──► DeviceRegistry (immutable)
//!
//! LocationSource ── locate(device, timeout) ──► Vec<LocationReport>   (every scrape)
//! ```

pub mod error;
pub mod registry;
pub mod source;
pub mod types;

pub use error::{LocateError, LocateResult, RegistryError, RegistryResult};
pub use registry::DeviceRegistry;
pub use source::{DeviceDirectory, LocateFuture, LocationSource};
pub use types::*;
