//! findmy-client — locator bridge client.
//!
//! The vendor location API is fronted by a small HTTP service (the
//! *locator bridge*). [`BridgeClient`] implements both
//! [`DeviceDirectory`](findmy_core::DeviceDirectory) and
//! [`LocationSource`](findmy_core::LocationSource) on top of it.
//!
//! # Bridge protocol
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | GET | `/devices` | — | `{"devices":[{"name":..,"canonic_ids":[..]}]}` |
//! | POST | `/locate` | `{"device_id","device_name","timeout_seconds","print_output"}` | `[LocationReport, ..]` |

pub mod bridge;

pub use bridge::BridgeClient;
