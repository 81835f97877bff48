//! PlantCare firmware library.
//!
//! Exposes the pipeline (link, sensors, store, control) and its adapters
//! for integration testing on the host.  ESP-IDF-specific code is guarded
//! by the `espidf` feature within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod link;
pub mod pins;
pub mod store;

pub mod adapters;
pub mod control;
pub mod drivers;
pub mod sensors;

#[cfg(feature = "espidf")]
mod esp_link_shims;
