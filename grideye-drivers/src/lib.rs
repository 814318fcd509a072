//! Sensor driver implementations
//!
//! This crate provides the device-level pieces on top of the traits in
//! grideye-core and the bus layer in grideye-hal:
//!
//! - [`sensor::Amg8833`]: register-level AMG8833 driver
//! - [`sensor::CachedSensor`]: read-through cache throttled to the
//!   sensor's frame rate, safe to share between concurrent readers

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to the modules below
mod fmt;

pub mod sensor;

pub use sensor::{Amg8833, CachedSensor, Snapshot};
