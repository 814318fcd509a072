//! Board-agnostic types for the Grid-EYE thermopile driver
//!
//! This crate contains everything about the AMG88xx that does not depend
//! on a particular bus implementation:
//!
//! - Register map and control register encodings
//! - Raw word decoding (pixel two's complement, thermistor sign/magnitude)
//! - Temperature frame type with fault flag
//! - Sensor configuration type definitions
//! - Sensor and clock traits the caching layer is written against

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod decode;
pub mod frame;
pub mod registers;
pub mod traits;

pub use frame::TemperatureFrame;
pub use registers::{FrameRate, InterruptMode, PowerMode, Register, ResetKind, Status};
pub use traits::{Clock, ThermalSensor};
