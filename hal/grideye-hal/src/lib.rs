//! Grid-EYE Hardware Abstraction Layer
//!
//! This crate defines the bus traits that platform crates implement
//! (Linux `i2c-dev`, any `embedded-hal` 1.0 MCU HAL, test doubles) and the
//! register access layer the sensor driver is written against.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  grideye-drivers (Amg8833, cache)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  grideye-hal (this crate)               │
//! │    RegisterBus  ──▶  I2cBus             │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ grideye-hal-  │       │ embedded-hal  │
//! │    linux      │       │  I2c (MCUs)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`register::RegisterBus`] - byte-wide register access on one device

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod i2c;
pub mod register;

// Re-export key types at crate root for convenience
pub use i2c::{EmbeddedHalBus, I2cBus, I2cBusError};
pub use register::{ByteOrder, RegisterBus, RegisterError};
