//! Configuration types
//!
//! Board-agnostic sensor configuration. How a deployment produces these
//! values (flash, a file, hard-coded) is up to the platform crate.

pub mod sensor;

pub use sensor::*;
