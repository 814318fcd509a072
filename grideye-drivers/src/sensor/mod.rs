//! Thermopile sensor drivers

pub mod amg8833;
pub mod cached;

#[cfg(test)]
pub(crate) mod fake;

pub use amg8833::Amg8833;
pub use cached::{ttl_for, CachedSensor, Snapshot};
