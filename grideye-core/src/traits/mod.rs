//! Hardware abstraction traits
//!
//! These traits define the interface between the caching layer and
//! whatever actually produces readings (the register-level driver, another
//! cache, a test double), and the time source the cache ages readings with.

pub mod clock;
pub mod sensor;

pub use clock::Clock;
pub use sensor::ThermalSensor;
