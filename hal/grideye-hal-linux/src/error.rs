//! Platform errors

use std::fmt;

use grideye_core::config::ConfigError;
use grideye_hal::{I2cBusError, RegisterError};

/// Errors from the Linux sensor surface
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The i2c-dev node could not be opened
    Open {
        /// Device node path
        path: String,
        /// OS error text
        reason: String,
    },
    /// Rejected before touching the bus
    InvalidConfig(ConfigError),
    /// Bus failure or use after close
    Sensor(RegisterError<I2cBusError>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Open { path, reason } => write!(f, "cannot open {}: {}", path, reason),
            Error::InvalidConfig(e) => write!(f, "invalid sensor config: {}", e),
            Error::Sensor(e) => write!(f, "sensor: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::InvalidConfig(e)
    }
}

impl From<RegisterError<I2cBusError>> for Error {
    fn from(e: RegisterError<I2cBusError>) -> Self {
        Error::Sensor(e)
    }
}

impl Error {
    /// Whether the sensor was used after [`close`](crate::Sensor::close)
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Sensor(RegisterError::Closed))
    }
}
