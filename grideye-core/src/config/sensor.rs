//! Sensor configuration type definitions

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::registers::{FrameRate, InterruptMode, DEFAULT_ADDRESS, DEFAULT_BUS_INDEX};

/// Highest valid 7-bit I2C address
pub const MAX_I2C_ADDRESS: u8 = 0x7F;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Address does not fit in 7 bits
    AddressOutOfRange(u8),
    /// Address is in a reserved block (0x00-0x07 or 0x78-0x7F)
    ReservedAddress(u8),
    /// Interrupt lower level above the upper level
    InvertedInterruptLevels,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::AddressOutOfRange(addr) => {
                write!(f, "address {:#04x} is not a 7-bit i2c address", addr)
            }
            ConfigError::ReservedAddress(addr) => {
                write!(f, "address {:#04x} is reserved", addr)
            }
            ConfigError::InvertedInterruptLevels => {
                f.write_str("interrupt lower level is above the upper level")
            }
        }
    }
}

/// Interrupt threshold levels in °C
///
/// Written to the six interrupt level registers using the pixel encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterruptLevels {
    /// Upper trigger level
    pub upper_c: f32,
    /// Lower trigger level
    pub lower_c: f32,
    /// Hysteresis applied on release
    pub hysteresis_c: f32,
}

impl InterruptLevels {
    /// Check the levels are ordered
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lower_c > self.upper_c {
            return Err(ConfigError::InvertedInterruptLevels);
        }
        Ok(())
    }
}

/// Sensor configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// 7-bit I2C address (0x69 or 0x68 depending on AD_SELECT)
    pub address: u8,
    /// Platform bus number (`/dev/i2c-N` on Linux)
    pub bus_index: u8,
    /// Frame rate applied after the init sequence
    pub frame_rate: FrameRate,
    /// Interrupt mode applied after the init sequence
    pub interrupt_mode: InterruptMode,
    /// Interrupt levels, written only when set
    pub interrupt_levels: Option<InterruptLevels>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            bus_index: DEFAULT_BUS_INDEX,
            frame_rate: FrameRate::Fps10,
            interrupt_mode: InterruptMode::Disabled,
            interrupt_levels: None,
        }
    }
}

impl SensorConfig {
    /// Config for a sensor at `address` on bus `bus_index`, defaults otherwise
    pub fn new(address: u8, bus_index: u8) -> Self {
        Self {
            address,
            bus_index,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address > MAX_I2C_ADDRESS {
            return Err(ConfigError::AddressOutOfRange(self.address));
        }
        if self.address < 0x08 || self.address > 0x77 {
            return Err(ConfigError::ReservedAddress(self.address));
        }
        if let Some(levels) = &self.interrupt_levels {
            levels.validate()?;
        }
        Ok(())
    }
}
