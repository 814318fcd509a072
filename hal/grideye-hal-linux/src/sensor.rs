//! Cached AMG8833 on a Linux i2c-dev bus

use std::sync::{Mutex, MutexGuard, PoisonError};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use grideye_core::config::SensorConfig;
use grideye_core::registers::{FrameRate, InterruptMode};
use grideye_drivers::sensor::{Amg8833, CachedSensor, Snapshot};
use grideye_hal::{EmbeddedHalBus, I2cBus, I2cBusError};
use linux_embedded_hal::I2cdev;
use log::{debug, info};

use crate::clock::SystemClock;
use crate::error::Error;

/// Bus type used on a real board
pub type LinuxBus = EmbeddedHalBus<I2cdev>;

/// Device node for I2C bus `bus_index`
pub fn device_path(bus_index: u8) -> String {
    format!("/dev/i2c-{}", bus_index)
}

/// Open bus `bus_index` and bring up the sensor at `address` with default
/// settings (10 fps, interrupts off)
pub fn initialize(address: u8, bus_index: u8) -> Result<Sensor, Error> {
    initialize_with(&SensorConfig::new(address, bus_index))
}

/// Open the configured bus and bring up the sensor
///
/// The config is checked before the device node is opened. The init
/// sequence runs first; the configured frame rate, interrupt levels and
/// interrupt mode are applied after it.
pub fn initialize_with(config: &SensorConfig) -> Result<Sensor, Error> {
    config.validate()?;

    let path = device_path(config.bus_index);
    let dev = I2cdev::new(&path).map_err(|e| Error::Open {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    info!("grideye: opened {}", path);

    Sensor::start(EmbeddedHalBus::new(dev), config)
}

type Cache<B> = CachedSensor<NoopRawMutex, Amg8833<B>, SystemClock>;

/// A sensor shared between readers, refreshed at most once per frame
///
/// Each instance has its own lock, held for a whole refresh. Sensors on
/// different buses never wait on each other.
pub struct Sensor<B = LinuxBus> {
    cache: Mutex<Cache<B>>,
    address: u8,
}

impl<B: I2cBus<Error = I2cBusError>> Sensor<B> {
    /// Bring up the sensor at `address` on an already open bus
    pub fn with_bus(bus: B, address: u8) -> Result<Self, Error> {
        Self::from_config(bus, &SensorConfig::new(address, 0))
    }

    /// Bring up the sensor on an already open bus using `config`
    ///
    /// `config.bus_index` is ignored.
    pub fn from_config(bus: B, config: &SensorConfig) -> Result<Self, Error> {
        config.validate()?;
        Self::start(bus, config)
    }

    fn start(bus: B, config: &SensorConfig) -> Result<Self, Error> {
        let mut driver = Amg8833::new(bus, config.address)?;

        if config.frame_rate != FrameRate::Fps10 {
            driver.set_frame_rate(config.frame_rate)?;
        }
        if let Some(levels) = &config.interrupt_levels {
            driver.set_interrupt_levels(levels)?;
        }
        if config.interrupt_mode != InterruptMode::Disabled {
            driver.set_interrupt_mode(config.interrupt_mode)?;
        }
        debug!(
            "grideye @ {:#04x}: {:?}, interrupts {:?}",
            config.address, config.frame_rate, config.interrupt_mode
        );

        Ok(Self {
            cache: Mutex::new(CachedSensor::new(driver, SystemClock)),
            address: config.address,
        })
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Fault flag and pixel temperatures in °C, raster order
    ///
    /// A faulted frame holds only the pixels read before the first
    /// out-of-range one.
    pub fn read_frame(&self) -> Result<(bool, Vec<f32>), Error> {
        let (faulted, readings) = self.cache().read()?.into_parts();
        Ok((faulted, readings.to_vec()))
    }

    /// Thermistor temperature in °C
    pub fn read_ambient(&self) -> Result<f32, Error> {
        Ok(self.cache().read_ambient()?)
    }

    /// Frame and ambient temperature from the same refresh
    pub fn snapshot(&self) -> Result<Snapshot, Error> {
        Ok(self.cache().snapshot()?)
    }

    /// Sampling rate the sensor is configured for
    pub fn frame_rate(&self) -> FrameRate {
        self.cache().frame_rate()
    }

    /// Change the sampling rate; the cache TTL follows
    pub fn set_frame_rate(&self, rate: FrameRate) -> Result<(), Error> {
        Ok(self.cache().set_frame_rate(rate)?)
    }

    /// Seconds on the process monotonic clock at the last hardware
    /// refresh, `None` if the sensor has not been read yet
    pub fn last_refresh_timestamp(&self) -> Option<f64> {
        self.cache()
            .last_refresh()
            .map(|at| at.as_micros() as f64 / 1_000_000.0)
    }

    /// Release the bus. Later reads fail with a closed error.
    pub fn close(&self) {
        self.cache().close();
        info!("grideye @ {:#04x}: closed", self.address);
    }

    // A panicking reader cannot leave a torn snapshot behind, so a
    // poisoned lock is still usable
    fn cache(&self) -> MutexGuard<'_, Cache<B>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
