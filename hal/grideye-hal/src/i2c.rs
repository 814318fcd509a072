//! I2C bus abstractions
//!
//! Provides the I2C master trait the register layer is written against,
//! plus an adapter so any `embedded-hal` 1.0 I2C implementation can be
//! plugged in directly.

use core::fmt;

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices. Every call is one complete bus transaction and
/// blocks until it has finished.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error: fmt::Debug;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        T::write_read(self, address, write_data, read_buf)
    }
}

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error (misplaced START/STOP)
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received (address or data byte not acknowledged)
    Nack,
    /// Overrun
    Overrun,
    /// Other error, including an unavailable link
    Other,
}

impl fmt::Display for I2cBusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            I2cBusError::Bus => "bus error",
            I2cBusError::ArbitrationLost => "arbitration lost",
            I2cBusError::Nack => "no acknowledge",
            I2cBusError::Overrun => "overrun",
            I2cBusError::Other => "i2c link failure",
        };
        f.write_str(msg)
    }
}

impl From<embedded_hal::i2c::ErrorKind> for I2cBusError {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        use embedded_hal::i2c::ErrorKind;

        match kind {
            ErrorKind::Bus => I2cBusError::Bus,
            ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
            ErrorKind::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

/// [`I2cBus`] over any `embedded-hal` 1.0 I2C master
///
/// Errors are folded into [`I2cBusError`] through
/// [`embedded_hal::i2c::Error::kind`], so code above this layer never sees
/// the platform error type.
#[derive(Debug)]
pub struct EmbeddedHalBus<T> {
    inner: T,
}

impl<T> EmbeddedHalBus<T> {
    /// Wrap an `embedded-hal` I2C master
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Give back the wrapped I2C master
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Borrow the wrapped I2C master
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: embedded_hal::i2c::I2c> I2cBus for EmbeddedHalBus<T> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(address, data).map_err(kind_of)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.inner.read(address, buf).map_err(kind_of)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.inner
            .write_read(address, write_data, read_buf)
            .map_err(kind_of)
    }
}

fn kind_of<E: embedded_hal::i2c::Error>(e: E) -> I2cBusError {
    I2cBusError::from(e.kind())
}
