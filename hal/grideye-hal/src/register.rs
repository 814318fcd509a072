//! Register-addressed device access
//!
//! Most small I2C sensors expose a flat map of byte-wide registers. A
//! write is `[register, value]`, a read is a repeated-start write of the
//! register address followed by N data bytes. [`RegisterBus`] binds an
//! [`I2cBus`] to one device address and speaks exactly that.
//!
//! There is no retry logic here: a failed transaction is reported to the
//! caller as soon as the bus reports it.

use core::fmt;

use crate::i2c::I2cBus;

/// Byte order of a 16-bit register pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    /// Low byte at the lower register address (AMG88xx native order)
    #[default]
    LittleEndian,
    /// High byte at the lower register address
    BigEndian,
}

impl ByteOrder {
    /// Assemble a word from the two bytes as they came off the bus
    pub const fn word(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        }
    }
}

/// Errors from register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterError<E> {
    /// The underlying bus transaction failed
    Bus(E),
    /// The link was released with [`RegisterBus::close`]
    Closed,
}

impl<E: fmt::Display> fmt::Display for RegisterError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::Bus(e) => write!(f, "bus transaction failed: {}", e),
            RegisterError::Closed => f.write_str("register bus is closed"),
        }
    }
}

/// One device on an I2C bus, addressed by register
#[derive(Debug)]
pub struct RegisterBus<B> {
    /// `None` once closed
    bus: Option<B>,
    /// 7-bit device address
    address: u8,
}

impl<B: I2cBus> RegisterBus<B> {
    /// Bind `bus` to the device at 7-bit `address`
    pub fn new(bus: B, address: u8) -> Self {
        Self {
            bus: Some(bus),
            address,
        }
    }

    /// The device address this bus talks to
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.bus.is_none()
    }

    /// Write a register, keeping only the low 8 bits of `value`
    pub fn write(
        &mut self,
        register: impl Into<u8>,
        value: u16,
    ) -> Result<(), RegisterError<B::Error>> {
        self.write8(register, (value & 0xFF) as u8)
    }

    /// Write one byte to a register
    pub fn write8(
        &mut self,
        register: impl Into<u8>,
        value: u8,
    ) -> Result<(), RegisterError<B::Error>> {
        let address = self.address;
        self.link()?
            .write(address, &[register.into(), value])
            .map_err(RegisterError::Bus)
    }

    /// Read one byte from a register
    pub fn read8(&mut self, register: impl Into<u8>) -> Result<u8, RegisterError<B::Error>> {
        let mut buf = [0u8; 1];
        self.read_into(register.into(), &mut buf)?;
        Ok(buf[0])
    }

    /// Read a 16-bit word starting at `register`
    pub fn read16(
        &mut self,
        register: impl Into<u8>,
        order: ByteOrder,
    ) -> Result<u16, RegisterError<B::Error>> {
        let mut buf = [0u8; 2];
        self.read_into(register.into(), &mut buf)?;
        Ok(order.word(buf))
    }

    /// Release the link
    ///
    /// Hands the bus back the first time and `None` afterwards, so it is
    /// safe to call more than once.
    pub fn close(&mut self) -> Option<B> {
        self.bus.take()
    }

    fn read_into(&mut self, register: u8, buf: &mut [u8]) -> Result<(), RegisterError<B::Error>> {
        let address = self.address;
        self.link()?
            .write_read(address, &[register], buf)
            .map_err(RegisterError::Bus)
    }

    fn link(&mut self) -> Result<&mut B, RegisterError<B::Error>> {
        self.bus.as_mut().ok_or(RegisterError::Closed)
    }
}
