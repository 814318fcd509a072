//! AMG8833 Grid-EYE driver
//!
//! The AMG8833 is an 8×8 thermopile array with an on-chip thermistor,
//! accessed over I2C through a flat map of byte-wide registers.
//!
//! # Register access
//!
//! - Control registers are written one byte at a time
//! - Pixel and thermistor values are 16-bit words, low byte first
//! - Pixel `n` lives at `0x80 + 2n`
//!
//! # Init sequence
//!
//! The power and reset registers are not independently idempotent, so the
//! order is fixed: normal mode, initial reset, interrupts off, 10 fps.

use grideye_core::config::InterruptLevels;
use grideye_core::decode::{
    celsius_to_pixel_raw, in_valid_range, pixel_celsius, thermistor_celsius,
};
use grideye_core::registers::{
    FrameRate, InterruptMode, PowerMode, Register, ResetKind, Status, DEFAULT_ADDRESS,
    PIXEL_COUNT, STATUS_CLEAR_ALL,
};
use grideye_core::{TemperatureFrame, ThermalSensor};
use grideye_hal::{ByteOrder, I2cBus, RegisterBus, RegisterError};

/// AMG8833 driver errors
pub type Error<E> = RegisterError<E>;

/// AMG8833 blocking driver
pub struct Amg8833<B> {
    /// Register access to the device
    regs: RegisterBus<B>,
    /// Last frame rate written to the device
    frame_rate: FrameRate,
}

impl<B: I2cBus> Amg8833<B> {
    /// Create a driver for the sensor at `address` and run the init sequence
    ///
    /// # Errors
    ///
    /// The first failing register write aborts initialization.
    pub fn new(bus: B, address: u8) -> Result<Self, Error<B::Error>> {
        let mut sensor = Self {
            regs: RegisterBus::new(bus, address),
            frame_rate: FrameRate::Fps10,
        };
        sensor.init()?;
        Ok(sensor)
    }

    /// Create a driver for the sensor at the default address (`0x69`)
    pub fn new_default_address(bus: B) -> Result<Self, Error<B::Error>> {
        Self::new(bus, DEFAULT_ADDRESS)
    }

    /// Run the init sequence
    ///
    /// Leaves the device in normal mode, freshly reset, with interrupts
    /// disabled and sampling at 10 fps.
    pub fn init(&mut self) -> Result<(), Error<B::Error>> {
        debug!("amg8833 @ {}: init", self.regs.address());

        self.set_power_mode(PowerMode::Normal)?;
        self.reset_flags(ResetKind::Initial)?;
        self.set_interrupt_mode(InterruptMode::Disabled)?;
        self.set_frame_rate(FrameRate::Fps10)?;

        info!("amg8833 @ {}: ready", self.regs.address());
        Ok(())
    }

    /// The device address
    pub fn address(&self) -> u8 {
        self.regs.address()
    }

    /// The frame rate last written to the device
    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Set the power mode
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<B::Error>> {
        self.regs.write8(Register::PowerControl, mode.into())
    }

    /// Software reset
    pub fn reset_flags(&mut self, kind: ResetKind) -> Result<(), Error<B::Error>> {
        self.regs.write8(Register::Reset, kind.into())
    }

    /// Set the sampling rate
    pub fn set_frame_rate(&mut self, rate: FrameRate) -> Result<(), Error<B::Error>> {
        self.regs.write8(Register::FrameRate, rate.into())?;
        if self.frame_rate != rate {
            debug!("amg8833: frame rate {:?} -> {:?}", self.frame_rate, rate);
        }
        self.frame_rate = rate;
        Ok(())
    }

    /// Set the interrupt mode
    pub fn set_interrupt_mode(&mut self, mode: InterruptMode) -> Result<(), Error<B::Error>> {
        self.regs.write8(Register::InterruptControl, mode.into())
    }

    /// Clear the interrupt and pixel overflow flags
    pub fn clear_status(&mut self) -> Result<(), Error<B::Error>> {
        self.regs.write8(Register::StatusClear, STATUS_CLEAR_ALL)
    }

    /// Read the status register
    pub fn read_status(&mut self) -> Result<Status, Error<B::Error>> {
        let value = self.regs.read8(Register::Status)?;
        Ok(Status::from_register(value))
    }

    /// Program the interrupt upper, lower and hysteresis levels
    ///
    /// Each level is written low byte first; the high register holds the
    /// top 4 bits of the 12-bit value.
    pub fn set_interrupt_levels(
        &mut self,
        levels: &InterruptLevels,
    ) -> Result<(), Error<B::Error>> {
        let pairs = [
            (
                Register::InterruptHighLow,
                Register::InterruptHighHigh,
                levels.upper_c,
            ),
            (
                Register::InterruptLowLow,
                Register::InterruptLowHigh,
                levels.lower_c,
            ),
            (
                Register::InterruptHysteresisLow,
                Register::InterruptHysteresisHigh,
                levels.hysteresis_c,
            ),
        ];

        for (low, high, celsius) in pairs {
            let raw = celsius_to_pixel_raw(celsius);
            self.regs.write8(low, (raw & 0xFF) as u8)?;
            self.regs.write8(high, ((raw >> 8) & 0x0F) as u8)?;
        }
        Ok(())
    }

    /// Read the interrupt table as a pixel mask
    ///
    /// Bit `n` is set when pixel `n` (raster order) triggered.
    pub fn read_interrupt_table(&mut self) -> Result<u64, Error<B::Error>> {
        let mut mask = 0u64;
        for row in 0..Register::INTERRUPT_TABLE_LEN {
            let bits = self.regs.read8(Register::interrupt_row(row))?;
            mask |= (bits as u64) << (8 * row as u32);
        }
        Ok(mask)
    }

    /// Read and decode the first `count` pixels (clamped to 64)
    ///
    /// Stops at the first pixel that decodes outside -20..=100 °C: the
    /// returned frame is marked faulted and holds only the pixels before
    /// it. Later pixels are not read.
    pub fn read_pixel_frame(
        &mut self,
        count: usize,
    ) -> Result<TemperatureFrame, Error<B::Error>> {
        let count = count.min(PIXEL_COUNT);
        let mut frame = TemperatureFrame::new();

        for index in 0..count {
            let raw = self
                .regs
                .read16(Register::pixel(index), ByteOrder::LittleEndian)?;
            let celsius = pixel_celsius(raw);

            if !in_valid_range(celsius) {
                warn!("amg8833: pixel {} out of range ({} C)", index, celsius);
                frame.fault();
                return Ok(frame);
            }

            // Cannot overflow: count is clamped to capacity
            let _ = frame.push(celsius);
        }

        trace!("amg8833: read {} pixels", count);
        Ok(frame)
    }

    /// Read the ambient temperature from the on-chip thermistor, in °C
    pub fn read_thermistor(&mut self) -> Result<f32, Error<B::Error>> {
        let raw = self
            .regs
            .read16(Register::ThermistorLow, ByteOrder::LittleEndian)?;
        Ok(thermistor_celsius(raw))
    }

    /// Check if [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.regs.is_closed()
    }

    /// Release the bus
    ///
    /// Returns it the first time and `None` afterwards. Every operation
    /// after this fails with [`RegisterError::Closed`].
    pub fn close(&mut self) -> Option<B> {
        let bus = self.regs.close();
        if bus.is_some() {
            info!("amg8833 @ {}: closed", self.regs.address());
        }
        bus
    }

    /// Destroy the driver instance, returning the bus if it is still open
    pub fn release(mut self) -> Option<B> {
        self.regs.close()
    }
}

impl<B: I2cBus> ThermalSensor for Amg8833<B> {
    type Error = Error<B::Error>;

    fn read_frame(&mut self) -> Result<TemperatureFrame, Self::Error> {
        self.read_pixel_frame(PIXEL_COUNT)
    }

    fn read_ambient(&mut self) -> Result<f32, Self::Error> {
        self.read_thermistor()
    }

    fn set_frame_rate(&mut self, rate: FrameRate) -> Result<(), Self::Error> {
        Amg8833::set_frame_rate(self, rate)
    }

    fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    fn close(&mut self) {
        let _ = Amg8833::close(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::fake::FakeBus;
    use assert_approx_eq::assert_approx_eq;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
    use grideye_hal::{EmbeddedHalBus, I2cBusError};

    const ADDR: u8 = 0x69;

    fn init_transactions() -> Vec<Transaction> {
        vec![
            Transaction::write(ADDR, vec![0x00, 0x00]),
            Transaction::write(ADDR, vec![0x01, 0x3F]),
            Transaction::write(ADDR, vec![0x03, 0x00]),
            Transaction::write(ADDR, vec![0x02, 0x00]),
        ]
    }

    fn pixel_read(index: usize, raw: u16) -> Transaction {
        Transaction::write_read(
            ADDR,
            vec![Register::pixel(index)],
            raw.to_le_bytes().to_vec(),
        )
    }

    fn done(sensor: Amg8833<EmbeddedHalBus<Mock>>) {
        sensor.release().unwrap().into_inner().done();
    }

    #[test]
    fn test_init_sequence_order() {
        let mock = Mock::new(&init_transactions());
        let sensor = Amg8833::new_default_address(EmbeddedHalBus::new(mock)).unwrap();

        assert_eq!(sensor.address(), ADDR);
        assert_eq!(sensor.frame_rate(), FrameRate::Fps10);
        done(sensor);
    }

    #[test]
    fn test_init_stops_at_first_failure() {
        let expectations = [
            Transaction::write(ADDR, vec![0x00, 0x00]),
            Transaction::write(ADDR, vec![0x01, 0x3F]).with_error(ErrorKind::Other),
        ];
        let mut mock = Mock::new(&expectations);

        let result = Amg8833::new(EmbeddedHalBus::new(mock.clone()), ADDR);
        assert!(matches!(result, Err(RegisterError::Bus(I2cBusError::Other))));

        mock.done();
    }

    #[test]
    fn test_control_register_writes() {
        let mut expectations = init_transactions();
        expectations.extend([
            Transaction::write(ADDR, vec![0x00, 0x10]),
            Transaction::write(ADDR, vec![0x01, 0x30]),
            Transaction::write(ADDR, vec![0x02, 0x01]),
            Transaction::write(ADDR, vec![0x03, 0x01]),
            Transaction::write(ADDR, vec![0x03, 0x03]),
            Transaction::write(ADDR, vec![0x05, 0x06]),
        ]);
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        sensor.set_power_mode(PowerMode::Sleep).unwrap();
        sensor.reset_flags(ResetKind::Flag).unwrap();
        sensor.set_frame_rate(FrameRate::Fps1).unwrap();
        assert_eq!(sensor.frame_rate(), FrameRate::Fps1);
        sensor.set_interrupt_mode(InterruptMode::Absolute).unwrap();
        sensor.set_interrupt_mode(InterruptMode::Difference).unwrap();
        sensor.clear_status().unwrap();

        done(sensor);
    }

    #[test]
    fn test_failed_frame_rate_write_keeps_old_rate() {
        let mut expectations = init_transactions();
        expectations.push(
            Transaction::write(ADDR, vec![0x02, 0x01]).with_error(ErrorKind::Other),
        );
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        assert!(sensor.set_frame_rate(FrameRate::Fps1).is_err());
        assert_eq!(sensor.frame_rate(), FrameRate::Fps10);

        done(sensor);
    }

    #[test]
    fn test_read_thermistor() {
        let mut expectations = init_transactions();
        expectations.extend([
            Transaction::write_read(ADDR, vec![0x0E], vec![0x90, 0x01]),
            Transaction::write_read(ADDR, vec![0x0E], vec![0x50, 0x08]),
        ]);
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        assert_approx_eq!(sensor.read_thermistor().unwrap(), 25.0);
        assert_approx_eq!(sensor.read_thermistor().unwrap(), -5.0);

        done(sensor);
    }

    #[test]
    fn test_read_pixel_frame() {
        let mut expectations = init_transactions();
        expectations.extend([pixel_read(0, 100), pixel_read(1, 0xFFF), pixel_read(2, 0xFB0)]);
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        let frame = sensor.read_pixel_frame(3).unwrap();
        assert!(!frame.is_faulted());
        assert_eq!(frame.readings(), &[25.0, -0.25, -20.0]);

        done(sensor);
    }

    #[test]
    fn test_fault_truncates_frame_and_stops_reading() {
        // Pixel 10 decodes to 150 °C; pixels 11.. must not be read at all
        let mut expectations = init_transactions();
        for index in 0..10 {
            expectations.push(pixel_read(index, 100));
        }
        expectations.push(pixel_read(10, 600));
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        let frame = sensor.read_frame().unwrap();
        assert!(frame.is_faulted());
        assert_eq!(frame.len(), 10);
        assert!(frame.readings().iter().all(|&t| t == 25.0));

        done(sensor);
    }

    #[test]
    fn test_boundary_arithmetic_value_is_a_fault() {
        let mut expectations = init_transactions();
        expectations.push(pixel_read(0, 0x7FF));
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        let frame = sensor.read_pixel_frame(64).unwrap();
        assert!(frame.is_faulted());
        assert!(frame.is_empty());

        done(sensor);
    }

    #[test]
    fn test_full_frame_reads_every_pixel_once() {
        let fake = FakeBus::new();
        for index in 0..PIXEL_COUNT {
            fake.set_pixel_raw(index, 80 + index as u16);
        }
        let mut sensor = Amg8833::new(fake.clone(), ADDR).unwrap();
        let before = fake.transactions();

        let frame = sensor.read_frame().unwrap();
        assert!(frame.is_complete());
        assert_eq!(frame.pixel(0, 0), Some(20.0));
        assert_eq!(frame.pixel(7, 7), Some(35.75));
        assert_eq!(fake.transactions() - before, PIXEL_COUNT);
    }

    #[test]
    fn test_pixel_count_is_clamped() {
        let fake = FakeBus::new();
        let mut sensor = Amg8833::new(fake.clone(), ADDR).unwrap();
        let before = fake.transactions();

        let frame = sensor.read_pixel_frame(200).unwrap();
        assert_eq!(frame.len(), PIXEL_COUNT);
        assert_eq!(fake.transactions() - before, PIXEL_COUNT);
    }

    #[test]
    fn test_bus_error_mid_frame_propagates() {
        let mut expectations = init_transactions();
        expectations.push(pixel_read(0, 100));
        expectations.push(pixel_read(1, 100).with_error(ErrorKind::Bus));
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        assert_eq!(
            sensor.read_frame(),
            Err(RegisterError::Bus(I2cBusError::Bus))
        );

        done(sensor);
    }

    #[test]
    fn test_status_and_interrupt_table() {
        let mut expectations = init_transactions();
        expectations.push(Transaction::write_read(ADDR, vec![0x04], vec![0x06]));
        for row in 0..8u8 {
            let bits = if row == 1 { 0b0000_0100 } else { 0 };
            expectations.push(Transaction::write_read(ADDR, vec![0x10 + row], vec![bits]));
        }
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        let status = sensor.read_status().unwrap();
        assert!(status.interrupt);
        assert!(status.pixel_overflow);
        assert!(!status.thermistor_overflow);

        // Pixel 10 = row 1, bit 2
        assert_eq!(sensor.read_interrupt_table().unwrap(), 1 << 10);

        done(sensor);
    }

    #[test]
    fn test_interrupt_levels() {
        let mut expectations = init_transactions();
        expectations.extend([
            // 30 °C = 120 = 0x078
            Transaction::write(ADDR, vec![0x08, 0x78]),
            Transaction::write(ADDR, vec![0x09, 0x00]),
            // -5 °C = -20 = 0xFEC
            Transaction::write(ADDR, vec![0x0A, 0xEC]),
            Transaction::write(ADDR, vec![0x0B, 0x0F]),
            // 2 °C = 8
            Transaction::write(ADDR, vec![0x0C, 0x08]),
            Transaction::write(ADDR, vec![0x0D, 0x00]),
        ]);
        let mock = Mock::new(&expectations);
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock), ADDR).unwrap();

        let levels = InterruptLevels {
            upper_c: 30.0,
            lower_c: -5.0,
            hysteresis_c: 2.0,
        };
        sensor.set_interrupt_levels(&levels).unwrap();

        done(sensor);
    }

    #[test]
    fn test_close_then_operations_fail_closed() {
        let mut mock = Mock::new(&init_transactions());
        let mut sensor = Amg8833::new(EmbeddedHalBus::new(mock.clone()), ADDR).unwrap();

        assert!(sensor.close().is_some());
        assert!(sensor.is_closed());
        assert!(sensor.close().is_none());

        assert_eq!(sensor.read_frame(), Err(RegisterError::Closed));
        assert_eq!(sensor.read_thermistor(), Err(RegisterError::Closed));
        assert_eq!(
            sensor.set_frame_rate(FrameRate::Fps1),
            Err(RegisterError::Closed)
        );
        assert_eq!(sensor.clear_status(), Err(RegisterError::Closed));
        assert_eq!(sensor.frame_rate(), FrameRate::Fps10);

        mock.done();
    }
}
