//! In-memory AMG8833 register file for tests
//!
//! Answers register writes and reads like the real device would, counts
//! bus transactions, and can be told to fail. Clones share state, so a test
//! can keep a handle after moving one into a driver.

use std::sync::{Arc, Mutex};

use grideye_core::registers::{Register, PIXEL_COUNT};
use grideye_hal::{I2cBus, I2cBusError};

#[derive(Debug)]
struct State {
    registers: [u8; 256],
    transactions: usize,
    fail: bool,
}

/// Fake I2C bus backed by a 256-byte register file
#[derive(Debug, Clone)]
pub struct FakeBus {
    state: Arc<Mutex<State>>,
}

impl FakeBus {
    /// All registers zero (every pixel reads 0 °C)
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                registers: [0; 256],
                transactions: 0,
                fail: false,
            })),
        }
    }

    /// Store a raw 16-bit pixel word
    pub fn set_pixel_raw(&self, index: usize, raw: u16) {
        assert!(index < PIXEL_COUNT);
        self.set_word(Register::pixel(index), raw);
    }

    /// Set every pixel to the same raw word
    pub fn fill_pixels(&self, raw: u16) {
        for index in 0..PIXEL_COUNT {
            self.set_pixel_raw(index, raw);
        }
    }

    /// Store a raw 16-bit thermistor word
    pub fn set_thermistor_raw(&self, raw: u16) {
        self.set_word(Register::ThermistorLow.into(), raw);
    }

    /// Read back a register
    pub fn register(&self, address: u8) -> u8 {
        self.lock().registers[address as usize]
    }

    /// Transactions seen so far
    pub fn transactions(&self) -> usize {
        self.lock().transactions
    }

    /// Make every following transaction fail (or succeed again)
    pub fn set_failing(&self, fail: bool) {
        self.lock().fail = fail;
    }

    fn set_word(&self, address: u8, raw: u16) {
        let [lo, hi] = raw.to_le_bytes();
        let mut state = self.lock();
        state.registers[address as usize] = lo;
        state.registers[address as usize + 1] = hi;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, State>, I2cBusError> {
        let mut state = self.lock();
        state.transactions += 1;
        if state.fail {
            return Err(I2cBusError::Nack);
        }
        Ok(state)
    }
}

impl I2cBus for FakeBus {
    type Error = I2cBusError;

    fn write(&mut self, _address: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.begin()?;
        if let [register, value] = data {
            state.registers[*register as usize] = *value;
        }
        Ok(())
    }

    fn read(&mut self, _address: u8, _buf: &mut [u8]) -> Result<(), Self::Error> {
        self.begin()?;
        Err(I2cBusError::Other)
    }

    fn write_read(
        &mut self,
        _address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        let state = self.begin()?;
        let start = write_data.first().copied().unwrap_or(0) as usize;
        for (offset, byte) in read_buf.iter_mut().enumerate() {
            *byte = state.registers[(start + offset) % 256];
        }
        Ok(())
    }
}
