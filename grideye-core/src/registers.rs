//! AMG88xx register map
//!
//! Addresses and control encodings for the Grid-EYE family. All registers
//! are byte-wide; 16-bit values (thermistor, pixels, interrupt levels) are
//! stored low byte first at consecutive addresses.

/// Default 7-bit I2C address (AD_SELECT pulled high)
pub const DEFAULT_ADDRESS: u8 = 0x69;

/// Alternate 7-bit I2C address (AD_SELECT tied to GND)
pub const ALTERNATE_ADDRESS: u8 = 0x68;

/// Default I2C bus on a Raspberry Pi 2/3/4
pub const DEFAULT_BUS_INDEX: u8 = 1;

/// Pixels in one frame
pub const PIXEL_COUNT: usize = 64;

/// Pixels per row (the array is square)
pub const GRID_WIDTH: usize = 8;

/// Value written to [`Register::StatusClear`] to clear the interrupt and
/// pixel overflow flags
pub const STATUS_CLEAR_ALL: u8 = 0b0000_0110;

/// Register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Power control
    PowerControl = 0x00,
    /// Reset
    Reset = 0x01,
    /// Frame rate
    FrameRate = 0x02,
    /// Interrupt control
    InterruptControl = 0x03,
    /// Status
    Status = 0x04,
    /// Status clear
    StatusClear = 0x05,
    /// Moving average output mode
    Average = 0x07,
    /// Interrupt upper level (low byte)
    InterruptHighLow = 0x08,
    /// Interrupt upper level (high byte)
    InterruptHighHigh = 0x09,
    /// Interrupt lower level (low byte)
    InterruptLowLow = 0x0A,
    /// Interrupt lower level (high byte)
    InterruptLowHigh = 0x0B,
    /// Interrupt hysteresis level (low byte)
    InterruptHysteresisLow = 0x0C,
    /// Interrupt hysteresis level (high byte)
    InterruptHysteresisHigh = 0x0D,
    /// Thermistor output (low byte)
    ThermistorLow = 0x0E,
    /// Thermistor output (high byte)
    ThermistorHigh = 0x0F,
    /// Interrupt result for pixels 1-8; 0x11..=0x17 follow for the rest
    InterruptTable = 0x10,
    /// Pixel 1 output (low byte); each further pixel is 2 addresses on
    PixelBase = 0x80,
}

impl Register {
    /// Number of interrupt result registers
    pub const INTERRUPT_TABLE_LEN: u8 = 8;

    /// Address of the low byte of pixel `index` (0-based raster order)
    ///
    /// Indices past the end of the array wrap inside the pixel block.
    pub const fn pixel(index: usize) -> u8 {
        Register::PixelBase as u8 + (((index % PIXEL_COUNT) as u8) << 1)
    }

    /// Address of the interrupt result register for pixels `8*row..8*row+8`
    pub const fn interrupt_row(row: u8) -> u8 {
        Register::InterruptTable as u8 + (row % Self::INTERRUPT_TABLE_LEN)
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        reg as u8
    }
}

/// Power control modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerMode {
    /// Normal operation
    #[default]
    Normal,
    /// Sleep
    Sleep,
}

impl From<PowerMode> for u8 {
    fn from(mode: PowerMode) -> Self {
        match mode {
            PowerMode::Normal => 0x00,
            PowerMode::Sleep => 0x10,
        }
    }
}

/// Software reset kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetKind {
    /// Clear the status and interrupt table flags only
    Flag,
    /// Flag reset plus reload of the adjustment values
    Initial,
}

impl From<ResetKind> for u8 {
    fn from(kind: ResetKind) -> Self {
        match kind {
            ResetKind::Flag => 0x30,
            ResetKind::Initial => 0x3F,
        }
    }
}

/// Frame rate modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameRate {
    /// 10 frames per second
    #[default]
    Fps10,
    /// 1 frame per second
    Fps1,
}

impl FrameRate {
    /// Time between two frames at this rate, in milliseconds
    pub const fn frame_period_ms(self) -> u64 {
        match self {
            FrameRate::Fps10 => 100,
            FrameRate::Fps1 => 1000,
        }
    }
}

impl From<FrameRate> for u8 {
    fn from(rate: FrameRate) -> Self {
        match rate {
            FrameRate::Fps10 => 0x00,
            FrameRate::Fps1 => 0x01,
        }
    }
}

/// Interrupt control modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterruptMode {
    /// INT output disabled
    #[default]
    Disabled,
    /// Trigger on absolute pixel value
    Absolute,
    /// Trigger on difference from the previous frame
    Difference,
}

impl From<InterruptMode> for u8 {
    fn from(mode: InterruptMode) -> Self {
        match mode {
            InterruptMode::Disabled => 0b0000_0000,
            InterruptMode::Absolute => 0b0000_0001,
            InterruptMode::Difference => 0b0000_0011,
        }
    }
}

/// Decoded status register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// An interrupt has been raised
    pub interrupt: bool,
    /// A pixel output overflowed
    pub pixel_overflow: bool,
    /// The thermistor output overflowed
    pub thermistor_overflow: bool,
}

impl Status {
    /// Parse from the raw status register value
    pub const fn from_register(value: u8) -> Self {
        Self {
            interrupt: value & (1 << 1) != 0,
            pixel_overflow: value & (1 << 2) != 0,
            thermistor_overflow: value & (1 << 3) != 0,
        }
    }

    /// Check if any flag is set
    pub const fn any(&self) -> bool {
        self.interrupt || self.pixel_overflow || self.thermistor_overflow
    }
}
