//! Thermal array sensor trait

use crate::frame::TemperatureFrame;
use crate::registers::FrameRate;

/// Trait for thermopile array sensors
///
/// Reads are blocking and each one may issue bus transactions, which is
/// why they take `&mut self`. Implementations decide what "fault" means
/// for a frame; the flag travels in the returned [`TemperatureFrame`], it
/// is never an `Err`.
pub trait ThermalSensor {
    /// Error type for transport failures and use after close
    type Error;

    /// Read the full pixel array
    fn read_frame(&mut self) -> Result<TemperatureFrame, Self::Error>;

    /// Read the ambient (thermistor) temperature in °C
    fn read_ambient(&mut self) -> Result<f32, Self::Error>;

    /// Change the sensor frame rate
    fn set_frame_rate(&mut self, rate: FrameRate) -> Result<(), Self::Error>;

    /// The frame rate the sensor is currently configured for
    fn frame_rate(&self) -> FrameRate;

    /// Release the underlying bus
    ///
    /// Calling this more than once is harmless. Every read afterwards
    /// fails.
    fn close(&mut self);
}
