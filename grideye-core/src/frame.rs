//! Temperature frames
//!
//! A frame is the decoded pixel array in raster order (row 0 first,
//! column 0 first within a row) plus a fault flag. A faulted frame stops at
//! the first pixel that decoded outside the valid range: the offending
//! pixel and everything after it are absent.

use heapless::Vec;

use crate::registers::{GRID_WIDTH, PIXEL_COUNT};

/// Decoded pixel temperatures in °C
pub type Readings = Vec<f32, PIXEL_COUNT>;

/// One read of the pixel array
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureFrame {
    /// Pixel temperatures decoded so far
    readings: Readings,
    /// A pixel fell outside the valid range
    faulted: bool,
}

impl Default for TemperatureFrame {
    fn default() -> Self {
        Self::unread()
    }
}

impl TemperatureFrame {
    /// An empty, healthy frame to decode pixels into
    pub const fn new() -> Self {
        Self {
            readings: Vec::new(),
            faulted: false,
        }
    }

    /// Placeholder for "nothing has been read yet"
    ///
    /// Empty and faulted, so it can never be mistaken for a real reading.
    pub const fn unread() -> Self {
        Self {
            readings: Vec::new(),
            faulted: true,
        }
    }

    /// Build a frame from already-decoded values
    ///
    /// Values past [`PIXEL_COUNT`] are dropped.
    pub fn from_readings(values: &[f32], faulted: bool) -> Self {
        let mut readings = Vec::new();
        for &value in values.iter().take(PIXEL_COUNT) {
            // Cannot fail: capacity is PIXEL_COUNT
            let _ = readings.push(value);
        }
        Self { readings, faulted }
    }

    /// Append the next pixel
    ///
    /// Returns the value back if the frame is already full.
    pub fn push(&mut self, celsius: f32) -> Result<(), f32> {
        self.readings.push(celsius)
    }

    /// Mark the frame as faulted
    pub fn fault(&mut self) {
        self.faulted = true;
    }

    /// Pixel temperatures in raster order
    pub fn readings(&self) -> &[f32] {
        &self.readings
    }

    /// Whether a pixel fell outside the valid range
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Number of decoded pixels
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if no pixel was decoded
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Check if every pixel of the array was decoded without fault
    pub fn is_complete(&self) -> bool {
        !self.faulted && self.readings.len() == PIXEL_COUNT
    }

    /// Temperature at `row`, `col` (both 0-7), if it was decoded
    pub fn pixel(&self, row: usize, col: usize) -> Option<f32> {
        if row >= GRID_WIDTH || col >= GRID_WIDTH {
            return None;
        }
        self.readings.get(row * GRID_WIDTH + col).copied()
    }

    /// Hottest decoded pixel
    pub fn max(&self) -> Option<f32> {
        self.readings.iter().copied().reduce(f32::max)
    }

    /// Coldest decoded pixel
    pub fn min(&self) -> Option<f32> {
        self.readings.iter().copied().reduce(f32::min)
    }

    /// Split into the readings and the fault flag
    pub fn into_parts(self) -> (bool, Readings) {
        (self.faulted, self.readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_is_faulted_and_empty() {
        let frame = TemperatureFrame::unread();
        assert!(frame.is_faulted());
        assert!(frame.is_empty());
        assert!(!frame.is_complete());
        assert_eq!(frame, TemperatureFrame::default());
    }

    #[test]
    fn test_complete_frame() {
        let mut frame = TemperatureFrame::new();
        for i in 0..PIXEL_COUNT {
            frame.push(20.0 + i as f32 * 0.25).unwrap();
        }
        assert!(frame.is_complete());
        assert_eq!(frame.push(0.0), Err(0.0));
        assert_eq!(frame.pixel(0, 0), Some(20.0));
        assert_eq!(frame.pixel(1, 0), Some(22.0));
        assert_eq!(frame.pixel(7, 7), Some(35.75));
        assert_eq!(frame.pixel(8, 0), None);
        assert_eq!(frame.min(), Some(20.0));
        assert_eq!(frame.max(), Some(35.75));
    }

    #[test]
    fn test_truncated_frame() {
        let frame = TemperatureFrame::from_readings(&[21.0, 22.5], true);
        assert_eq!(frame.len(), 2);
        assert!(!frame.is_complete());
        assert_eq!(frame.pixel(0, 1), Some(22.5));
        assert_eq!(frame.pixel(0, 2), None);

        let (faulted, readings) = frame.into_parts();
        assert!(faulted);
        assert_eq!(&readings[..], &[21.0, 22.5]);
    }

    #[test]
    fn test_from_readings_drops_extra_values() {
        let values = [1.0f32; PIXEL_COUNT + 4];
        let frame = TemperatureFrame::from_readings(&values, false);
        assert_eq!(frame.len(), PIXEL_COUNT);
        assert!(frame.is_complete());
    }
}
