//! Raw register word decoding
//!
//! Pixels and the thermistor use different 12-bit encodings:
//!
//! - Pixels: two's complement, 0.25 °C per LSB
//! - Thermistor: sign bit plus 11-bit magnitude, 0.0625 °C per LSB
//!
//! Decoding is done on the full 16-bit word as read from the bus. Any bit
//! above the 11-bit magnitude marks the value as negative.

/// °C per pixel LSB
pub const PIXEL_CELSIUS_PER_LSB: f32 = 0.25;

/// °C per thermistor LSB
pub const THERMISTOR_CELSIUS_PER_LSB: f32 = 0.0625;

/// Lowest pixel temperature the sensor is specified for
pub const PIXEL_MIN_C: f32 = -20.0;

/// Highest pixel temperature the sensor is specified for
pub const PIXEL_MAX_C: f32 = 100.0;

/// Mask of the 11-bit magnitude field
const MAGNITUDE_MASK: u16 = 0x7FF;

/// Offset removed from negative two's complement values (2^12)
const TWOS_COMPLEMENT_OFFSET: i32 = 4096;

/// Decode a pixel word as 12-bit two's complement, in LSBs
///
/// A word that fits in 11 bits is positive; anything else is
/// `raw - 4096`.
pub const fn twos_complement_12(raw: u16) -> i32 {
    if raw & MAGNITUDE_MASK == raw {
        raw as i32
    } else {
        raw as i32 - TWOS_COMPLEMENT_OFFSET
    }
}

/// Decode a thermistor word as sign + 11-bit magnitude, in LSBs
///
/// A word that fits in 11 bits is positive; otherwise the low 11 bits are
/// the magnitude of a negative value.
pub const fn signed_magnitude_12(raw: u16) -> i32 {
    if raw & MAGNITUDE_MASK == raw {
        raw as i32
    } else {
        -((raw & MAGNITUDE_MASK) as i32)
    }
}

/// Pixel word to °C
pub fn pixel_celsius(raw: u16) -> f32 {
    twos_complement_12(raw) as f32 * PIXEL_CELSIUS_PER_LSB
}

/// Thermistor word to °C
pub fn thermistor_celsius(raw: u16) -> f32 {
    signed_magnitude_12(raw) as f32 * THERMISTOR_CELSIUS_PER_LSB
}

/// Check a decoded pixel temperature against the sensor's valid range
///
/// Both bounds are inclusive.
pub fn in_valid_range(celsius: f32) -> bool {
    (PIXEL_MIN_C..=PIXEL_MAX_C).contains(&celsius)
}

/// Encode °C as a 12-bit two's complement pixel-scale word
///
/// Used for the interrupt level registers, which share the pixel format.
/// Values are rounded to the nearest LSB and saturated to the 12-bit range.
pub fn celsius_to_pixel_raw(celsius: f32) -> u16 {
    let scaled = celsius / PIXEL_CELSIUS_PER_LSB;
    // no_std: f32::round is not available in core
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5) as i32
    } else {
        (scaled - 0.5) as i32
    };
    let clamped = rounded.clamp(-2048, 2047);
    (clamped as u16) & 0x0FFF
}
