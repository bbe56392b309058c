//! Scaling between raw register values and engineering units.
//!
//! All integer conversions truncate toward zero.

/// Convert a raw VUV/VOV register byte to the comparison voltage
///
/// Computes `raw * 16 / 1.5` using exact integer arithmetic.
#[must_use]
pub const fn threshold_from_raw(raw: u8) -> u16 {
    (raw as u16 * 32) / 3
}

/// Convert a comparison voltage back to a raw VUV/VOV register byte
///
/// Computes `voltage * 1.5 / 16`, saturating at `0xFF`.
#[must_use]
pub const fn threshold_to_raw(voltage: u16) -> u8 {
    let raw = (voltage as u32 * 3) / 32;
    if raw > u8::MAX as u32 {
        u8::MAX
    } else {
        raw as u8
    }
}

/// Convert a 12-bit ADC result to volts (1.5 mV per LSB)
#[must_use]
pub fn adc_to_volts(raw: u16) -> f32 {
    f32::from(raw) * 1.5 / 1000.0
}

/// Convert the 12-bit internal temperature result to whole degrees Celsius
///
/// Computes `raw * 1.5 / 8 - 273`, truncated toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn internal_celsius(raw: u16) -> i16 {
    let sixteenths = raw as i32 * 3 - 273 * 16;
    (sixteenths / 16) as i16
}
