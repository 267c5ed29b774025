//! Conversions between raw register values and physical quantities.
//!
//! Every quantity has a single scale factor and no offset.

#[cfg(not(test))]
use micromath::F32Ext;

/// VCELL LSB in μV.
pub const VCELL_LSB_UV: f32 = 78.125;
/// SOC LSB is 1/256%.
pub const SOC_DIVIDER: f32 = 256.0;
/// CRATE and HibThr LSB in %/hr.
pub const CRATE_LSB: f32 = 0.208;
/// VRESET LSB in V.
pub const VRESET_LSB: f32 = 0.04;
/// VALRT LSB in V.
pub const VALERT_LSB: f32 = 0.02;
/// ActThr LSB in V.
pub const ACTIVITY_LSB: f32 = 0.00125;

/// Largest value of the 7-bit VRESET field.
pub const VRESET_MAX: u8 = 0x7F;

/// Converts the raw VCELL register value to Volts.
///
/// ```rust
/// # use max17048::units::raw_to_volts;
/// assert_eq!(raw_to_volts(0), 0.0);
/// assert_eq!(raw_to_volts(51200), 4.0);
/// assert_eq!(raw_to_volts(1), 0.000078125);
/// ```
#[inline]
pub fn raw_to_volts(raw: u16) -> f32 {
    raw as f32 * VCELL_LSB_UV / 1_000_000.0
}

/// Converts the raw SOC register value to percent.
///
/// ```rust
/// # use max17048::units::raw_to_percent;
/// assert_eq!(raw_to_percent(12800), 50.0);
/// assert_eq!(raw_to_percent(25600), 100.0);
/// assert_eq!(raw_to_percent(128), 0.5);
/// ```
#[inline]
pub fn raw_to_percent(raw: u16) -> f32 {
    raw as f32 / SOC_DIVIDER
}

/// Converts the raw CRATE register value to %/hr. Negative values mean discharging.
///
/// ```rust
/// # use max17048::units::raw_to_charge_rate;
/// assert_eq!(raw_to_charge_rate(0), 0.0);
/// assert_eq!(raw_to_charge_rate(1), 0.208);
/// assert_eq!(raw_to_charge_rate(0xFFFF), -0.208);
/// ```
#[inline]
pub fn raw_to_charge_rate(raw: u16) -> f32 {
    raw as i16 as f32 * CRATE_LSB
}

/// Converts a quantity to the nearest register step, clamped to `0..=max`.
///
/// ```rust
/// # use max17048::units::to_steps;
/// assert_eq!(to_steps(3.2, 0.02, 255), 160);
/// assert_eq!(to_steps(-1.0, 0.02, 255), 0);
/// assert_eq!(to_steps(100.0, 0.04, 127), 127);
/// ```
#[inline]
pub fn to_steps(value: f32, lsb: f32, max: u8) -> u8 {
    (value / lsb).round().clamp(0.0, max as f32) as u8
}

/// RCOMP value compensating the battery model for the cell temperature.
///
/// ```rust
/// # use max17048::units::rcomp_for_temperature;
/// assert_eq!(rcomp_for_temperature(20.0), 0x97);
/// assert_eq!(rcomp_for_temperature(30.0), 0x92);
/// assert_eq!(rcomp_for_temperature(10.0), 0xC9);
/// assert_eq!(rcomp_for_temperature(-40.0), 0xFF);
/// ```
#[inline]
pub fn rcomp_for_temperature(celsius: f32) -> u8 {
    const RCOMP_20C: f32 = 0x97 as f32;

    let delta = celsius - 20.0;
    let coefficient = if delta > 0.0 { -0.5 } else { -5.0 };

    (RCOMP_20C + delta * coefficient)
        .round()
        .clamp(0.0, u8::MAX as f32) as u8
}
