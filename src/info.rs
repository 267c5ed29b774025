#[cfg(not(test))]
use micromath::F32Ext;

/// Alerts seen in the most recent reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryAlerts {
    pub low_voltage: bool,
    pub high_voltage: bool,
    pub low_soc: bool,
    /// The low power preset is currently applied.
    pub low_power_active: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryInfo {
    /// V
    pub voltage: f32,
    /// %
    pub percentage: f32,
    /// %/hr, negative while discharging
    pub charge_rate: f32,
    /// hours
    pub charge_time: f32,
    pub hibernating: bool,
    /// mAh
    pub capacity: u32,
    pub is_low: bool,
    pub alerts: BatteryAlerts,
}

impl BatteryInfo {
    /// Rounds the measurements to two decimals for display.
    pub(crate) fn rounded(self) -> Self {
        Self {
            voltage: round2(self.voltage),
            percentage: round2(self.percentage),
            charge_rate: round2(self.charge_rate),
            charge_time: round2(self.charge_time),
            ..self
        }
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Hours to go at the given rate, zero when the charge is not changing.
pub(crate) fn charge_time(charge_rate: f32) -> f32 {
    if charge_rate == 0.0 {
        0.0
    } else {
        1.0 / charge_rate
    }
}
