use serde::{Deserialize, Serialize};

use crate::Duration;

const DEFAULT_READING_INTERVAL_MS: u64 = 20_000;
const MIN_READING_INTERVAL_MS: u64 = 3_000;

/// The alert window of a LiPo cell is never narrower than this.
const MIN_VOLTAGE_SPAN: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct BatteryFuelConfig {
    reading_interval_ms: u64,
    low_voltage: f32,
    high_voltage: f32,
    low_power_dim: bool,
    low_power_percentage: u8,
    low_power_preset: u8,
    capacity: u32,
}

impl Default for BatteryFuelConfig {
    fn default() -> Self {
        Self {
            reading_interval_ms: DEFAULT_READING_INTERVAL_MS,
            low_voltage: 3.2,
            high_voltage: 4.2,
            low_power_dim: true,
            low_power_percentage: 20,
            low_power_preset: 199,
            capacity: 5200,
        }
    }
}

impl BatteryFuelConfig {
    /// Re-applies every setter, for values that bypassed them (e.g. deserialized ones).
    pub fn normalized(self) -> Self {
        let mut config = self;

        config.set_reading_interval(Duration::millis(self.reading_interval_ms));
        config.set_low_voltage(self.low_voltage);
        config.set_high_voltage(self.high_voltage);
        config.set_low_power_percentage(self.low_power_percentage);

        config
    }

    pub fn reading_interval(&self) -> Duration {
        Duration::millis(self.reading_interval_ms)
    }

    /// Sets the time between two readings, never shorter than 3 seconds.
    pub fn set_reading_interval(&mut self, interval: Duration) {
        self.reading_interval_ms = interval.to_millis().max(MIN_READING_INTERVAL_MS);
    }

    /// Voltage alert lower bound in V.
    pub fn low_voltage(&self) -> f32 {
        self.low_voltage
    }

    pub fn set_low_voltage(&mut self, volts: f32) {
        self.low_voltage = volts.max(0.0);
        self.set_high_voltage(self.high_voltage);
    }

    /// Voltage alert upper bound in V.
    pub fn high_voltage(&self) -> f32 {
        self.high_voltage
    }

    pub fn set_high_voltage(&mut self, volts: f32) {
        self.high_voltage = volts.max(self.low_voltage + MIN_VOLTAGE_SPAN);
    }

    pub fn low_power_dim(&self) -> bool {
        self.low_power_dim
    }

    pub fn set_low_power_dim(&mut self, enabled: bool) {
        self.low_power_dim = enabled;
    }

    pub fn low_power_percentage(&self) -> u8 {
        self.low_power_percentage
    }

    pub fn set_low_power_percentage(&mut self, percentage: u8) {
        self.low_power_percentage = percentage.min(100);
    }

    pub fn low_power_preset(&self) -> u8 {
        self.low_power_preset
    }

    pub fn set_low_power_preset(&mut self, preset: u8) {
        self.low_power_preset = preset;
    }

    /// Capacity of the cells in parallel, in mAh.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity;
    }
}
