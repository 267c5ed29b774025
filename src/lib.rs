#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate logger;

mod config;
mod indicator;
mod info;
mod monitor;

pub use config::BatteryFuelConfig;
pub use indicator::{LowPowerIndicator, PresetControl};
pub use info::{BatteryAlerts, BatteryInfo};
pub use max17048;
pub use monitor::BatteryFuel;

/// Millisecond timestamp supplied by the caller's scheduler.
pub type Instant = fugit::TimerInstantU64<1000>;
pub type Duration = fugit::MillisDurationU64;
