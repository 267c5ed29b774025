#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate logger;

use device_descriptor::Register;
use embedded_hal::i2c::I2c;
use register_access::{RegisterAccess, RegisterReader, RegisterWriter};

use crate::descriptors::*;

mod alert;
pub mod descriptors;
pub mod ll;
pub mod units;

pub use alert::{decode_status, encode_status, AlertFlag, AlertFlags};

const VERSION_MASK: u16 = 0xFFF0;
const VERSION_MAX1704X: u16 = 0x0010;

/// Writing this to CMD performs a power-on reset.
const RESET_COMMAND: u16 = 0x5400;

const THRESHOLD_MIN: u8 = 0x00;
const THRESHOLD_MAX: u8 = 0xFF;

/// ATHD encodes the empty alert threshold as 32% - ATHD.
const EMPTY_ALERT_BASE: u8 = 32;

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E> {
    Transfer(E),
    /// The version register does not identify a MAX17048/MAX17049.
    DeviceNotFound(u16),
    /// The reset command was acknowledged, which means the IC did not reset.
    ResetAcknowledged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    Active,
    /// The IC lowered its sampling rate because the cell is not changing.
    Hibernating,
    /// Ultra-low-power mode forced by the host, no measurements are taken.
    Sleeping,
}

impl PowerMode {
    /// Derives the mode from MODE.EnSleep, CONFIG.SLEEP and MODE.HibStat.
    ///
    /// ```rust
    /// # use max17048::PowerMode;
    /// assert_eq!(PowerMode::decode(true, true, false), PowerMode::Sleeping);
    /// assert_eq!(PowerMode::decode(false, true, true), PowerMode::Hibernating);
    /// assert_eq!(PowerMode::decode(false, true, false), PowerMode::Active);
    /// ```
    pub fn decode(sleep_enabled: bool, sleep_forced: bool, hibernating: bool) -> Self {
        if sleep_enabled && sleep_forced {
            PowerMode::Sleeping
        } else if hibernating {
            PowerMode::Hibernating
        } else {
            PowerMode::Active
        }
    }
}

pub struct Max17048<I> {
    iface: ll::Max17048I2cInterface<I>,
}

impl<I> Max17048<I> {
    pub const fn new(i2c: I) -> Self {
        Self {
            iface: ll::Max17048I2cInterface { i2c },
        }
    }

    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.iface.i2c
    }

    pub fn release(self) -> I {
        self.iface.i2c
    }
}

impl<I> Max17048<I>
where
    I: I2c,
{
    /// Checks the chip identity, resets it and leaves sleep mode disabled.
    pub fn begin(&mut self) -> Result<(), InitError<I::Error>> {
        self.iface.check_presence().map_err(|e| {
            warn!(
                "No device at address {:#x}",
                ll::Max17048I2cInterface::<I>::DEVICE_ADDR
            );
            InitError::Transfer(e)
        })?;

        let version = self.ic_version().map_err(InitError::Transfer)?;
        if (version & VERSION_MASK) != VERSION_MAX1704X {
            warn!("Unexpected IC version: {:#x}", version);
            return Err(InitError::DeviceNotFound(version));
        }

        self.reset()?;

        self.enable_sleep(false).map_err(InitError::Transfer)?;
        self.sleep(false).map_err(InitError::Transfer)?;

        debug!("Fuel gauge initialized, version {:#x}", version);

        Ok(())
    }

    /// Performs a soft reset and clears the reset indicator.
    pub fn reset(&mut self) -> Result<(), InitError<I::Error>> {
        let command = Cmd::new(|reg| reg.command().write(RESET_COMMAND));

        // The IC resets its I2C interface while processing the command, so a
        // successful reset is never acknowledged.
        if command.write(&mut self.iface).is_ok() {
            warn!("Reset command was acknowledged");
            return Err(InitError::ResetAcknowledged);
        }

        self.clear_alert_flags(AlertFlag::ResetIndicator)
            .map_err(InitError::Transfer)
    }

    /// Returns the IC production version.
    pub fn ic_version(&mut self) -> Result<u16, I::Error> {
        let reg = Version::read(&mut self.iface)?;
        Ok(reg.version().read())
    }

    /// Returns the semi-unique chip ID.
    pub fn chip_id(&mut self) -> Result<u8, I::Error> {
        let reg = ChipId::read(&mut self.iface)?;
        Ok(reg.id().read())
    }

    /// Returns the cell voltage in V.
    pub fn cell_voltage(&mut self) -> Result<f32, I::Error> {
        let reg = VCell::read(&mut self.iface)?;
        Ok(units::raw_to_volts(reg.voltage().read()))
    }

    /// Returns the state of charge in %.
    pub fn cell_percent(&mut self) -> Result<f32, I::Error> {
        let reg = Soc::read(&mut self.iface)?;
        Ok(units::raw_to_percent(reg.percentage().read()))
    }

    /// Returns the charge rate in %/hr. Negative while discharging.
    pub fn charge_rate(&mut self) -> Result<f32, I::Error> {
        let reg = CRate::read(&mut self.iface)?;
        Ok(units::raw_to_charge_rate(reg.rate().read()))
    }

    /// Sets the voltage below which the IC considers the battery removed and
    /// reinserted. Rounded to 40mV steps, clamped to 0..=5.08V.
    pub fn set_reset_voltage(&mut self, volts: f32) -> Result<(), I::Error> {
        let raw = units::to_steps(volts, units::VRESET_LSB, units::VRESET_MAX);
        self.iface
            .modify_register::<VReset>(|reg| reg.voltage().write(raw))
    }

    pub fn reset_voltage(&mut self) -> Result<f32, I::Error> {
        let reg = VReset::read(&mut self.iface)?;
        Ok(reg.voltage().read() as f32 * units::VRESET_LSB)
    }

    /// Sets the voltage alert window. Rounded to 20mV steps, clamped to 0..=5.1V.
    pub fn set_alert_voltages(&mut self, min: f32, max: f32) -> Result<(), I::Error> {
        let min = units::to_steps(min, units::VALERT_LSB, u8::MAX);
        let max = units::to_steps(max, units::VALERT_LSB, u8::MAX);

        VAlrtMin::new(|reg| reg.voltage().write(min)).write(&mut self.iface)?;
        VAlrtMax::new(|reg| reg.voltage().write(max)).write(&mut self.iface)
    }

    /// Returns the voltage alert window as `(min, max)` in V.
    pub fn alert_voltages(&mut self) -> Result<(f32, f32), I::Error> {
        let min = VAlrtMin::read(&mut self.iface)?;
        let max = VAlrtMax::read(&mut self.iface)?;

        Ok((
            min.voltage().read() as f32 * units::VALERT_LSB,
            max.voltage().read() as f32 * units::VALERT_LSB,
        ))
    }

    /// Sets the OCV change in V that makes the IC exit hibernation.
    pub fn set_activity_threshold(&mut self, volts: f32) -> Result<(), I::Error> {
        let raw = units::to_steps(volts, units::ACTIVITY_LSB, u8::MAX);
        ActThr::new(|reg| reg.threshold().write(raw)).write(&mut self.iface)
    }

    pub fn activity_threshold(&mut self) -> Result<f32, I::Error> {
        let reg = ActThr::read(&mut self.iface)?;
        Ok(reg.threshold().read() as f32 * units::ACTIVITY_LSB)
    }

    /// Sets the charge rate in %/hr below which the IC enters hibernation after 6 minutes.
    pub fn set_hibernation_threshold(&mut self, rate: f32) -> Result<(), I::Error> {
        let raw = units::to_steps(rate, units::CRATE_LSB, u8::MAX);
        HibThr::new(|reg| reg.threshold().write(raw)).write(&mut self.iface)
    }

    pub fn hibernation_threshold(&mut self) -> Result<f32, I::Error> {
        let reg = HibThr::read(&mut self.iface)?;
        Ok(reg.threshold().read() as f32 * units::CRATE_LSB)
    }

    pub fn is_hibernating(&mut self) -> Result<bool, I::Error> {
        let reg = Mode::read(&mut self.iface)?;
        Ok(reg.hibernating().read())
    }

    /// Forces hibernation by making the thresholds impossible to leave.
    pub fn hibernate(&mut self) -> Result<(), I::Error> {
        self.write_hibernation_thresholds(THRESHOLD_MAX)
    }

    /// Leaves hibernation and keeps the IC from entering it again.
    pub fn wake(&mut self) -> Result<(), I::Error> {
        self.write_hibernation_thresholds(THRESHOLD_MIN)
    }

    fn write_hibernation_thresholds(&mut self, value: u8) -> Result<(), I::Error> {
        ActThr::new(|reg| reg.threshold().write(value)).write(&mut self.iface)?;
        HibThr::new(|reg| reg.threshold().write(value)).write(&mut self.iface)
    }

    /// Forces (or releases) ultra-low-power sleep. Has no effect unless sleep is enabled.
    pub fn sleep(&mut self, sleep: bool) -> Result<(), I::Error> {
        self.iface
            .modify_register::<Config>(|reg| reg.sleep().write(sleep))
    }

    pub fn enable_sleep(&mut self, enable: bool) -> Result<(), I::Error> {
        self.iface
            .modify_register::<Mode>(|reg| reg.enable_sleep().write(enable))
    }

    /// Restarts the fuel-gauge calculations. Avoid while the cell is under load
    /// or right after insertion, the estimate may end up worse.
    pub fn quick_start(&mut self) -> Result<(), I::Error> {
        self.iface
            .modify_register::<Mode>(|reg| reg.quick_start().write(true))
    }

    pub fn power_mode(&mut self) -> Result<PowerMode, I::Error> {
        let mode = Mode::read(&mut self.iface)?;
        let config = Config::read(&mut self.iface)?;

        Ok(PowerMode::decode(
            mode.enable_sleep().read(),
            config.sleep().read(),
            mode.hibernating().read(),
        ))
    }

    /// Returns whether the ALRT output is asserted.
    pub fn is_active_alert(&mut self) -> Result<bool, I::Error> {
        let reg = Config::read(&mut self.iface)?;
        Ok(reg.alert().read())
    }

    /// Releases the ALRT output. Status flags are not affected.
    pub fn clear_active_alert(&mut self) -> Result<(), I::Error> {
        self.iface
            .modify_register::<Config>(|reg| reg.alert().write(false))
    }

    pub fn alert_status(&mut self) -> Result<AlertFlags, I::Error> {
        let reg = Status::read(&mut self.iface)?;
        Ok(decode_status(reg.flags().read()))
    }

    /// Clears the given status flags, leaving every other bit untouched.
    pub fn clear_alert_flags(&mut self, flags: impl Into<AlertFlags>) -> Result<(), I::Error> {
        let mask = encode_status(flags.into());
        self.iface.modify_register::<Status>(|reg| {
            let flags = reg.flags().read();
            reg.flags().write(flags & !mask)
        })
    }

    pub fn set_voltage_reset_alert(&mut self, enable: bool) -> Result<(), I::Error> {
        self.iface
            .modify_register::<Status>(|reg| reg.env_reset_alert().write(enable))
    }

    /// Enables the alert on every 1% SOC change.
    pub fn set_soc_change_alert(&mut self, enable: bool) -> Result<(), I::Error> {
        self.iface
            .modify_register::<Config>(|reg| reg.alsc().write(enable))
    }

    /// Returns the SOC in % below which the SOC low alert fires.
    pub fn empty_alert_threshold(&mut self) -> Result<u8, I::Error> {
        let reg = Config::read(&mut self.iface)?;
        Ok(EMPTY_ALERT_BASE - reg.athd().read())
    }

    /// Sets the SOC low alert threshold, clamped to 1..=32%.
    pub fn set_empty_alert_threshold(&mut self, percent: u8) -> Result<(), I::Error> {
        let athd = EMPTY_ALERT_BASE - percent.clamp(1, EMPTY_ALERT_BASE);
        self.iface
            .modify_register::<Config>(|reg| reg.athd().write(athd))
    }

    pub fn rcomp(&mut self) -> Result<u8, I::Error> {
        let reg = Config::read(&mut self.iface)?;
        Ok(reg.rcomp().read())
    }

    pub fn set_rcomp(&mut self, rcomp: u8) -> Result<(), I::Error> {
        self.iface
            .modify_register::<Config>(|reg| reg.rcomp().write(rcomp))
    }

    /// Adjusts RCOMP for the cell temperature in °C.
    pub fn compensate_temperature(&mut self, celsius: f32) -> Result<(), I::Error> {
        let rcomp = units::rcomp_for_temperature(celsius);
        trace!("RCOMP for {} C: {:#x}", celsius, rcomp);
        self.set_rcomp(rcomp)
    }
}
