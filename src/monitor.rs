use embedded_hal::i2c::I2c;
use max17048::{AlertFlag, AlertFlags, InitError, Max17048};

use crate::{
    info::{charge_time, BatteryAlerts, BatteryInfo},
    BatteryFuelConfig, Duration, Instant, LowPowerIndicator, PresetControl,
};

/// Reading interval while the gauge hibernates.
const HIBERNATION_READING_INTERVAL: Duration = Duration::millis(40_000);

#[derive(Clone, Copy)]
struct BatteryState {
    voltage: f32,
    percentage: f32,
    charge_rate: f32,
    hibernating: bool,
}

/// Periodically reads a MAX17048 and reacts to its alerts.
pub struct BatteryFuel<I, P> {
    fg: Max17048<I>,
    presets: P,
    config: BatteryFuelConfig,
    indicator: LowPowerIndicator,
    next_read: Option<Instant>,
    battery: Option<BatteryState>,
    alerts: BatteryAlerts,
}

impl<I, P> BatteryFuel<I, P>
where
    I: I2c,
    P: PresetControl,
{
    pub fn new(i2c: I, presets: P, config: BatteryFuelConfig) -> Self {
        Self {
            fg: Max17048::new(i2c),
            presets,
            config: config.normalized(),
            indicator: LowPowerIndicator::new(),
            next_read: None,
            battery: None,
            alerts: BatteryAlerts::default(),
        }
    }

    /// Initializes the gauge. The first reading is due at `now`.
    ///
    /// On failure the monitor stays idle and `setup` may be retried.
    pub fn setup(&mut self, now: Instant) -> Result<(), InitError<I::Error>> {
        self.next_read = None;

        if let Err(e) = self.init_fuel_gauge() {
            warn!("Failed to initialize fuel gauge");
            return Err(e);
        }

        info!("Fuel gauge initialized");
        self.next_read = Some(now);

        Ok(())
    }

    fn init_fuel_gauge(&mut self) -> Result<(), InitError<I::Error>> {
        self.fg.begin()?;
        self.write_alert_voltages().map_err(InitError::Transfer)?;
        self.fg
            .clear_alert_flags(AlertFlag::ResetIndicator)
            .map_err(InitError::Transfer)
    }

    pub fn is_initialized(&self) -> bool {
        self.next_read.is_some()
    }

    pub fn config(&self) -> &BatteryFuelConfig {
        &self.config
    }

    /// Stores the new configuration and pushes the alert window to the gauge.
    pub fn apply_config(&mut self, config: BatteryFuelConfig) -> Result<(), I::Error> {
        self.config = config.normalized();

        if !self.config.low_power_dim() {
            self.indicator.restore(&mut self.presets);
            self.alerts.low_power_active = false;
        }

        if self.is_initialized() {
            self.write_alert_voltages()?;
        }

        Ok(())
    }

    /// Reads the gauge if a reading is due. Returns whether it did.
    ///
    /// The next reading is scheduled even if this one fails.
    pub fn poll(&mut self, now: Instant) -> Result<bool, I::Error> {
        let Some(next_read) = self.next_read else {
            return Ok(false);
        };

        if now < next_read {
            return Ok(false);
        }

        let result = self.read_fuel_gauge();
        if result.is_err() {
            warn!("Failed to read fuel gauge");
        }

        let hibernating = self.battery.is_some_and(|battery| battery.hibernating);
        let interval = if hibernating {
            HIBERNATION_READING_INTERVAL
        } else {
            self.config.reading_interval()
        };
        self.next_read = Some(now + interval);

        result.map(|_| true)
    }

    fn read_fuel_gauge(&mut self) -> Result<(), I::Error> {
        let voltage = self.fg.cell_voltage()?;
        let percentage = self.fg.cell_percent()?;
        let charge_rate = self.fg.charge_rate()?;
        let hibernating = self.fg.is_hibernating()?;

        self.battery = Some(BatteryState {
            voltage,
            percentage,
            charge_rate,
            hibernating,
        });

        debug!(
            "Battery: {} V, {}%, {} %/hr, hibernating: {}",
            voltage, percentage, charge_rate, hibernating
        );

        let status = self.fg.alert_status()?;

        if status.contains(AlertFlag::ResetIndicator) {
            warn!("Fuel gauge was reset, restoring alert voltages");
            self.write_alert_voltages()?;
            self.fg.clear_alert_flags(AlertFlag::ResetIndicator)?;
        }

        self.alerts.high_voltage = self.check_flag_and_clear(status, AlertFlag::VoltageHigh)?;
        self.alerts.low_voltage = self.check_flag_and_clear(status, AlertFlag::VoltageLow)?;
        self.alerts.low_soc = self.check_flag_and_clear(status, AlertFlag::SocLow)?;

        self.indicator
            .update(&mut self.presets, &self.config, percentage);
        self.alerts.low_power_active = self.indicator.is_active();

        Ok(())
    }

    fn check_flag_and_clear(
        &mut self,
        status: AlertFlags,
        flag: AlertFlag,
    ) -> Result<bool, I::Error> {
        if !status.contains(flag) {
            return Ok(false);
        }

        debug!("Fuel gauge alert: {:?}", flag);
        self.fg.clear_alert_flags(flag)?;

        Ok(true)
    }

    fn write_alert_voltages(&mut self) -> Result<(), I::Error> {
        self.fg
            .set_alert_voltages(self.config.low_voltage(), self.config.high_voltage())
    }

    /// Latest reading, rounded for display. Measurements are zero and `is_low` is
    /// false until the first successful reading.
    pub fn info(&self) -> BatteryInfo {
        let Some(battery) = self.battery else {
            return BatteryInfo {
                capacity: self.config.capacity(),
                alerts: self.alerts,
                ..BatteryInfo::default()
            };
        };

        BatteryInfo {
            voltage: battery.voltage,
            percentage: battery.percentage,
            charge_rate: battery.charge_rate,
            charge_time: charge_time(battery.charge_rate),
            hibernating: battery.hibernating,
            capacity: self.config.capacity(),
            is_low: battery.percentage < self.config.low_power_percentage() as f32,
            alerts: self.alerts,
        }
        .rounded()
    }

    /// Direct access to the gauge, e.g. for temperature compensation.
    pub fn fuel_gauge_mut(&mut self) -> &mut Max17048<I> {
        &mut self.fg
    }

    pub fn release(self) -> (I, P) {
        (self.fg.release(), self.presets)
    }
}
