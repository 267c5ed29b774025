mod common;

use battery_fuel::{
    max17048::{InitError, PowerMode},
    BatteryFuel, BatteryFuelConfig, Instant,
};
use common::*;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

type Monitor = BatteryFuel<Max17048Sim, Presets>;

const NO_DEVICE: ErrorKind = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);

fn at(ms: u64) -> Instant {
    Instant::from_ticks(ms)
}

fn monitor(sim: Max17048Sim) -> Monitor {
    BatteryFuel::new(sim, Presets::new(5), BatteryFuelConfig::default())
}

fn running_monitor() -> Monitor {
    let mut sim = Max17048Sim::new();
    sim.set_word(VCELL, 47360);
    sim.set_word(SOC, 50 * 256);

    let mut monitor = monitor(sim);
    monitor.setup(at(0)).unwrap();
    monitor
}

fn bus(monitor: &mut Monitor) -> &mut Max17048Sim {
    monitor.fuel_gauge_mut().inner_mut()
}

#[test]
fn setup_configures_the_gauge() {
    let mut sim = Max17048Sim::new();
    sim.set_byte(MODE, 0x20);
    sim.set_word(CONFIG, 0x979C);

    let mut monitor = monitor(sim);
    assert!(!monitor.is_initialized());
    assert_eq!(monitor.setup(at(0)), Ok(()));
    assert!(monitor.is_initialized());
    assert_eq!(monitor.fuel_gauge_mut().power_mode(), Ok(PowerMode::Active));

    let (sim, presets) = monitor.release();
    assert_eq!(sim.resets, 1);
    assert_eq!(sim.byte(VALRT_MIN), 160);
    assert_eq!(sim.byte(VALRT_MAX), 210);
    assert_eq!(sim.byte(STATUS) & 0x01, 0);
    assert_eq!(sim.byte(MODE) & 0x20, 0);
    assert_eq!(sim.word(CONFIG), 0x971C);
    assert!(presets.applied.is_empty());
}

#[test]
fn setup_fails_without_device() {
    let mut sim = Max17048Sim::new();
    sim.present = false;

    let mut monitor = monitor(sim);
    assert_eq!(monitor.setup(at(0)), Err(InitError::Transfer(NO_DEVICE)));
    assert!(!monitor.is_initialized());
    assert_eq!(monitor.poll(at(0)), Ok(false));
    assert_eq!(bus(&mut monitor).transactions, 1);

    bus(&mut monitor).present = true;
    assert_eq!(monitor.setup(at(0)), Ok(()));
    assert_eq!(monitor.poll(at(0)), Ok(true));
}

#[test]
fn setup_fails_when_reset_is_acknowledged() {
    let mut sim = Max17048Sim::new();
    sim.acknowledge_reset = true;

    let mut monitor = monitor(sim);
    assert_eq!(monitor.setup(at(0)), Err(InitError::ResetAcknowledged));
    assert!(!monitor.is_initialized());
}

#[test]
fn setup_rejects_other_chips() {
    let mut sim = Max17048Sim::new();
    sim.set_word(VERSION, 0x0020);

    let mut monitor = monitor(sim);
    assert_eq!(monitor.setup(at(0)), Err(InitError::DeviceNotFound(0x0020)));
    assert_eq!(bus(&mut monitor).resets, 0);
}

#[test]
fn idle_monitor_does_not_touch_the_bus() {
    let expectations: [Transaction; 0] = [];
    let mut monitor = BatteryFuel::new(
        Mock::new(&expectations),
        Presets::new(5),
        BatteryFuelConfig::default(),
    );

    assert_eq!(monitor.poll(at(100_000)), Ok(false));
    assert_eq!(monitor.apply_config(BatteryFuelConfig::default()), Ok(()));

    let (mut i2c, _) = monitor.release();
    i2c.done();
}

#[test]
fn readings_follow_the_interval() {
    let mut monitor = running_monitor();
    bus(&mut monitor).set_word(SOC, 12345);
    bus(&mut monitor).set_word(CRATE, 10);

    assert_eq!(monitor.poll(at(0)), Ok(true));

    let info = monitor.info();
    assert_eq!(info.voltage, 3.7);
    assert_eq!(info.percentage, 48.22);
    assert_eq!(info.charge_rate, 2.08);
    assert_eq!(info.charge_time, 0.48);
    assert!(!info.hibernating);
    assert_eq!(info.capacity, 5200);
    assert!(!info.is_low);

    assert_eq!(monitor.poll(at(19_999)), Ok(false));
    assert_eq!(monitor.poll(at(20_000)), Ok(true));
    assert_eq!(monitor.poll(at(39_999)), Ok(false));
    assert_eq!(monitor.poll(at(40_000)), Ok(true));
}

#[test]
fn discharging_reports_negative_rate() {
    let mut monitor = running_monitor();
    bus(&mut monitor).set_word(CRATE, 0xFFF6);

    assert_eq!(monitor.poll(at(0)), Ok(true));

    let info = monitor.info();
    assert_eq!(info.charge_rate, -2.08);
    assert_eq!(info.charge_time, -0.48);
}

#[test]
fn hibernation_slows_down_reading() {
    let mut monitor = running_monitor();
    bus(&mut monitor).set_hibernating(true);

    assert_eq!(monitor.poll(at(0)), Ok(true));
    assert!(monitor.info().hibernating);
    assert_eq!(monitor.poll(at(20_000)), Ok(false));

    bus(&mut monitor).set_hibernating(false);
    assert_eq!(monitor.poll(at(40_000)), Ok(true));
    assert!(!monitor.info().hibernating);

    assert_eq!(monitor.poll(at(59_999)), Ok(false));
    assert_eq!(monitor.poll(at(60_000)), Ok(true));
}

#[test]
fn unexpected_reset_restores_alert_voltages() {
    let mut monitor = running_monitor();
    assert_eq!(monitor.poll(at(0)), Ok(true));

    bus(&mut monitor).power_on();
    assert_eq!(bus(&mut monitor).byte(VALRT_MIN), 0x00);

    assert_eq!(monitor.poll(at(20_000)), Ok(true));

    let sim = bus(&mut monitor);
    assert_eq!(sim.byte(VALRT_MIN), 160);
    assert_eq!(sim.byte(VALRT_MAX), 210);
    assert_eq!(sim.byte(STATUS) & 0x01, 0);
}

#[test]
fn alerts_are_recorded_and_cleared_one_by_one() {
    let mut monitor = running_monitor();
    bus(&mut monitor).set_byte(STATUS, 0b0100_0110);

    assert_eq!(monitor.poll(at(0)), Ok(true));

    let alerts = monitor.info().alerts;
    assert!(alerts.high_voltage);
    assert!(alerts.low_voltage);
    assert!(!alerts.low_soc);
    assert_eq!(bus(&mut monitor).byte(STATUS), 0b0100_0000);

    bus(&mut monitor).set_byte(STATUS, 0b0001_0000);
    assert_eq!(monitor.poll(at(20_000)), Ok(true));

    let alerts = monitor.info().alerts;
    assert!(!alerts.high_voltage);
    assert!(!alerts.low_voltage);
    assert!(alerts.low_soc);
    assert_eq!(bus(&mut monitor).byte(STATUS), 0);
}

#[test]
fn low_battery_switches_preset() {
    let mut monitor = running_monitor();
    bus(&mut monitor).set_word(SOC, 15 * 256);

    assert_eq!(monitor.poll(at(0)), Ok(true));

    let info = monitor.info();
    assert!(info.is_low);
    assert!(info.alerts.low_power_active);

    bus(&mut monitor).set_word(SOC, 60 * 256);
    assert_eq!(monitor.poll(at(20_000)), Ok(true));
    assert!(!monitor.info().alerts.low_power_active);

    let (_, presets) = monitor.release();
    assert_eq!(presets.applied, [199, 5]);
    assert_eq!(presets.current, 5);
}

#[test]
fn apply_config_updates_the_gauge() {
    let mut monitor = running_monitor();

    let mut config = BatteryFuelConfig::default();
    config.set_low_voltage(3.0);
    config.set_high_voltage(4.1);
    assert_eq!(monitor.apply_config(config), Ok(()));

    assert_eq!(monitor.config().low_voltage(), 3.0);
    assert_eq!(bus(&mut monitor).byte(VALRT_MIN), 150);
    assert_eq!(bus(&mut monitor).byte(VALRT_MAX), 205);
}

#[test]
fn apply_config_clamps_the_interval() {
    let mut monitor = running_monitor();

    let mut config = BatteryFuelConfig::default();
    config.set_reading_interval(battery_fuel::Duration::millis(100));
    monitor.apply_config(config).unwrap();

    assert_eq!(monitor.poll(at(0)), Ok(true));
    assert_eq!(monitor.poll(at(2_999)), Ok(false));
    assert_eq!(monitor.poll(at(3_000)), Ok(true));
}

#[test]
fn disabling_dimming_restores_preset() {
    let mut monitor = running_monitor();
    bus(&mut monitor).set_word(SOC, 10 * 256);
    assert_eq!(monitor.poll(at(0)), Ok(true));

    let mut config = BatteryFuelConfig::default();
    config.set_low_power_dim(false);
    monitor.apply_config(config).unwrap();
    assert!(!monitor.info().alerts.low_power_active);

    assert_eq!(monitor.poll(at(20_000)), Ok(true));

    let (_, presets) = monitor.release();
    assert_eq!(presets.applied, [199, 5]);
}

#[test]
fn failed_reading_is_rescheduled() {
    let mut monitor = running_monitor();
    bus(&mut monitor).present = false;

    assert_eq!(monitor.poll(at(0)), Err(NO_DEVICE));
    assert_eq!(monitor.poll(at(10_000)), Ok(false));

    bus(&mut monitor).present = true;
    assert_eq!(monitor.poll(at(20_000)), Ok(true));
}

#[test]
fn gauge_stays_reachable_through_the_monitor() {
    let mut monitor = running_monitor();

    let fg = monitor.fuel_gauge_mut();
    fg.compensate_temperature(30.0).unwrap();
    fg.quick_start().unwrap();
    assert_eq!(fg.rcomp(), Ok(0x92));
    assert_eq!(fg.chip_id(), Ok(0x42));
    assert_eq!(fg.ic_version(), Ok(0x0012));

    let sim = bus(&mut monitor);
    assert_eq!(sim.word(CONFIG), 0x921C);
    assert_eq!(sim.byte(MODE) & 0x40, 0);
}

#[test]
fn stored_config_is_clamped_when_applied() {
    let mut monitor = running_monitor();

    let config: BatteryFuelConfig =
        serde_json::from_str(r#"{"reading_interval_ms":0,"low_voltage":4.0}"#).unwrap();
    monitor.apply_config(config).unwrap();

    assert_eq!(
        monitor.config().reading_interval(),
        battery_fuel::Duration::millis(3_000)
    );
    assert_eq!(bus(&mut monitor).byte(VALRT_MIN), 200);
    assert_eq!(bus(&mut monitor).byte(VALRT_MAX), 235);
}

#[test]
fn battery_is_not_low_before_the_first_reading() {
    let mut sim = Max17048Sim::new();
    sim.present = false;

    let mut monitor = monitor(sim);
    assert!(!monitor.info().is_low);

    assert!(monitor.setup(at(0)).is_err());
    let info = monitor.info();
    assert!(!info.is_low);
    assert_eq!(info.percentage, 0.0);
    assert_eq!(info.capacity, 5200);

    bus(&mut monitor).present = true;
    bus(&mut monitor).set_word(SOC, 10 * 256);
    monitor.setup(at(0)).unwrap();
    assert!(!monitor.info().is_low);

    assert_eq!(monitor.poll(at(0)), Ok(true));
    assert!(monitor.info().is_low);
}
