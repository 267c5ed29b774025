use device_descriptor::*;

device! {
    /// VCELL reports the 12-bit ADC measurement of the battery voltage.
    VCell(u16 @ 0x02) {
        /// LSB = 78.125μV
        voltage @ 0..16 => u16
    }
    Soc(u16 @ 0x04) {
        /// The upper byte is the state of charge in whole percent, the lower byte adds
        /// 1/256% resolution.
        percentage @ 0..16 => u16
    }
    /// Only the upper byte of MODE is addressed.
    Mode(u8 @ 0x06, default = 0x00) {
        /// Writing 1 restarts fuel-gauge calculations as if the battery was just inserted.
        /// The bit clears itself.
        quick_start @ 6 => bool,
        /// Enables sleep mode. While cleared, Config.SLEEP is ignored.
        enable_sleep @ 5 => bool,
        /// Read-only, set while the IC is in hibernate mode.
        hibernating @ 4 => bool
    }
    Version(u16 @ 0x08) {
        version @ 0..16 => u16
    }
    HibThr(u8 @ 0x0A, default = 0x80) {
        /// LSB = 0.208%/hr
        threshold @ 0..8 => u8
    }
    ActThr(u8 @ 0x0B, default = 0x30) {
        /// LSB = 1.25mV
        threshold @ 0..8 => u8
    }
    Config(u16 @ 0x0C, default = 0x971C) {
        /// Battery model compensation, adjusted by the host for temperature.
        rcomp @ 8..16 => u8,
        /// Forces the IC into sleep mode when Mode.EnSleep is set.
        sleep @ 7 => bool,
        /// SOC change alert. Asserts ALRT when SOC changes by 1%.
        alsc @ 6 => bool,
        /// Set when an alert is active, write 0 to release the ALRT pin.
        alert @ 5 => bool,
        /// Empty alert threshold, encoded as 32% - ATHD.
        athd @ 0..5 => u8
    }
    VAlrtMin(u8 @ 0x14, default = 0x00) {
        /// LSB = 20mV
        voltage @ 0..8 => u8
    }
    VAlrtMax(u8 @ 0x15, default = 0xFF) {
        /// LSB = 20mV
        voltage @ 0..8 => u8
    }
    CRate(u16 @ 0x16) {
        /// Two's complement, LSB = 0.208%/hr
        rate @ 0..16 => u16
    }
    VReset(u8 @ 0x18, default = 0x96) {
        /// LSB = 40mV
        voltage @ 0..7 => u8
    }
    ChipId(u8 @ 0x19) {
        id @ 0..8 => u8
    }
    /// Only the upper byte of STATUS is addressed.
    Status(u8 @ 0x1A, default = 0x01) {
        /// Enables the voltage reset alert.
        env_reset_alert @ 6 => bool,
        flags @ 0..7 => u8
    }
    Cmd(u16 @ 0xFE, default = 0x0000) {
        command @ 0..16 => u16
    }
}
