use enumset::{EnumSet, EnumSetType};

/// Flags in the low 7 bits of the STATUS register.
///
/// The discriminant is the bit position.
#[derive(Debug, EnumSetType)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertFlag {
    /// Set after power-up or a soft reset, until cleared by the host.
    ResetIndicator = 0,
    /// VCELL rose above VALRT.MAX.
    VoltageHigh = 1,
    /// VCELL dropped below VALRT.MIN.
    VoltageLow = 2,
    /// VCELL dropped below VRESET.
    VoltageReset = 3,
    /// SOC crossed the empty alert threshold.
    SocLow = 4,
    /// SOC changed by at least 1%.
    SocChange = 5,
    /// Enables the voltage reset alert. Not an alert condition itself.
    VoltageResetAlertEnabled = 6,
}

pub type AlertFlags = EnumSet<AlertFlag>;

pub(crate) const STATUS_FLAG_MASK: u8 = 0x7F;

/// Decodes a STATUS byte, ignoring bit 7.
///
/// ```rust
/// # use max17048::{decode_status, AlertFlag};
/// let flags = decode_status(0b0001_0100);
/// assert!(flags.contains(AlertFlag::VoltageLow));
/// assert!(flags.contains(AlertFlag::SocLow));
/// assert_eq!(flags.len(), 2);
/// ```
pub fn decode_status(status: u8) -> AlertFlags {
    AlertFlags::from_u8_truncated(status & STATUS_FLAG_MASK)
}

/// Encodes alert flags into their STATUS bit positions.
pub fn encode_status(flags: AlertFlags) -> u8 {
    flags.as_u8() & STATUS_FLAG_MASK
}
