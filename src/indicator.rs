use crate::BatteryFuelConfig;

/// Access to the host's lighting presets.
pub trait PresetControl {
    fn current_preset(&self) -> u8;
    fn apply_preset(&mut self, preset: u8);
}

impl<T: PresetControl> PresetControl for &mut T {
    fn current_preset(&self) -> u8 {
        T::current_preset(self)
    }

    fn apply_preset(&mut self, preset: u8) {
        T::apply_preset(self, preset)
    }
}

/// Switches to a dim preset while the battery is low and restores the previous one
/// when it recovers.
#[derive(Debug, Default)]
pub struct LowPowerIndicator {
    saved_preset: Option<u8>,
}

impl LowPowerIndicator {
    pub const fn new() -> Self {
        Self { saved_preset: None }
    }

    pub fn is_active(&self) -> bool {
        self.saved_preset.is_some()
    }

    pub fn update(
        &mut self,
        presets: &mut impl PresetControl,
        config: &BatteryFuelConfig,
        percentage: f32,
    ) {
        let low = config.low_power_dim() && percentage < config.low_power_percentage() as f32;

        if low && self.saved_preset.is_none() {
            let current = presets.current_preset();
            info!(
                "Battery low ({}%), switching to preset {}",
                percentage,
                config.low_power_preset()
            );

            self.saved_preset = Some(current);
            presets.apply_preset(config.low_power_preset());
        } else if !low {
            self.restore(presets);
        }
    }

    /// Re-applies the preset that was active before the battery went low.
    pub fn restore(&mut self, presets: &mut impl PresetControl) {
        if let Some(preset) = self.saved_preset.take() {
            debug!("Restoring preset {}", preset);
            presets.apply_preset(preset);
        }
    }
}
