//! Typing heat: the intensity that feeds `spawn`.
//!
//! Each keystroke adds heat up to a ceiling; heat bleeds off every tick and collapses
//! to zero once the typist has been idle for `idle_timeout` seconds.

use super::config::{SimulationConfig, TICKS_PER_SECOND};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeatMeter {
    level: f32,
    idle_seconds: f32,
}

impl HeatMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_keystroke(&mut self, config: &SimulationConfig) {
        self.level = (self.level + config.heat_gain).min(config.heat_max);
        self.idle_seconds = 0.0;
    }

    /// Advance by `dt_seconds` of wall time.
    pub fn tick(&mut self, dt_seconds: f32, config: &SimulationConfig) {
        self.idle_seconds += dt_seconds.max(0.0);
        if self.idle_seconds >= config.idle_timeout {
            self.level = 0.0;
            return;
        }
        let ticks = dt_seconds.max(0.0) * TICKS_PER_SECOND;
        self.level = (self.level - config.heat_decay * ticks).max(0.0);
    }

    #[inline]
    pub fn intensity(&self) -> f32 {
        self.level
    }

    pub fn is_idle(&self, config: &SimulationConfig) -> bool {
        self.idle_seconds >= config.idle_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystrokes_saturate_at_max() {
        let config = SimulationConfig::default();
        let mut heat = HeatMeter::new();
        for _ in 0..100 {
            heat.on_keystroke(&config);
        }
        assert_eq!(heat.intensity(), config.heat_max);
    }

    #[test]
    fn heat_bleeds_per_tick() {
        let config = SimulationConfig::default();
        let mut heat = HeatMeter::new();
        heat.on_keystroke(&config);
        heat.on_keystroke(&config);
        heat.tick(1.0 / 60.0, &config);
        let expected = 2.0 * config.heat_gain - config.heat_decay;
        assert!((heat.intensity() - expected).abs() < 1e-5);
    }

    #[test]
    fn heat_never_goes_negative() {
        let config = SimulationConfig::default();
        let mut heat = HeatMeter::new();
        heat.on_keystroke(&config);
        for _ in 0..100 {
            heat.tick(1.0 / 60.0, &config);
        }
        assert_eq!(heat.intensity(), 0.0);
    }

    #[test]
    fn idle_timeout_collapses_heat() {
        let config = SimulationConfig {
            heat_decay: 0.0,
            ..SimulationConfig::default()
        };
        let mut heat = HeatMeter::new();
        heat.on_keystroke(&config);
        heat.tick(config.idle_timeout * 0.5, &config);
        assert!(!heat.is_idle(&config));
        assert_eq!(heat.intensity(), config.heat_gain);

        heat.tick(config.idle_timeout, &config);
        assert!(heat.is_idle(&config));
        assert_eq!(heat.intensity(), 0.0);

        heat.on_keystroke(&config);
        assert!(!heat.is_idle(&config));
    }
}
