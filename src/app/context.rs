//! The shared state snapshot.
//!
//! Written by the sampler and the edge handlers, read by the window
//! controller and both report sinks, always within one loop iteration.

/// Latest validated sensor values plus the deposit counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// Fill level, percent [0, 100].
    pub trash_level: f32,
    /// Last accepted temperature (°C).
    pub temperature: f32,
    /// Last accepted relative humidity (%).
    pub humidity: f32,
    /// Live flame input, refreshed each sample.
    pub flame_detected: bool,
    /// Battery charge, percent [0, 100].
    pub battery_level: f32,
    /// Reward tokens; never decreases.
    pub user_tokens: u32,
    /// Confirmed deposits since boot; never decreases.
    pub daily_deposits: u32,
    /// Commanded flap state (no position feedback exists).
    pub window_open: bool,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            trash_level: 50.0,
            temperature: 25.0,
            humidity: 60.0,
            flame_detected: false,
            battery_level: 100.0,
            user_tokens: 0,
            daily_deposits: 0,
            window_open: false,
        }
    }
}

impl SensorSnapshot {
    /// Credit one confirmed deposit.
    pub fn record_deposit(&mut self, reward: u32) {
        self.daily_deposits = self.daily_deposits.saturating_add(1);
        self.user_tokens = self.user_tokens.saturating_add(reward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_defaults() {
        let s = SensorSnapshot::default();
        assert_eq!(s.trash_level, 50.0);
        assert_eq!(s.battery_level, 100.0);
        assert!(!s.window_open);
        assert_eq!(s.user_tokens, 0);
    }

    #[test]
    fn deposit_bumps_both_counters() {
        let mut s = SensorSnapshot::default();
        s.record_deposit(10);
        s.record_deposit(10);
        assert_eq!(s.daily_deposits, 2);
        assert_eq!(s.user_tokens, 20);
    }
}
