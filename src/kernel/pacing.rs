use rand::Rng;
use std::time::Duration;

use crate::config::PacingConfig;

/// Base delay in seconds by (user message short?, reply short?).
fn base_delay(user_short: bool, reply_short: bool) -> f64 {
    match (user_short, reply_short) {
        (true, true) => 0.4,
        (true, false) => 0.7,
        (false, true) => 0.6,
        (false, false) => 0.9,
    }
}

/// Converts message lengths into a human-looking reply delay.
///
/// Pure given the random source; the caller decides whether and how to wait.
#[derive(Debug, Clone)]
pub struct PacingSimulator {
    config: PacingConfig,
}

impl PacingSimulator {
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }

    /// Delay in seconds, always within `[min_delay_secs, max_delay_secs]`.
    pub fn delay_secs<R: Rng + ?Sized>(&self, user_len: usize, reply_len: usize, rng: &mut R) -> f64 {
        let c = &self.config;
        let base = base_delay(user_len <= c.short_user_chars, reply_len <= c.short_reply_chars);

        let chars_per_sec = if c.chars_per_sec_max > c.chars_per_sec_min {
            rng.gen_range(c.chars_per_sec_min..=c.chars_per_sec_max)
        } else {
            c.chars_per_sec_min
        };
        let typing = reply_len as f64 / chars_per_sec;

        // Average of the bucket guess and the typing estimate.
        let estimate = ((base + typing) / 2.0).clamp(c.min_delay_secs, c.max_delay_secs);

        let factor = if c.jitter > 0.0 {
            rng.gen_range((1.0 - c.jitter)..=(1.0 + c.jitter))
        } else {
            1.0
        };

        (estimate * factor).clamp(c.min_delay_secs, c.max_delay_secs)
    }

    pub fn delay<R: Rng + ?Sized>(&self, user_len: usize, reply_len: usize, rng: &mut R) -> Duration {
        Duration::from_secs_f64(self.delay_secs(user_len, reply_len, rng))
    }
}

impl Default for PacingSimulator {
    fn default() -> Self {
        Self::new(PacingConfig::default())
    }
}
