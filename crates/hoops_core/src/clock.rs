//! Quarter clock in whole seconds.

/// Round a real-valued duration to the whole seconds the clock runs off.
/// Negative and NaN durations round to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_duration(seconds: f64) -> u32 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    seconds.round().min(f64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    quarter_length: u32,
    time_remaining: u32,
}

impl GameClock {
    pub fn new(quarter_length: u32) -> Self {
        Self {
            quarter_length,
            time_remaining: quarter_length,
        }
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn quarter_length(&self) -> u32 {
        self.quarter_length
    }

    /// Run the clock by `seconds`, rounded. Never goes below zero. Returns the
    /// seconds actually taken off the clock.
    pub fn tick(&mut self, seconds: f64) -> u32 {
        let elapsed = round_duration(seconds).min(self.time_remaining);
        self.time_remaining -= elapsed;
        elapsed
    }

    pub fn is_quarter_over(&self) -> bool {
        self.time_remaining == 0
    }

    /// Back to a full quarter.
    pub fn reset(&mut self) {
        self.time_remaining = self.quarter_length;
    }
}
