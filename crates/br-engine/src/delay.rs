//! Timed transition state driven by host ticks.

use serde::{Deserialize, Serialize};

/// Whether a delay is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayState {
    /// Waiting for enough ticks.
    Pending,
    /// The duration has passed.
    Elapsed,
}

/// A fixed-duration wait advanced by `tick`.
///
/// Dropping the value cancels it. Nothing here reads the wall clock, so long
/// gaps between calls are harmless.
#[derive(Debug, Clone, PartialEq)]
pub struct Delay {
    duration: f64,
    elapsed: f64,
    state: DelayState,
}

impl Delay {
    /// A delay of `duration` seconds. Zero or negative durations are already elapsed.
    pub fn new(duration: f64) -> Self {
        let state = if duration > 0.0 {
            DelayState::Pending
        } else {
            DelayState::Elapsed
        };
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            state,
        }
    }

    /// Advance by `delta_secs`. Returns `true` only on the tick that completes the delay.
    pub fn tick(&mut self, delta_secs: f64) -> bool {
        if self.state == DelayState::Elapsed {
            return false;
        }
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.elapsed += delta_secs;
        }
        if self.elapsed >= self.duration {
            self.state = DelayState::Elapsed;
            return true;
        }
        false
    }

    /// Current state.
    pub fn state(&self) -> DelayState {
        self.state
    }

    /// Whether the delay has run out.
    pub fn is_elapsed(&self) -> bool {
        self.state == DelayState::Elapsed
    }

    /// Seconds still to wait.
    pub fn remaining(&self) -> f64 {
        (self.duration - self.elapsed).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapses_once() {
        let mut d = Delay::new(1.0);
        assert_eq!(d.state(), DelayState::Pending);
        assert!(!d.tick(0.6));
        assert!((d.remaining() - 0.4).abs() < 1e-9);
        assert!(d.tick(0.6));
        assert!(d.is_elapsed());
        assert!(!d.tick(1.0));
    }

    #[test]
    fn zero_duration_is_already_elapsed() {
        let mut d = Delay::new(0.0);
        assert!(d.is_elapsed());
        assert!(!d.tick(1.0));
    }

    #[test]
    fn ignores_negative_ticks() {
        let mut d = Delay::new(1.0);
        d.tick(-5.0);
        assert_eq!(d.remaining(), 1.0);
    }
}
