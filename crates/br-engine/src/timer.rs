//! Per-decision response timer.
//!
//! The timer counts elapsed seconds fed in by the host's tick loop. While in
//! the grace window the reward multiplier stays at 1.0; during the decay
//! window it falls linearly to the configured minimum; once the total
//! duration has passed the timer times out exactly once.
//!
//! ```text
//! Idle --start--> Counting --stop--> Resolved
//!                    |
//!                    +--elapsed >= total--> TimedOut
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};

/// Durations and floor of the response timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Seconds until the decision times out.
    pub total_secs: f64,
    /// Seconds during which the multiplier stays at 1.0.
    pub grace_secs: f64,
    /// Seconds over which the multiplier falls to `min_multiplier`.
    pub decay_secs: f64,
    /// Lowest multiplier reached after the decay window.
    pub min_multiplier: f64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            total_secs: 60.0,
            grace_secs: 25.0,
            decay_secs: 25.0,
            min_multiplier: 0.5,
        }
    }
}

impl TimerConfig {
    /// Build a timer configuration.
    pub fn new(total_secs: f64, grace_secs: f64, decay_secs: f64, min_multiplier: f64) -> Self {
        Self {
            total_secs,
            grace_secs,
            decay_secs,
            min_multiplier,
        }
    }

    /// Check that durations are finite and non-negative and the floor is in `[0, 1]`.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.total_secs.is_finite() && self.total_secs > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "timer total must be positive, got {}",
                self.total_secs
            )));
        }
        for (name, value) in [("grace", self.grace_secs), ("decay", self.decay_secs)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "timer {name} must be non-negative, got {value}"
                )));
            }
        }
        if self.grace_secs + self.decay_secs > self.total_secs {
            return Err(EngineError::InvalidConfig(format!(
                "grace + decay ({}) exceeds timer total ({})",
                self.grace_secs + self.decay_secs,
                self.total_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.min_multiplier) {
            return Err(EngineError::InvalidConfig(format!(
                "min multiplier must be within [0, 1], got {}",
                self.min_multiplier
            )));
        }
        Ok(())
    }

    /// Multiplier after `elapsed` seconds, clamped to `[min_multiplier, 1.0]`.
    ///
    /// Depends only on elapsed time, never on how many ticks delivered it.
    pub fn multiplier_at(&self, elapsed: f64) -> f64 {
        let raw = if elapsed < self.grace_secs {
            1.0
        } else if elapsed < self.grace_secs + self.decay_secs {
            let progress = (elapsed - self.grace_secs) / self.decay_secs;
            1.0 - progress * (1.0 - self.min_multiplier)
        } else {
            self.min_multiplier
        };
        raw.clamp(self.min_multiplier, 1.0)
    }

    /// Which window `elapsed` falls into.
    pub fn phase_at(&self, elapsed: f64) -> TimerPhase {
        if elapsed < self.grace_secs {
            TimerPhase::Grace
        } else if elapsed < self.grace_secs + self.decay_secs {
            TimerPhase::Decaying
        } else {
            TimerPhase::Expired
        }
    }
}

/// Lifecycle state of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    /// Not started.
    Idle,
    /// Counting down.
    Counting,
    /// Stopped by an answer before the deadline.
    Resolved,
    /// The deadline passed.
    TimedOut,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Counting => write!(f, "counting"),
            Self::Resolved => write!(f, "resolved"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Reward window the elapsed time falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPhase {
    /// Full reward.
    Grace,
    /// Reward decaying.
    Decaying,
    /// Reward at its floor.
    Expired,
}

/// What a tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    /// Still counting.
    Running {
        /// Current multiplier.
        multiplier: f64,
        /// Current reward window.
        phase: TimerPhase,
    },
    /// The tick was discarded because the timer is paused.
    Paused,
    /// The deadline passed on this tick. Emitted once per countdown.
    TimedOut,
}

/// Countdown for a single decision point.
#[derive(Debug, Clone)]
pub struct ResponseTimer {
    config: TimerConfig,
    elapsed: f64,
    state: TimerState,
    paused: bool,
}

impl ResponseTimer {
    /// Create an idle timer.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            elapsed: 0.0,
            state: TimerState::Idle,
            paused: false,
        }
    }

    /// Begin a fresh countdown with `config`, discarding any previous one.
    pub fn start(&mut self, config: TimerConfig) {
        self.config = config;
        self.elapsed = 0.0;
        self.paused = false;
        self.state = TimerState::Counting;
        debug!(total = config.total_secs, "timer started");
    }

    /// Advance by `delta_secs`. Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, delta_secs: f64) -> EngineResult<TimerEvent> {
        if self.state != TimerState::Counting {
            return Err(self.misuse("tick"));
        }
        if self.paused {
            return Ok(TimerEvent::Paused);
        }
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.elapsed += delta_secs;
        }
        if self.elapsed >= self.config.total_secs {
            self.state = TimerState::TimedOut;
            debug!(elapsed = self.elapsed, "timer ran out");
            return Ok(TimerEvent::TimedOut);
        }
        Ok(TimerEvent::Running {
            multiplier: self.current_multiplier(),
            phase: self.phase(),
        })
    }

    /// Suspend accumulation. Ticks while paused are discarded.
    pub fn pause(&mut self) {
        if self.state == TimerState::Counting {
            self.paused = true;
        }
    }

    /// Resume accumulation from the paused elapsed value.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Stop because the player answered. Returns the multiplier at that moment.
    pub fn stop(&mut self) -> EngineResult<f64> {
        if self.state != TimerState::Counting {
            return Err(self.misuse("stop"));
        }
        self.state = TimerState::Resolved;
        self.paused = false;
        Ok(self.current_multiplier())
    }

    /// Current multiplier, clamped to `[min_multiplier, 1.0]`.
    pub fn current_multiplier(&self) -> f64 {
        self.config.multiplier_at(self.elapsed)
    }

    /// Current reward window.
    pub fn phase(&self) -> TimerPhase {
        self.config.phase_at(self.elapsed)
    }

    /// Seconds counted so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Seconds until timeout (never negative).
    pub fn time_left(&self) -> f64 {
        (self.config.total_secs - self.elapsed).max(0.0)
    }

    /// Lifecycle state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Whether ticks are currently discarded.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The active configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    fn misuse(&self, operation: &'static str) -> EngineError {
        warn!(operation, state = %self.state, "timer misuse ignored");
        EngineError::TimerMisuse {
            operation,
            state: self.state.to_string(),
        }
    }
}
