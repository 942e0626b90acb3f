//! Tick-driven LED blink patterns.
//!
//! The main loop advances the engine with the current uptime and drives
//! the LED with whatever level comes back; no timers or callbacks are
//! involved, which keeps the patterns testable with a fake clock.

/// Identify pattern: on/off cadence and total duration.
const IDENTIFY_ON_MS: u64 = 50;
const IDENTIFY_PERIOD_MS: u64 = 150;
const IDENTIFY_TOTAL_MS: u64 = 1_000;

/// A blink request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// HomeKit identify: fast flashing for one second.
    Identify,
    /// Single pulse of the given duration (activity feedback).
    Pulse(u16),
}

/// The engine runs at most one pattern; a new `start` replaces whatever
/// is active (identify immediately retriggers, pulses coalesce).
pub struct BlinkEngine {
    active: Option<(Pattern, u64)>,
}

impl Default for BlinkEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkEngine {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn start(&mut self, pattern: Pattern, now_ms: u64) {
        self.active = Some((pattern, now_ms));
    }

    /// Advance the pattern and return the LED level to drive. Finished
    /// patterns clear themselves and read dark.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some((pattern, started_ms)) = self.active else {
            return false;
        };
        let elapsed = now_ms.saturating_sub(started_ms);

        match pattern {
            Pattern::Identify => {
                if elapsed >= IDENTIFY_TOTAL_MS {
                    self.active = None;
                    false
                } else {
                    elapsed % IDENTIFY_PERIOD_MS < IDENTIFY_ON_MS
                }
            }
            Pattern::Pulse(duration_ms) => {
                if elapsed >= u64::from(duration_ms) {
                    self.active = None;
                    false
                } else {
                    true
                }
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
