//! Spin state machine for hold-to-repeat stepping.
//!
//! [`SpinMachine`] tracks the spin direction, the tick counter that drives
//! the booster, and which timer is armed. It holds no clock: callers pass
//! `now_ms` in, which keeps every transition testable without real time.
//!
//! # Phases
//!
//! ```text
//!            begin + arm                    delay due
//!   Idle ─────────────────▶ DelayPending ─────────────▶ Repeating ─┐
//!    ▲                           │                         ▲       │ tick
//!    └──────── stop ─────────────┴──────── stop ───────────┴───────┘
//! ```
//!
//! The delay deadline arms the interval without stepping; each interval
//! deadline produces one tick.
//!
//! # Example
//!
//! ```rust
//! use rs_spinner::spin::{SpinMachine, SpinPhase};
//! use rs_spinner::Direction;
//!
//! let mut machine = SpinMachine::new();
//! machine.begin(Direction::Up);
//! machine.arm(0, 500);
//!
//! assert_eq!(machine.poll(499, 100), None);
//! assert_eq!(machine.poll(500, 100), None);          // delay elapsed, interval armed
//! assert_eq!(machine.phase(), SpinPhase::Repeating { next_due_ms: 600 });
//! assert_eq!(machine.poll(600, 100), Some(1));        // first repeated tick
//! ```

/// Spin direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Increasing values.
    Up,
    /// Decreasing values.
    Down,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// ```
    /// use rs_spinner::Direction;
    ///
    /// assert_eq!(Direction::Up.as_str(), "up");
    /// assert_eq!(Direction::Down.as_str(), "down");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Parse direction from text input.
    ///
    /// Accepts `"up"`/`"+"`/`"inc"` and `"down"`/`"-"`/`"dec"`, trimmed and
    /// case-insensitive.
    ///
    /// ```
    /// use rs_spinner::Direction;
    ///
    /// assert_eq!(Direction::from_text(" UP "), Some(Direction::Up));
    /// assert_eq!(Direction::from_text("-"), Some(Direction::Down));
    /// assert_eq!(Direction::from_text("sideways"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "+" | "inc" => Some(Direction::Up),
            "down" | "-" | "dec" => Some(Direction::Down),
            _ => None,
        }
    }

    /// The other direction.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Observable spin state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpinState {
    /// True between a start acknowledgment and the matching stop.
    pub is_spinning: bool,
    /// Direction of the current spin, if any.
    pub direction: Option<Direction>,
    /// Repeated ticks since the spin started (the immediate step is tick 0).
    pub step_count: u32,
}

/// Which timer is armed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "phase", rename_all = "snake_case"))]
pub enum SpinPhase {
    /// No timer armed.
    #[default]
    Idle,
    /// One-shot delay armed; fires at `due_ms`.
    DelayPending {
        /// Deadline of the delay.
        due_ms: u64,
    },
    /// Repeating interval armed; next tick at `next_due_ms`.
    Repeating {
        /// Deadline of the next tick.
        next_due_ms: u64,
    },
}

/// Most interval ticks replayed after a stall.
pub const MAX_CATCH_UP_TICKS: u32 = 10;

/// Clock-free spin state machine.
///
/// The engine facade drives it: [`begin`](Self::begin) on a start
/// acknowledgment, [`arm`](Self::arm) after the immediate step,
/// [`poll`](Self::poll) from its update loop, and [`stop`](Self::stop).
#[derive(Clone, Debug, Default)]
pub struct SpinMachine {
    state: SpinState,
    phase: SpinPhase,
}

impl SpinMachine {
    /// Create an idle machine
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the spinning state in `direction` with a fresh tick counter.
    ///
    /// No timer is armed yet.
    pub fn begin(&mut self, direction: Direction) {
        self.state = SpinState {
            is_spinning: true,
            direction: Some(direction),
            step_count: 0,
        };
        self.phase = SpinPhase::Idle;
        log::trace!(target: "spinner.spin", "begin {}", direction.as_str());
    }

    /// Arm the one-shot delay.
    ///
    /// Ignored unless spinning.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        if !self.state.is_spinning {
            return;
        }
        let due_ms = now_ms.saturating_add(delay_ms);
        self.phase = SpinPhase::DelayPending { due_ms };
        log::trace!(target: "spinner.spin", "delay armed, due at {}", due_ms);
    }

    /// Advance timers to `now_ms`.
    ///
    /// Returns the new tick count if an interval tick is due. Call repeatedly
    /// until it returns `None` to catch up on missed ticks in order; a backlog
    /// longer than [`MAX_CATCH_UP_TICKS`] is cut to its most recent ticks. An
    /// interval of `0` is treated as 1 ms.
    pub fn poll(&mut self, now_ms: u64, interval_ms: u64) -> Option<u32> {
        let interval_ms = interval_ms.max(1);

        if let SpinPhase::DelayPending { due_ms } = self.phase {
            if now_ms < due_ms {
                return None;
            }
            let next_due_ms = due_ms.saturating_add(interval_ms);
            self.phase = SpinPhase::Repeating { next_due_ms };
            log::trace!(target: "spinner.spin", "delay elapsed, interval armed for {}", next_due_ms);
        }

        match self.phase {
            SpinPhase::Repeating { next_due_ms } if now_ms >= next_due_ms => {
                let behind = (now_ms - next_due_ms) / interval_ms;
                let next_due_ms = if behind >= u64::from(MAX_CATCH_UP_TICKS) {
                    log::debug!(target: "spinner.spin", "{} ticks behind, skipping backlog", behind);
                    let replayed = u64::from(MAX_CATCH_UP_TICKS - 1).saturating_mul(interval_ms);
                    now_ms.saturating_sub(replayed)
                } else {
                    next_due_ms
                };
                self.state.step_count = self.state.step_count.saturating_add(1);
                self.phase = SpinPhase::Repeating {
                    next_due_ms: next_due_ms.saturating_add(interval_ms),
                };
                Some(self.state.step_count)
            }
            _ => None,
        }
    }

    /// Cancel both timers and return to idle.
    ///
    /// Returns the direction that was spinning, if any. Safe to call
    /// repeatedly.
    pub fn stop(&mut self) -> Option<Direction> {
        let previous = if self.state.is_spinning {
            self.state.direction
        } else {
            None
        };
        self.state = SpinState::default();
        self.phase = SpinPhase::Idle;
        if let Some(direction) = previous {
            log::trace!(target: "spinner.spin", "stop {}", direction.as_str());
        }
        previous
    }

    /// Current spin state
    pub fn state(&self) -> SpinState {
        self.state
    }

    /// Current timer phase
    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Check if spinning
    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning
    }

    /// Direction of the current spin
    pub fn direction(&self) -> Option<Direction> {
        if self.state.is_spinning {
            self.state.direction
        } else {
            None
        }
    }

    /// Deadline of whichever timer is armed
    pub fn next_due_ms(&self) -> Option<u64> {
        match self.phase {
            SpinPhase::Idle => None,
            SpinPhase::DelayPending { due_ms } => Some(due_ms),
            SpinPhase::Repeating { next_due_ms } => Some(next_due_ms),
        }
    }
}
