//! Signal head state machine
//!
//! One signal per movement queue. All transitions are commanded by the
//! intersection except YELLOW → RED, which happens by itself once the yellow
//! countdown runs out.
//!
//! ```text
//!            set_green            set_yellow
//!   RED ───────────────▶ GREEN ─────────────▶ YELLOW
//!    ▲                                           │
//!    └──────────── step() × yellow_duration ─────┘
//!
//!   any state ── set_blinking ──▶ BLINKING ── set_red ──▶ RED
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalState {
    Red,
    Green,
    Yellow,
    Blinking,
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalState::Red => "RED",
            SignalState::Green => "GREEN",
            SignalState::Yellow => "YELLOW",
            SignalState::Blinking => "BLINKING",
        };
        f.write_str(label)
    }
}

/// A single signal head
///
/// # Example
/// ```
/// use signal_control_core::{Signal, SignalState};
///
/// let mut signal = Signal::new(2);
/// signal.set_green();
/// signal.set_yellow();
/// signal.step();
/// assert_eq!(signal.state(), SignalState::Yellow);
/// signal.step();
/// assert_eq!(signal.state(), SignalState::Red);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    state: SignalState,
    /// Steps of yellow left; only meaningful while YELLOW
    yellow_remaining: usize,
    /// Countdown loaded by `set_yellow`
    yellow_duration: usize,
}

impl Signal {
    /// New signal, initially RED
    pub fn new(yellow_duration: usize) -> Self {
        Self {
            state: SignalState::Red,
            yellow_remaining: 0,
            yellow_duration,
        }
    }

    pub fn state(&self) -> SignalState {
        self.state
    }

    pub fn is_green(&self) -> bool {
        self.state == SignalState::Green
    }

    pub fn yellow_remaining(&self) -> usize {
        self.yellow_remaining
    }

    pub fn set_green(&mut self) {
        self.state = SignalState::Green;
        self.yellow_remaining = 0;
    }

    pub fn set_yellow(&mut self) {
        self.state = SignalState::Yellow;
        self.yellow_remaining = self.yellow_duration;
    }

    pub fn set_red(&mut self) {
        self.state = SignalState::Red;
        self.yellow_remaining = 0;
    }

    pub fn set_blinking(&mut self) {
        self.state = SignalState::Blinking;
        self.yellow_remaining = 0;
    }

    /// Advance the yellow countdown; no-op in any other state
    pub fn step(&mut self) {
        if self.state == SignalState::Yellow {
            self.yellow_remaining = self.yellow_remaining.saturating_sub(1);
            if self.yellow_remaining == 0 {
                self.set_red();
            }
        }
    }
}
