//! Mode Arbiter
//!
//! The control regime is a pure function of how many plausible hands the
//! detector sees: none = idle, one = continuous pointer control, two =
//! discrete gesture classification. Detectors flicker at the 1-vs-2-hand
//! boundary, so a candidate mode must persist for a configurable number of
//! consecutive frames before the committed mode actually switches.

use serde::{Deserialize, Serialize};

/// The per-frame control regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ControlMode {
    /// No hands visible: no output
    #[default]
    Idle,
    /// One hand: continuous pointer control, classifier bypassed
    Pointer,
    /// Two hands: discrete gesture classification
    Gesture,
}

impl ControlMode {
    /// The mode implied by a raw hand count. Pure; no debounce.
    pub fn from_hand_count(count: usize) -> Self {
        match count {
            0 => ControlMode::Idle,
            1 => ControlMode::Pointer,
            _ => ControlMode::Gesture,
        }
    }
}

/// Debounced mode selection across frames.
#[derive(Debug, Clone)]
pub struct ModeArbiter {
    debounce_frames: u32,
    committed: Option<ControlMode>,
    candidate: ControlMode,
    candidate_streak: u32,
}

impl ModeArbiter {
    /// Create an arbiter requiring `debounce_frames` consecutive frames of a
    /// new mode before switching. `1` (or `0`) switches immediately.
    pub fn new(debounce_frames: u32) -> Self {
        Self {
            debounce_frames: debounce_frames.max(1),
            committed: None,
            candidate: ControlMode::Idle,
            candidate_streak: 0,
        }
    }

    /// Feed this frame's plausible-hand count; returns the committed mode.
    ///
    /// The very first observation commits immediately, since there is no
    /// previous mode worth protecting.
    pub fn update(&mut self, hand_count: usize) -> ControlMode {
        let observed = ControlMode::from_hand_count(hand_count);

        let committed = match self.committed {
            None => {
                self.committed = Some(observed);
                observed
            }
            Some(current) if observed == current => {
                self.candidate_streak = 0;
                current
            }
            Some(current) => {
                if observed == self.candidate {
                    self.candidate_streak += 1;
                } else {
                    self.candidate = observed;
                    self.candidate_streak = 1;
                }
                if self.candidate_streak >= self.debounce_frames {
                    self.committed = Some(observed);
                    self.candidate_streak = 0;
                    observed
                } else {
                    current
                }
            }
        };
        committed
    }

    /// The currently committed mode, if any frame has been seen.
    pub fn mode(&self) -> Option<ControlMode> {
        self.committed
    }
}
