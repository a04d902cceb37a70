//! Confidence Gate & Cooldown
//!
//! Discrete gestures are classified every frame, so a gesture held for two
//! seconds at 30 fps produces sixty identical events. The gate forwards an
//! event only when its confidence clears the threshold AND the per-label
//! cooldown since the last forwarded event of the same label has elapsed.

use crate::control::pipeline::GestureEvent;
use crate::time::clock::Timestamp;
use std::collections::HashMap;

/// Why the gate suppressed an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Event forwarded to dispatch
    Forwarded,
    /// Confidence below the configured threshold
    LowConfidence,
    /// Same label fired within the cooldown window
    CoolingDown,
}

/// Per-label confidence and cooldown gating.
#[derive(Debug, Clone)]
pub struct GestureGate {
    confidence_threshold: f32,
    cooldown_ms: u64,
    last_forwarded: HashMap<String, Timestamp>,
}

impl GestureGate {
    /// Create a gate with the given confidence threshold and cooldown.
    pub fn new(confidence_threshold: f32, cooldown_ms: u64) -> Self {
        Self {
            confidence_threshold,
            cooldown_ms,
            last_forwarded: HashMap::new(),
        }
    }

    /// Evaluate one event. On [`GateDecision::Forwarded`] the label's
    /// cooldown window restarts at the event timestamp.
    pub fn check(&mut self, event: &GestureEvent) -> GateDecision {
        if event.confidence < self.confidence_threshold {
            return GateDecision::LowConfidence;
        }
        if let Some(&last) = self.last_forwarded.get(&event.label) {
            if event.timestamp.millis_since(last) < self.cooldown_ms {
                return GateDecision::CoolingDown;
            }
        }
        self.last_forwarded
            .insert(event.label.clone(), event.timestamp);
        GateDecision::Forwarded
    }

    /// Clear all cooldown state. Called on explicit mode changes.
    pub fn reset(&mut self) {
        self.last_forwarded.clear();
    }
}
