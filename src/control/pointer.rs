//! Continuous Pointer Mapping
//!
//! Single-hand mode maps the index fingertip straight to a cursor target,
//! no classifier involved. The camera's full field of view is awkward to
//! sweep with a forearm, so only an inner tracking zone of the frame maps to
//! the output range; a thumb-to-index pinch acts as the mouse button.

use crate::landmark::types::LandmarkSet;
use crate::time::clock::Timestamp;

/// Result of mapping one pointer frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Cursor target moved
    Move { x: f32, y: f32 },
    /// Pinch onset: press
    Click,
    /// Pinch held while moving: drag to target
    Drag { x: f32, y: f32 },
    /// Below the movement threshold, or click still cooling down
    None,
}

/// Direct geometric pointer mapping with pinch click/drag detection.
#[derive(Debug, Clone)]
pub struct PointerMapper {
    zone_min: f32,
    zone_max: f32,
    movement_threshold: f32,
    pinch_threshold: f32,
    click_cooldown_ms: u64,
    last_emitted: Option<(f32, f32)>,
    pinch_active: bool,
    last_click: Option<Timestamp>,
}

impl PointerMapper {
    pub fn new(
        zone_min: f32,
        zone_max: f32,
        movement_threshold: f32,
        pinch_threshold: f32,
        click_cooldown_ms: u64,
    ) -> Self {
        Self {
            zone_min,
            zone_max,
            movement_threshold,
            pinch_threshold,
            click_cooldown_ms,
            last_emitted: None,
            pinch_active: false,
            last_click: None,
        }
    }

    /// Remap a camera-normalized coordinate from the tracking zone to [0, 1].
    fn remap(&self, value: f32) -> f32 {
        ((value - self.zone_min) / (self.zone_max - self.zone_min)).clamp(0.0, 1.0)
    }

    /// Map one smoothed fingertip position plus the hand's pinch state into
    /// a pointer action.
    ///
    /// `smoothed` is the already-smoothed fingertip position in camera
    /// coordinates; smoothing happens upstream so click detection and
    /// movement share the same stabilized signal.
    pub fn map(
        &mut self,
        smoothed: (f32, f32),
        hand: &LandmarkSet,
        now: Timestamp,
    ) -> PointerAction {
        let target = (self.remap(smoothed.0), self.remap(smoothed.1));
        let pinching = hand.pinch_distance() < self.pinch_threshold;

        // Pinch onset: a click, rate-limited by the click cooldown.
        if pinching && !self.pinch_active {
            self.pinch_active = true;
            let cooled = self
                .last_click
                .map(|last| now.millis_since(last) >= self.click_cooldown_ms)
                .unwrap_or(true);
            if cooled {
                self.last_click = Some(now);
                self.last_emitted = Some(target);
                return PointerAction::Click;
            }
            return PointerAction::None;
        }
        if !pinching {
            self.pinch_active = false;
        }

        let moved = match self.last_emitted {
            Some((lx, ly)) => {
                let dx = target.0 - lx;
                let dy = target.1 - ly;
                (dx * dx + dy * dy).sqrt() >= self.movement_threshold
            }
            None => true,
        };
        if !moved {
            return PointerAction::None;
        }
        self.last_emitted = Some(target);

        if self.pinch_active {
            PointerAction::Drag {
                x: target.0,
                y: target.1,
            }
        } else {
            PointerAction::Move {
                x: target.0,
                y: target.1,
            }
        }
    }

    /// Forget pointer state after a tracking gap or mode change.
    pub fn reset(&mut self) {
        self.last_emitted = None;
        self.pinch_active = false;
    }
}
