//! Control Pipeline
//!
//! The per-frame orchestrator. Owns the gesture model, smoother, gate,
//! arbiter, and pointer mapper (all the mutable state of the control loop)
//! as one explicit context object, so several independent pipelines can run
//! in the same process (tests do exactly that).
//!
//! Every per-frame failure (degenerate landmark geometry, an untrained
//! model, a dimensionality mismatch after a model format change) is local:
//! it is logged and the frame simply yields no command. The loop never dies
//! on a bad frame.

use crate::app::config::Config;
use crate::control::arbiter::{ControlMode, ModeArbiter};
use crate::control::gate::{GateDecision, GestureGate};
use crate::control::pointer::{PointerAction, PointerMapper};
use crate::control::smoother::PointerSmoother;
use crate::features::normalizer::Normalizer;
use crate::landmark::types::{FrameObservation, LandmarkSet};
use crate::model::store::GestureModel;
use crate::time::clock::Timestamp;
use crate::Error;
use serde::{Deserialize, Serialize};

/// A command for the external input-injection collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionCommand {
    /// Move the cursor to a normalized screen position
    MoveCursor { x: f32, y: f32 },
    /// Press the primary button
    Click,
    /// Drag (button held) to a normalized screen position
    Drag { x: f32, y: f32 },
    /// Fire the action bound to a trained gesture
    TriggerGesture { label: String },
}

/// One classified gesture observation, pre-gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    /// Winning gesture label
    pub label: String,
    /// Fraction of nearest neighbors agreeing with the label
    pub confidence: f32,
    /// Frame timestamp
    pub timestamp: Timestamp,
}

/// Per-frame pipeline output: the committed mode plus any commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFrame {
    /// Frame timestamp
    pub timestamp: Timestamp,
    /// Committed control mode for this frame
    pub mode: ControlMode,
    /// Plausible-hand count after filtering
    pub hand_count: usize,
    /// The classified gesture, if this frame ran the classifier
    pub gesture: Option<GestureEvent>,
    /// Commands for the dispatcher (empty on most frames)
    pub commands: Vec<ActionCommand>,
}

impl ControlFrame {
    fn new(timestamp: Timestamp, mode: ControlMode, hand_count: usize) -> Self {
        Self {
            timestamp,
            mode,
            hand_count,
            gesture: None,
            commands: Vec::new(),
        }
    }
}

/// The frame-driven gesture-to-action pipeline.
pub struct ControlPipeline {
    model: GestureModel,
    normalizer: Normalizer,
    arbiter: ModeArbiter,
    smoother: PointerSmoother,
    pointer: PointerMapper,
    gate: GestureGate,
    k: usize,
    min_hand_span: f32,
    max_hand_depth: f32,
    last_mode: Option<ControlMode>,
}

impl ControlPipeline {
    /// Create a pipeline around a model, with all tunables from `config`.
    pub fn new(model: GestureModel, config: &Config) -> Self {
        Self {
            model,
            normalizer: Normalizer::new(),
            arbiter: ModeArbiter::new(config.arbiter.debounce_frames),
            smoother: PointerSmoother::new(config.pointer.smoothing_alpha),
            pointer: PointerMapper::new(
                config.pointer.zone_min,
                config.pointer.zone_max,
                config.pointer.movement_threshold,
                config.pointer.pinch_threshold,
                config.pointer.click_cooldown_ms,
            ),
            gate: GestureGate::new(config.gate.confidence_threshold, config.gate.cooldown_ms),
            k: config.classifier.k,
            min_hand_span: config.detector.min_hand_span,
            max_hand_depth: config.detector.max_hand_depth,
            last_mode: None,
        }
    }

    /// Process one frame of detector output.
    pub fn process(&mut self, obs: &FrameObservation) -> ControlFrame {
        let hands = self.plausible_hands(obs);
        let mode = self.arbiter.update(hands.len());

        // Cooldown state survives frames but not regime changes.
        if self.last_mode.is_some() && self.last_mode != Some(mode) {
            self.gate.reset();
        }
        self.last_mode = Some(mode);

        let mut frame = ControlFrame::new(obs.timestamp, mode, hands.len());

        match mode {
            ControlMode::Idle => {
                // Tracking gap: the next pointer frame starts fresh.
                self.smoother.reset();
                self.pointer.reset();
            }
            ControlMode::Pointer => {
                if let Some(hand) = hands.first() {
                    self.pointer_frame(hand, &mut frame);
                } else {
                    // Committed mode lags the raw count while debouncing.
                    self.smoother.reset();
                    self.pointer.reset();
                }
            }
            ControlMode::Gesture => {
                self.smoother.reset();
                self.pointer.reset();
                if let Some(hand) = primary_hand(&hands) {
                    self.gesture_frame(hand, obs.timestamp, &mut frame);
                }
            }
        }

        frame
    }

    /// Continuous-control path: fingertip -> smoother -> pointer mapping.
    fn pointer_frame(&mut self, hand: &LandmarkSet, frame: &mut ControlFrame) {
        let tip = hand.index_fingertip();
        let smoothed = self.smoother.update((tip.x, tip.y));

        match self.pointer.map(smoothed, hand, frame.timestamp) {
            PointerAction::Move { x, y } => frame.commands.push(ActionCommand::MoveCursor { x, y }),
            PointerAction::Click => frame.commands.push(ActionCommand::Click),
            PointerAction::Drag { x, y } => frame.commands.push(ActionCommand::Drag { x, y }),
            PointerAction::None => {}
        }
    }

    /// Discrete-gesture path: normalize -> classify -> gate.
    fn gesture_frame(&mut self, hand: &LandmarkSet, timestamp: Timestamp, frame: &mut ControlFrame) {
        let features = match self.normalizer.normalize(hand) {
            Ok(f) => f,
            Err(err) => {
                tracing::debug!(%err, "dropping frame contribution");
                return;
            }
        };

        let (label, confidence) = match self.model.classify(&features, self.k) {
            Ok(result) => result,
            Err(Error::EmptyModel) => {
                // Untrained model: gesture mode simply produces nothing.
                tracing::trace!("classifier has no samples yet");
                return;
            }
            Err(err) => {
                tracing::warn!(%err, "classification failed; frame dropped");
                return;
            }
        };

        let event = GestureEvent {
            label,
            confidence,
            timestamp,
        };

        if self.gate.check(&event) == GateDecision::Forwarded {
            frame.commands.push(ActionCommand::TriggerGesture {
                label: event.label.clone(),
            });
        }
        frame.gesture = Some(event);
    }

    /// Drop implausible hands and keep at most the two most prominent.
    fn plausible_hands<'a>(&self, obs: &'a FrameObservation) -> Vec<&'a LandmarkSet> {
        let mut hands: Vec<&LandmarkSet> = obs
            .hands
            .iter()
            .filter(|h| h.is_plausible(self.min_hand_span, self.max_hand_depth))
            .collect();
        if hands.len() > 2 {
            tracing::debug!(count = hands.len(), "detector sent more than two hands");
            hands.sort_by(|a, b| {
                b.span()
                    .partial_cmp(&a.span())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            hands.truncate(2);
        }
        hands
    }

    /// Replace the active model (e.g. after a training session).
    pub fn set_model(&mut self, model: GestureModel) {
        self.model = model;
    }

    /// The active model.
    pub fn model(&self) -> &GestureModel {
        &self.model
    }
}

/// The primary hand for classification: the one most prominent to the
/// camera, by wrist-to-middle-fingertip span.
fn primary_hand<'a>(hands: &[&'a LandmarkSet]) -> Option<&'a LandmarkSet> {
    hands.iter().copied().max_by(|a, b| {
        a.span()
            .partial_cmp(&b.span())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
