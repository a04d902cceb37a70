//! # handctl
//!
//! A hand-gesture control core that turns noisy per-frame hand-landmark
//! observations into stable, low-latency control commands, and lets a user
//! teach the system new gestures in minutes with a handful of examples.
//!
//! ## Overview
//!
//! This library consumes 21-point hand-landmark sets produced by an external
//! detector (one message per camera frame), normalizes them into scale- and
//! translation-invariant feature vectors, and routes them through a
//! nearest-neighbor classifier or a direct pointer mapping depending on how
//! many hands are visible. Output is a stream of action commands consumed by
//! an external input-injection collaborator.
//!
//! ## Quick Start
//!
//! ```no_run
//! use handctl::app::config::Config;
//! use handctl::control::pipeline::ControlPipeline;
//! use handctl::model::store::GestureModel;
//!
//! let config = Config::default();
//! let model = GestureModel::new();
//! let mut pipeline = ControlPipeline::new(model, &config);
//!
//! // ... feed FrameObservations from the detector ...
//! ```
//!
//! ## Architecture
//!
//! The system is organized into the following modules:
//!
//! - [`landmark`]: Landmark-set types, geometric helpers, plausibility filter
//! - [`features`]: Wrist-origin, span-normalized feature extraction
//! - [`model`]: Sample store, nearest-neighbor classifier, persistence
//! - [`control`]: Smoothing, confidence gating, mode arbitration, pipeline
//! - [`training`]: Sample capture and per-label progress tracking
//! - [`stream`]: JSONL frame source and action-command sink
//! - [`time`]: Millisecond timestamps and the session clock
//! - [`app`]: CLI and configuration management
//!
//! ## Frame Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Detector   │───▶│ Plausibility│───▶│ ModeArbiter │───▶│ Classifier  │
//! │  (external) │    │ Filter      │    │ (hand count)│    │  (2 hands)  │
//! └─────────────┘    └─────────────┘    └──────┬──────┘    └──────┬──────┘
//!                                              │ (1 hand)         │
//!                                              ▼                  ▼
//!                                       ┌─────────────┐    ┌─────────────┐
//!                                       │  Pointer +  │    │ Confidence  │
//!                                       │  Smoother   │    │ Gate        │
//!                                       └──────┬──────┘    └──────┬──────┘
//!                                              └────────┬─────────┘
//!                                                       ▼
//!                                                ┌─────────────┐
//!                                                │ ActionSink  │
//!                                                │ (external)  │
//!                                                └─────────────┘
//! ```

pub mod time;
pub mod landmark;
pub mod features;
pub mod model;
pub mod control;
pub mod training;
pub mod stream;
pub mod app;

// Re-export commonly used types
pub use control::pipeline::{ActionCommand, ControlFrame, ControlPipeline, GestureEvent};
pub use features::normalizer::{FeatureVector, Normalizer, FEATURE_DIM};
pub use landmark::types::{FrameObservation, Handedness, Landmark, LandmarkSet};
pub use model::store::GestureModel;
pub use time::clock::Timestamp;

/// Result type alias for the gesture-control core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the gesture-control core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Model has no samples")]
    EmptyModel,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
