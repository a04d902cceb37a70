//! Hand-landmark types and geometry
//!
//! The external detector delivers 21 landmarks per hand (MediaPipe hand
//! landmark convention). This module owns the per-hand types, the landmark
//! index constants, and the plausibility filter that drops hands too far
//! from the camera to control anything.

pub mod types;
