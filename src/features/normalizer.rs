//! Landmark Normalizer
//!
//! Converts a raw landmark set into a translation- and scale-invariant
//! feature vector: all points are translated so the wrist sits at the
//! origin, then divided by the wrist-to-middle-MCP distance. The same
//! gesture performed close to or far from the camera maps to near-identical
//! vectors.
//!
//! The representation is the 63 normalized coordinates themselves (21 points
//! x 3 axes). Training and inference must go through the same [`Normalizer`]
//! so the representation can never diverge between the two.

use crate::landmark::types::{index, LandmarkSet, LANDMARK_COUNT};
use crate::{Error, Result};

/// Dimensionality of the feature vectors produced by [`Normalizer`].
pub const FEATURE_DIM: usize = LANDMARK_COUNT * 3;

/// Scale references below this are camera glitches, not hands.
pub const MIN_SCALE_REFERENCE: f32 = 1e-4;

/// A normalized pose representation used for classification.
pub type FeatureVector = Vec<f32>;

/// Stateless landmark-to-feature transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one hand into a [`FEATURE_DIM`]-length vector.
    ///
    /// Returns [`Error::InvalidSample`] when the scale reference (wrist to
    /// middle-finger MCP) collapses to zero; dividing by it would blow the
    /// vector up into noise, so the frame's contribution is dropped instead.
    pub fn normalize(&self, hand: &LandmarkSet) -> Result<FeatureVector> {
        let wrist = hand.landmarks[index::WRIST];
        let scale = wrist.distance_to(&hand.landmarks[index::MIDDLE_FINGER_MCP]);

        if scale < MIN_SCALE_REFERENCE {
            return Err(Error::InvalidSample(format!(
                "degenerate scale reference {scale:e}"
            )));
        }

        let mut features = Vec::with_capacity(FEATURE_DIM);
        for lm in &hand.landmarks {
            features.push((lm.x - wrist.x) / scale);
            features.push((lm.y - wrist.y) / scale);
            features.push((lm.z - wrist.z) / scale);
        }
        Ok(features)
    }
}
