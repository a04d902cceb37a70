//! Core types for hand-landmark observations
//!
//! Defines the fundamental data structures crossing the detector boundary.

use crate::time::clock::Timestamp;
use serde::{Deserialize, Serialize};

/// Number of landmarks the detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand landmark model convention).
#[allow(dead_code)]
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single tracked point on a hand, in camera-normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Landmark {
    /// X coordinate (0.0 to 1.0, normalized to image width)
    pub x: f32,
    /// Y coordinate (0.0 to 1.0, normalized to image height)
    pub y: f32,
    /// Depth, relative to the wrist (smaller = closer to the camera)
    pub z: f32,
}

impl Landmark {
    /// Create a landmark from raw coordinates.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another landmark (all three axes).
    pub fn distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Euclidean distance in the image plane only.
    pub fn planar_distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Which hand the detector believes it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

/// One detected hand: 21 ordered landmarks plus a handedness tag.
///
/// Produced once per hand per frame by the external detector, consumed
/// within the frame, never retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkSet {
    /// All 21 hand landmarks, in MediaPipe index order
    pub landmarks: [Landmark; LANDMARK_COUNT],
    /// Handedness tag from the detector
    #[serde(default)]
    pub handedness: Handedness,
}

impl LandmarkSet {
    /// Create a landmark set from an ordered array of points.
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT], handedness: Handedness) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }

    /// The wrist landmark.
    pub fn wrist(&self) -> &Landmark {
        &self.landmarks[index::WRIST]
    }

    /// The index fingertip, used as the continuous-mode cursor control point.
    pub fn index_fingertip(&self) -> &Landmark {
        &self.landmarks[index::INDEX_FINGER_TIP]
    }

    /// Palm center, the midpoint of the wrist and middle-finger MCP.
    pub fn palm_center(&self) -> Landmark {
        let wrist = self.landmarks[index::WRIST];
        let middle_mcp = self.landmarks[index::MIDDLE_FINGER_MCP];
        Landmark::new(
            (wrist.x + middle_mcp.x) / 2.0,
            (wrist.y + middle_mcp.y) / 2.0,
            (wrist.z + middle_mcp.z) / 2.0,
        )
    }

    /// Hand span: planar distance from the wrist to the middle fingertip.
    /// Serves as the size measure for the plausibility filter and for
    /// picking the primary hand in two-hand mode.
    pub fn span(&self) -> f32 {
        self.landmarks[index::WRIST]
            .planar_distance_to(&self.landmarks[index::MIDDLE_FINGER_TIP])
    }

    /// Planar distance between the thumb tip and the index fingertip.
    /// Small values indicate a pinch.
    pub fn pinch_distance(&self) -> f32 {
        self.landmarks[index::THUMB_TIP]
            .planar_distance_to(&self.landmarks[index::INDEX_FINGER_TIP])
    }

    /// Whether the hand is large and close enough to be a control input.
    ///
    /// Distant hands (someone walking past behind the user) produce tiny,
    /// jittery landmark sets; they are dropped before mode arbitration.
    pub fn is_plausible(&self, min_span: f32, max_depth: f32) -> bool {
        self.span() >= min_span && self.wrist().z.abs() <= max_depth
    }
}

/// One frame's worth of detector output: zero, one, or two hands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameObservation {
    /// Frame timestamp, milliseconds since the session origin
    pub timestamp: Timestamp,
    /// Detected hands, at most two
    #[serde(default)]
    pub hands: Vec<LandmarkSet>,
}

impl FrameObservation {
    /// Create an observation for a frame.
    pub fn new(timestamp: Timestamp, hands: Vec<LandmarkSet>) -> Self {
        Self { timestamp, hands }
    }

    /// An empty (no hands) observation.
    pub fn empty(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            hands: Vec::new(),
        }
    }

    /// Number of detected hands.
    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }
}
