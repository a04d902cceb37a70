//! Temporal Smoother
//!
//! Exponential smoothing for the continuous pointer signal:
//! `smoothed = alpha * raw + (1 - alpha) * smoothed_prev`. Low alpha trades
//! responsiveness for jitter suppression.

/// Exponentially-smoothed 2D point.
///
/// The first update after construction or [`reset`](PointerSmoother::reset)
/// adopts the raw value directly, so a hand re-appearing after a tracking
/// gap never inherits a stale position.
#[derive(Debug, Clone)]
pub struct PointerSmoother {
    alpha: f32,
    state: Option<(f32, f32)>,
}

impl PointerSmoother {
    /// Create a smoother with the given smoothing factor, alpha in (0, 1).
    pub fn new(alpha: f32) -> Self {
        Self { alpha, state: None }
    }

    /// Feed a raw point, returning the smoothed point.
    pub fn update(&mut self, raw: (f32, f32)) -> (f32, f32) {
        let smoothed = match self.state {
            Some((px, py)) => (
                self.alpha * raw.0 + (1.0 - self.alpha) * px,
                self.alpha * raw.1 + (1.0 - self.alpha) * py,
            ),
            None => raw,
        };
        self.state = Some(smoothed);
        smoothed
    }

    /// Drop the smoothing state; the next update adopts its raw input.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Whether the smoother currently carries state.
    pub fn is_tracking(&self) -> bool {
        self.state.is_some()
    }
}
