//! Per-frame control: smoothing, gating, mode arbitration, and the pipeline

pub mod arbiter;
pub mod gate;
pub mod pipeline;
pub mod pointer;
pub mod smoother;
