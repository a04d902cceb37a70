//! Gesture model: sample store, nearest-neighbor classifier, persistence

pub mod store;
