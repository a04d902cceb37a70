//! Feature extraction from landmark sets

pub mod normalizer;
