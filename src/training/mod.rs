//! Training: labeled sample capture

pub mod recorder;
