//! Millisecond timestamps and the session clock

pub mod clock;
