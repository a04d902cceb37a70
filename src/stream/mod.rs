//! Frame stream I/O: JSONL in, JSONL out

pub mod sink;
pub mod source;
