//! Frame Stream Source
//!
//! The hand detector is a separate process; it writes one JSON object per
//! line. Most lines are frames; training sessions interleave control
//! messages (label selection, capture triggers, save requests) on the same
//! stream, so a recording session needs no second channel.
//!
//! A malformed line is logged and skipped. The detector restarting
//! mid-write must not kill the control loop.

use crate::landmark::types::FrameObservation;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// One line of detector input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// A detector frame
    Frame(FrameObservation),
    /// An in-band control message
    Control(ControlSignal),
}

/// In-band training and session control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum ControlSignal {
    /// Switch the training recorder to a label
    SelectLabel { label: String },
    /// Capture the current primary hand as a sample
    CaptureSample,
    /// Persist the model being trained
    SaveModel,
}

/// Line-oriented reader over any `BufRead`.
pub struct FrameSource<R: BufRead> {
    reader: R,
    line_no: u64,
}

impl<R: BufRead> FrameSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }

    /// Read the next well-formed message.
    ///
    /// Returns `Ok(None)` at end of stream. Malformed or blank lines are
    /// skipped with a warning, never surfaced as errors.
    pub fn next_message(&mut self) -> Result<Option<StreamMessage>> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<StreamMessage>(trimmed) {
                Ok(message) => return Ok(Some(message)),
                Err(err) => {
                    tracing::warn!(line = self.line_no, %err, "skipping malformed input line");
                }
            }
        }
    }

    /// Lines consumed so far, including skipped ones.
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }
}
