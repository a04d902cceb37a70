//! Action Sink
//!
//! Commands leave the process the same way frames enter it: one JSON object
//! per line. The injector on the other end decides what a `click` means on
//! its platform; this side only guarantees ordering and flushes per command
//! so a crash never leaves a half-written line buffered.

use crate::control::pipeline::ActionCommand;
use crate::{Error, Result};
use std::io::Write;

/// Where dispatched commands go.
pub trait ActionSink {
    /// Emit one command. Ordering follows frame order.
    fn dispatch(&mut self, command: &ActionCommand) -> Result<()>;
}

/// JSONL writer over any `Write`, typically stdout.
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ActionSink for JsonlSink<W> {
    fn dispatch(&mut self, command: &ActionCommand) -> Result<()> {
        let json = serde_json::to_string(command)?;
        writeln!(self.writer, "{json}").map_err(Error::Io)?;
        self.writer.flush().map_err(Error::Io)?;
        Ok(())
    }
}

/// Swallows commands; used by `classify`, which reports events instead of
/// dispatching them.
#[derive(Debug, Default)]
pub struct NullSink;

impl ActionSink for NullSink {
    fn dispatch(&mut self, _command: &ActionCommand) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonl_sink_writes_one_line_per_command() {
        let mut sink = JsonlSink::new(Vec::new());
        sink.dispatch(&ActionCommand::Click).unwrap();
        sink.dispatch(&ActionCommand::MoveCursor { x: 0.25, y: 0.75 }).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"click\""));
        assert!(lines[1].contains("move_cursor"));
    }

    #[test]
    fn test_commands_roundtrip_through_jsonl() {
        let commands = vec![
            ActionCommand::MoveCursor { x: 0.1, y: 0.2 },
            ActionCommand::Drag { x: 0.3, y: 0.4 },
            ActionCommand::TriggerGesture { label: "wave".to_string() },
        ];

        let mut sink = JsonlSink::new(Vec::new());
        for command in &commands {
            sink.dispatch(command).unwrap();
        }

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let parsed: Vec<ActionCommand> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed, commands);
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        assert!(sink.dispatch(&ActionCommand::Click).is_ok());
    }
}
