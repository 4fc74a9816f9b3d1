//! Test helpers shared across unit and integration tests.

use std::sync::{Arc, Mutex};

use crate::logger::LogSink;

/// A [LogSink] that captures rendered lines in memory, in arrival order.
/// Clone it before handing it to the logger and read the lines back later.
#[derive(Clone, Debug, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("capture sink lock").clone()
    }

    /// Number of captured lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }
}

impl LogSink for CaptureSink {
    fn write_line(&mut self, line: &str) {
        self.lines.lock().expect("capture sink lock").push(line.to_string());
    }
}
