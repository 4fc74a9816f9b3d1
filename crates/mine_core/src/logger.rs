//! Sequential log sink: many producers, one consumer, strict submission order.
//!
//! Concurrent agents all write through a cloneable [SimulationLogger] handle.
//! Entries land on an unbounded channel (enqueue never blocks and never does
//! I/O), and a single consumer task drains them one line at a time, so output
//! from racing tasks never interleaves. Timestamped entries are rendered as
//! `[HH:MM]` simulated time relative to the run start; raw entries (report
//! tables) print as-is.
//!
//! The sink behind the consumer is injected, not a hidden global: production
//! runs use [StdoutSink], tests a capturing sink.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::timescale;

/// Destination for rendered log lines.
pub trait LogSink: Send + 'static {
    fn write_line(&mut self, line: &str);
}

/// Default sink: one line per entry on stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

enum Entry {
    /// Message stamped with the instant it was submitted.
    Stamped(Instant, String),
    /// Message printed verbatim, no timestamp.
    Raw(String),
    /// Re-arm the epoch the `HH:MM` stamps are computed from.
    Reset { start: Instant, sim_time_unit: u32 },
    /// Sentinel: stop the consumer after everything ahead of it is printed.
    Shutdown,
}

/// Producer handle. Cheap to clone; every agent gets one.
#[derive(Clone)]
pub struct SimulationLogger {
    tx: UnboundedSender<Entry>,
}

/// Consumer half: owns the receiving end and the output sink.
pub struct LogConsumer {
    rx: UnboundedReceiver<Entry>,
    sink: Box<dyn LogSink>,
}

/// Creates a logger and its (not yet running) consumer.
pub fn channel(sink: Box<dyn LogSink>) -> (SimulationLogger, LogConsumer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SimulationLogger { tx }, LogConsumer { rx, sink })
}

impl SimulationLogger {
    /// Submits a message stamped with the current instant.
    pub fn log(&self, message: impl Into<String>) {
        // A closed channel means the consumer is gone; nothing left to print to.
        let _ = self.tx.send(Entry::Stamped(Instant::now(), message.into()));
    }

    /// Submits a message with no timestamp (report/table lines).
    pub fn log_raw(&self, message: impl Into<String>) {
        let _ = self.tx.send(Entry::Raw(message.into()));
    }

    /// Sets the run start and time scale that subsequent stamps are
    /// rendered against. Entries submitted before the first reset print
    /// without a stamp.
    pub fn reset(&self, start: Instant, sim_time_unit: u32) {
        let _ = self.tx.send(Entry::Reset {
            start,
            sim_time_unit,
        });
    }

    /// Submits the end sentinel. Entries already queued still print.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Entry::Shutdown);
    }
}

impl LogConsumer {
    /// Spawns the consumer loop. The returned handle completes once the
    /// shutdown sentinel (or the last producer handle) is reached, i.e. when
    /// the queue is fully drained.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let mut epoch: Option<(Instant, u32)> = None;
        while let Some(entry) = self.rx.recv().await {
            match entry {
                Entry::Stamped(at, message) => {
                    let line = match epoch {
                        Some((start, unit)) => {
                            let elapsed = at.duration_since(start).as_secs_f64();
                            let stamp = timescale::format_elapsed(0.0, elapsed, unit)
                                .unwrap_or_else(|_| String::from("--:--"));
                            format!("[{stamp}] {message}")
                        }
                        None => message,
                    };
                    self.sink.write_line(&line);
                }
                Entry::Raw(message) => self.sink.write_line(&message),
                Entry::Reset {
                    start,
                    sim_time_unit,
                } => epoch = Some((start, sim_time_unit)),
                Entry::Shutdown => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_helpers::CaptureSink;

    #[tokio::test(start_paused = true)]
    async fn entries_print_in_submission_order() {
        let sink = CaptureSink::default();
        let (logger, consumer) = channel(Box::new(sink.clone()));
        let handle = consumer.spawn();

        logger.reset(Instant::now(), 10);
        for i in 0..20 {
            logger.log(format!("entry {i}"));
        }
        logger.shutdown();
        handle.await.expect("consumer task");

        let lines = sink.lines();
        assert_eq!(lines.len(), 20);
        for (i, line) in lines.iter().enumerate() {
            assert!(line.ends_with(&format!("entry {i}")), "line: {line}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stamps_use_simulated_minutes_since_reset() {
        let sink = CaptureSink::default();
        let (logger, consumer) = channel(Box::new(sink.clone()));
        let handle = consumer.spawn();

        logger.reset(Instant::now(), 10);
        // 6 real seconds at 10 minutes/second = 60 simulated minutes.
        tokio::time::sleep(Duration::from_secs(6)).await;
        logger.log("one hour in");
        logger.log_raw("bare line");
        logger.shutdown();
        handle.await.expect("consumer task");

        let lines = sink.lines();
        assert_eq!(lines[0], "[01:00] one hour in");
        assert_eq!(lines[1], "bare line");
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_producers_never_interleave() {
        let sink = CaptureSink::default();
        let (logger, consumer) = channel(Box::new(sink.clone()));
        let handle = consumer.spawn();
        logger.reset(Instant::now(), 1);

        let mut producers = Vec::new();
        for p in 0..8 {
            let logger = logger.clone();
            producers.push(tokio::spawn(async move {
                logger.log(format!("producer {p}"));
            }));
        }
        for p in producers {
            p.await.expect("producer task");
        }
        logger.shutdown();
        handle.await.expect("consumer task");

        // One whole line per submission, no torn output.
        let lines = sink.lines();
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|l| l.contains("producer ")));
    }
}
