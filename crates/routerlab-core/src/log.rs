// ── Activity log ──
//
// Human-readable status lines produced by simulated actions. The simulator
// only knows the `LogSink` trait; `ActivityLog` is the sink the binaries use.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::info;

const BROADCAST_CAPACITY: usize = 256;

/// Default number of lines kept in memory.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Destination for activity messages.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

/// One timestamped activity message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Bounded in-memory log with live fan-out.
///
/// Every line is kept in a ring of `capacity` entries, broadcast to
/// subscribers, and emitted as a `tracing` event under the
/// `routerlab::activity` target.
pub struct ActivityLog {
    history: Mutex<VecDeque<LogLine>>,
    capacity: usize,
    tx: broadcast::Sender<LogLine>,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let capacity = capacity.max(1);
        Self {
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            tx,
        }
    }

    /// Subscribe to lines logged from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LogLine> {
        self.tx.subscribe()
    }

    /// Retained lines, oldest first.
    pub fn history(&self) -> Vec<LogLine> {
        self.lock().iter().cloned().collect()
    }

    /// Retained messages without timestamps, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|l| l.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<LogLine>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogSink for ActivityLog {
    fn log(&self, message: &str) {
        info!(target: "routerlab::activity", "{message}");

        let line = LogLine {
            timestamp: Utc::now(),
            message: message.to_owned(),
        };

        {
            let mut history = self.lock();
            if history.len() == self.capacity {
                history.pop_front();
            }
            history.push_back(line.clone());
        }

        // No receivers is fine: the console may not be open.
        let _ = self.tx.send(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_lines_in_order() {
        let log = ActivityLog::new(10);
        log.log("first");
        log.log("second");
        assert_eq!(log.messages(), ["first", "second"]);
    }

    #[test]
    fn drops_oldest_beyond_capacity() {
        let log = ActivityLog::new(2);
        log.log("a");
        log.log("b");
        log.log("c");
        assert_eq!(log.messages(), ["b", "c"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn zero_capacity_still_keeps_latest_line() {
        let log = ActivityLog::new(0);
        log.log("only");
        log.log("latest");
        assert_eq!(log.messages(), ["latest"]);
    }

    #[test]
    fn subscribers_receive_new_lines() {
        let log = ActivityLog::new(10);
        let mut rx = log.subscribe();
        log.log("R1: Restart command simulated");
        let line = rx.try_recv().expect("line broadcast");
        assert_eq!(line.message, "R1: Restart command simulated");
    }
}
