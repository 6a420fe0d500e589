//! Injected diagnostics sink.
//!
//! Components that log take an `Arc<dyn Reporter>` instead of reaching for a
//! global logger. Binaries hand out a [`TracingReporter`]; tests use a
//! [`MemoryReporter`] and inspect what was emitted.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Warn,
    Error,
}

/// Leveled diagnostic output.
pub trait Reporter: fmt::Debug + Send + Sync {
    fn debug(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Forwards diagnostics to the `tracing` subscriber installed by [`crate::logging::init`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TracingReporter {
    #[must_use]
    pub fn shared() -> Arc<dyn Reporter> {
        Arc::new(Self)
    }
}

impl Reporter for TracingReporter {
    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.lock().clone()
    }

    /// Messages recorded at the given level.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn record(&self, level: Level, msg: &str) {
        self.lock().push((level, msg.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        // Entries are append-only, so a poisoned lock still holds a valid Vec.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Reporter for MemoryReporter {
    fn debug(&self, msg: &str) {
        self.record(Level::Debug, msg);
    }

    fn warn(&self, msg: &str) {
        self.record(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.record(Level::Error, msg);
    }
}
