use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A pipeline checkpoint, reported synchronously.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// 0 to 100.
    pub percent: u8,
    pub status: String,
}

impl ProgressEvent {
    pub fn new(percent: f64, status: impl Into<String>) -> Self {
        Self {
            percent: percent.round().clamp(0.0, 100.0) as u8,
            status: status.into(),
        }
    }
}

/// Receives progress events at fixed checkpoints of a run.
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent);
}

impl<F: FnMut(ProgressEvent)> ProgressSink for F {
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Percent reached when `completed` of `total` pages are done.
///
/// Pages span 5..95, leaving room for engine startup and assembly.
pub fn page_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 95.0;
    }
    5.0 + (completed as f64 / total as f64) * 90.0
}

/// Cooperative stop flag shared between the caller and one conversion run.
///
/// Clones observe the same flag. The pipeline only polls it at page boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear the flag; called when a run starts.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
