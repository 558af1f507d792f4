//! Observer pattern for wave progress.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::constants::WAVE_LOG_INTERVAL_MS;

/// Progress of a run, emitted by the coordinator after each absorbed wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveUpdate {
    /// Zero-based index of the wave just completed.
    pub wave: u64,
    /// Number of waves in the plan.
    pub total_waves: u64,
    /// Partial results absorbed so far.
    pub chunks_absorbed: u64,
    /// Number of chunks in the plan.
    pub total_chunks: u64,
    /// Whether this is the final update.
    pub done: bool,
}

impl WaveUpdate {
    /// Fraction of chunks absorbed, in [0.0, 1.0].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.total_chunks == 0 {
            return 1.0;
        }
        self.chunks_absorbed as f64 / self.total_chunks as f64
    }
}

/// Receives wave progress from the coordinator.
pub trait WaveObserver: Send + Sync {
    /// Receive a progress update.
    fn on_wave(&self, update: &WaveUpdate);
}

/// Observer that logs progress with temporal throttling.
pub struct LoggingObserver {
    min_interval_ms: u64,
    last_time: AtomicU64,
}

impl LoggingObserver {
    /// Create a logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_time: AtomicU64::new(0),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new(WAVE_LOG_INTERVAL_MS)
    }
}

impl WaveObserver for LoggingObserver {
    #[allow(clippy::cast_possible_truncation)]
    fn on_wave(&self, update: &WaveUpdate) {
        if update.done {
            info!(
                waves = update.total_waves,
                chunks = update.chunks_absorbed,
                "Reduction complete"
            );
            return;
        }

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let last_time = self.last_time.load(Ordering::Relaxed);
        if now.saturating_sub(last_time) < self.min_interval_ms {
            return;
        }

        debug!(
            wave = update.wave + 1,
            total = update.total_waves,
            progress = format!("{:.1}%", update.progress() * 100.0),
            "Wave absorbed"
        );
        self.last_time.store(now, Ordering::Relaxed);
    }
}

/// Null object: discards every update.
pub struct NoOpObserver;

impl NoOpObserver {
    /// Create a no-op observer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveObserver for NoOpObserver {
    fn on_wave(&self, _update: &WaveUpdate) {}
}
