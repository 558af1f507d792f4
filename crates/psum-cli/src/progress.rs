//! Wave progress bar.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use psum_core::observer::{WaveObserver, WaveUpdate};

const TEMPLATE: &str = "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} chunks ({msg})";

/// Observer that drives an indicatif progress bar on stderr.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    /// Create a bar sized for `total_chunks`.
    #[must_use]
    pub fn new(total_chunks: u64) -> Self {
        Self::with_bar(ProgressBar::new(total_chunks))
    }

    /// Create an observer that draws nowhere.
    #[must_use]
    pub fn hidden(total_chunks: u64) -> Self {
        Self::with_bar(ProgressBar::with_draw_target(
            Some(total_chunks),
            ProgressDrawTarget::hidden(),
        ))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    /// Current bar position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl WaveObserver for ProgressBarObserver {
    fn on_wave(&self, update: &WaveUpdate) {
        self.bar.set_length(update.total_chunks);
        self.bar.set_position(update.chunks_absorbed);
        if update.done {
            self.bar.finish_and_clear();
        } else {
            self.bar
                .set_message(format!("wave {}/{}", update.wave + 1, update.total_waves));
        }
    }
}
