use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};

/// Counts hashed pieces and drives a terminal progress bar.
pub struct ProgressTracker {
    total_pieces: usize,
    hashed_pieces: usize,
    start_time: Instant,
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total_pieces: usize, visible: bool) -> Self {
        let bar = ProgressBar::new(total_pieces as u64);
        if visible {
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} pieces ({per_sec})",
            ) {
                bar.set_style(style);
            }
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        Self {
            total_pieces,
            hashed_pieces: 0,
            start_time: Instant::now(),
            bar,
        }
    }

    /// A tracker that draws nothing.
    pub fn hidden(total_pieces: usize) -> Self {
        Self::new(total_pieces, false)
    }

    pub fn increment(&mut self) {
        self.hashed_pieces += 1;
        self.bar.inc(1);

        let percentage = if self.total_pieces == 0 {
            100.0
        } else {
            (self.hashed_pieces as f64 / self.total_pieces as f64) * 100.0
        };
        debug!(
            "Progress: {}/{} pieces ({:.1}%)",
            self.hashed_pieces, self.total_pieces, percentage
        );
    }

    pub fn is_complete(&self) -> bool {
        self.hashed_pieces >= self.total_pieces
    }

    pub fn get_progress(&self) -> (usize, usize) {
        (self.hashed_pieces, self.total_pieces)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
        let secs = self.elapsed().as_secs_f64();
        let rate = if secs > 0.0 { self.hashed_pieces as f64 / secs } else { 0.0 };
        info!(
            "Hashed {} pieces in {:.3}s ({:.1} pieces/sec)",
            self.hashed_pieces, secs, rate
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts() {
        let mut tracker = ProgressTracker::hidden(3);
        assert_eq!(tracker.get_progress(), (0, 3));
        assert!(!tracker.is_complete());

        for _ in 0..3 {
            tracker.increment();
        }
        assert_eq!(tracker.get_progress(), (3, 3));
        assert!(tracker.is_complete());
        tracker.finish();
    }

    #[test]
    fn test_empty_is_complete() {
        let tracker = ProgressTracker::hidden(0);
        assert!(tracker.is_complete());
    }
}
