//! Terminal progress over the days of a run

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar counting processed days
///
/// A hidden tracker accepts the same calls and draws nothing, so callers
/// do not branch on whether progress is shown.
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        ProgressTracker { bar }
    }

    /// Shows which day is being processed
    pub fn start_day(&self, day: u32) {
        self.bar.set_message(format!("day {}", day));
    }

    pub fn day_done(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Completes the bar, moving it to its full length
    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_tracker_counts_days() {
        let progress = ProgressTracker::hidden(3);
        for day in [196, 197] {
            progress.start_day(day);
            progress.day_done();
        }
        assert_eq!(progress.position(), 2);

        // Finishing fills the bar
        progress.finish();
        assert_eq!(progress.position(), 3);
    }
}
