//! Reporter implementations for the two presentation modes
//!
//! The pipeline reports through the [`Reporter`] seam; which of these
//! two implementations it gets is decided once per invocation. With a
//! terminal attached, events feed the shared step tree. Without one,
//! each event becomes an immediate log line. Never both.

use std::sync::{Arc, Mutex};

use crossterm::style::Stylize;

use crate::app::report::Reporter;
use crate::cli::tracker::StepTracker;

/// Feeds pipeline events into a shared [`StepTracker`]
pub struct TrackedReporter {
    tracker: Arc<Mutex<StepTracker>>,
}

impl TrackedReporter {
    pub fn new(tracker: Arc<Mutex<StepTracker>>) -> Self {
        Self { tracker }
    }

    /// Reporting must never fail; a poisoned lock just drops the event
    fn with_tracker(&self, f: impl FnOnce(&mut StepTracker)) {
        if let Ok(mut tracker) = self.tracker.lock() {
            f(&mut tracker);
        }
    }
}

impl Reporter for TrackedReporter {
    fn add(&self, key: &str, label: &str) {
        self.with_tracker(|t| t.add(key, label));
    }

    fn start(&self, key: &str, detail: &str) {
        self.with_tracker(|t| t.start(key, detail));
    }

    fn complete(&self, key: &str, detail: &str) {
        self.with_tracker(|t| t.complete(key, detail));
    }

    fn error(&self, key: &str, detail: &str) {
        self.with_tracker(|t| t.error(key, detail));
    }

    fn skip(&self, key: &str, detail: &str) {
        self.with_tracker(|t| t.skip(key, detail));
    }
}

/// Emits pipeline events as immediate human-readable lines
#[derive(Debug, Default)]
pub struct PlainReporter;

impl PlainReporter {
    fn line(glyph: impl std::fmt::Display, key: &str, detail: &str) {
        if detail.is_empty() {
            eprintln!("{} {}", glyph, key);
        } else {
            eprintln!("{} {} ({})", glyph, key, detail);
        }
    }
}

impl Reporter for PlainReporter {
    fn add(&self, _key: &str, _label: &str) {
        // Registration only matters for tree ordering
    }

    fn start(&self, key: &str, detail: &str) {
        Self::line("○".cyan(), key, detail);
    }

    fn complete(&self, key: &str, detail: &str) {
        Self::line("●".green(), key, detail);
    }

    fn error(&self, key: &str, detail: &str) {
        Self::line("●".red(), key, detail);
    }

    fn skip(&self, key: &str, detail: &str) {
        Self::line("○".yellow(), key, detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tracker::StepStatus;

    #[test]
    fn test_tracked_reporter_updates_shared_tracker() {
        let tracker = Arc::new(Mutex::new(StepTracker::new("t")));
        let reporter = TrackedReporter::new(Arc::clone(&tracker));

        reporter.add("fetch", "Fetch latest release");
        reporter.start("fetch", "contacting feed");
        reporter.complete("fetch", "release v1.0");

        let tracker = tracker.lock().unwrap();
        let step = &tracker.steps()[0];
        assert_eq!(step.status, StepStatus::Done);
        assert_eq!(step.detail, "release v1.0");
    }

    #[test]
    fn test_tracked_reporter_synthesizes_unknown_keys() {
        let tracker = Arc::new(Mutex::new(StepTracker::new("t")));
        let reporter = TrackedReporter::new(Arc::clone(&tracker));

        reporter.error("flatten", "no wrapper");

        let tracker = tracker.lock().unwrap();
        assert_eq!(tracker.steps()[0].key, "flatten");
        assert_eq!(tracker.steps()[0].status, StepStatus::Error);
    }
}
