//! Hierarchical step tracking and rendering
//!
//! Tracks an ordered list of named steps (pending, running, done,
//! error, skipped) and renders them as a tree, in the manner of
//! assistant-CLI progress output. Every mutation triggers a refresh
//! through an attached [`RefreshPort`]; the port contract is no-throw,
//! so tracker operations themselves can never fail observably.

use crossterm::style::Stylize;

/// Status of a single tracked step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Done,
    Error,
    Skipped,
}

/// One named step in the tree
#[derive(Debug, Clone)]
pub struct Step {
    pub key: String,
    pub label: String,
    pub status: StepStatus,
    pub detail: String,
}

/// Notification port invoked after every tracker mutation.
///
/// Implementations must not fail observably: rendering problems are
/// swallowed inside the port, never surfaced to the tracker's caller.
pub trait RefreshPort: Send {
    fn refresh(&self, frame: &str);
}

/// Port that drops every frame (no live display attached)
#[derive(Debug, Default)]
pub struct NullRefresh;

impl RefreshPort for NullRefresh {
    fn refresh(&self, _frame: &str) {}
}

/// Ordered collection of steps with live refresh on mutation.
///
/// Created once per command invocation, mutated throughout, rendered a
/// final time as a static snapshot, then discarded.
pub struct StepTracker {
    title: String,
    steps: Vec<Step>,
    port: Box<dyn RefreshPort>,
}

impl StepTracker {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
            port: Box::new(NullRefresh),
        }
    }

    /// Attach the live refresh port; replaces any previous port
    pub fn attach_port(&mut self, port: Box<dyn RefreshPort>) {
        self.port = port;
    }

    /// Append a pending step if the key is absent; no-op otherwise
    pub fn add(&mut self, key: &str, label: &str) {
        if self.position(key).is_none() {
            self.steps.push(Step {
                key: key.to_string(),
                label: label.to_string(),
                status: StepStatus::Pending,
                detail: String::new(),
            });
            self.notify();
        }
    }

    pub fn start(&mut self, key: &str, detail: &str) {
        self.update(key, StepStatus::Running, detail);
    }

    pub fn complete(&mut self, key: &str, detail: &str) {
        self.update(key, StepStatus::Done, detail);
    }

    pub fn error(&mut self, key: &str, detail: &str) {
        self.update(key, StepStatus::Error, detail);
    }

    pub fn skip(&mut self, key: &str, detail: &str) {
        self.update(key, StepStatus::Skipped, detail);
    }

    /// Transition a step; unknown keys synthesize a step whose label is
    /// the key itself. A non-empty detail replaces the stored one.
    fn update(&mut self, key: &str, status: StepStatus, detail: &str) {
        match self.position(key) {
            Some(index) => {
                let step = &mut self.steps[index];
                step.status = status;
                if !detail.is_empty() {
                    step.detail = detail.to_string();
                }
            }
            None => self.steps.push(Step {
                key: key.to_string(),
                label: key.to_string(),
                status,
                detail: detail.to_string(),
            }),
        }
        self.notify();
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.key == key)
    }

    fn notify(&self) {
        let frame = self.render();
        self.port.refresh(&frame);
    }

    /// Render the tree: title plus one glyph/label/detail line per step
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title.as_str().cyan().to_string());
        out.push('\n');

        for (i, step) in self.steps.iter().enumerate() {
            let guide = if i + 1 == self.steps.len() {
                "└─"
            } else {
                "├─"
            };
            let glyph = match step.status {
                StepStatus::Done => "●".green().to_string(),
                StepStatus::Pending => "○".dark_grey().to_string(),
                StepStatus::Running => "○".cyan().to_string(),
                StepStatus::Error => "●".red().to_string(),
                StepStatus::Skipped => "○".yellow().to_string(),
            };

            let text = if step.status == StepStatus::Pending {
                // Entire pending row is dimmed
                let body = if step.detail.is_empty() {
                    step.label.clone()
                } else {
                    format!("{} ({})", step.label, step.detail)
                };
                body.as_str().dark_grey().to_string()
            } else if step.detail.is_empty() {
                step.label.clone()
            } else {
                let detail = format!("({})", step.detail);
                format!("{} {}", step.label, detail.as_str().dark_grey())
            };

            out.push_str(&format!(
                "{} {} {}\n",
                guide.dark_grey(),
                glyph,
                text
            ));
        }
        out
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn has_errors(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Error)
    }
}

impl std::fmt::Debug for StepTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepTracker")
            .field("title", &self.title)
            .field("steps", &self.steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingPort(Arc<AtomicUsize>);

    impl RefreshPort for CountingPort {
        fn refresh(&self, _frame: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_keys_unique_in_first_seen_order() {
        let mut tracker = StepTracker::new("t");
        tracker.add("fetch", "Fetch");
        tracker.add("extract", "Extract");
        tracker.start("fetch", "");
        tracker.complete("surprise", "came from nowhere");
        tracker.add("fetch", "Fetch again"); // idempotent no-op
        tracker.error("extract", "boom");
        tracker.skip("surprise", "");

        let keys: Vec<&str> = tracker.steps().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["fetch", "extract", "surprise"]);
        // First-seen label wins
        assert_eq!(tracker.steps()[0].label, "Fetch");
    }

    #[test]
    fn test_unknown_key_synthesizes_step_with_key_as_label() {
        let mut tracker = StepTracker::new("t");
        tracker.complete("ghost", "done anyway");

        let step = &tracker.steps()[0];
        assert_eq!(step.key, "ghost");
        assert_eq!(step.label, "ghost");
        assert_eq!(step.status, StepStatus::Done);
        assert_eq!(step.detail, "done anyway");
    }

    #[test]
    fn test_empty_detail_keeps_previous_detail() {
        let mut tracker = StepTracker::new("t");
        tracker.add("fetch", "Fetch");
        tracker.start("fetch", "contacting feed");
        tracker.complete("fetch", "");

        let step = &tracker.steps()[0];
        assert_eq!(step.status, StepStatus::Done);
        assert_eq!(step.detail, "contacting feed");
    }

    #[test]
    fn test_nonempty_detail_replaces_previous() {
        let mut tracker = StepTracker::new("t");
        tracker.start("fetch", "first");
        tracker.complete("fetch", "second");
        assert_eq!(tracker.steps()[0].detail, "second");
    }

    #[test]
    fn test_every_mutation_refreshes() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut tracker = StepTracker::new("t");
        tracker.attach_port(Box::new(CountingPort(Arc::clone(&count))));

        tracker.add("a", "A"); // refresh
        tracker.add("a", "A"); // no-op, no refresh
        tracker.start("a", ""); // refresh
        tracker.complete("a", ""); // refresh
        tracker.skip("b", ""); // refresh (synthesized)

        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_render_contains_labels_and_details() {
        let mut tracker = StepTracker::new("Initialize Project");
        tracker.add("fetch", "Fetch latest release");
        tracker.complete("fetch", "release v2.0");
        tracker.add("later", "Still pending");

        let frame = tracker.render();
        assert!(frame.contains("Initialize Project"));
        assert!(frame.contains("Fetch latest release"));
        assert!(frame.contains("(release v2.0)"));
        assert!(frame.contains("Still pending"));
        assert_eq!(frame.lines().count(), 3);
    }

    #[test]
    fn test_has_errors() {
        let mut tracker = StepTracker::new("t");
        tracker.add("a", "A");
        assert!(!tracker.has_errors());
        tracker.error("a", "broken");
        assert!(tracker.has_errors());
    }
}
