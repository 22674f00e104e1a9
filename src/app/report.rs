//! Progress reporting seam for the scaffolding pipeline
//!
//! The pipeline reports step transitions through this trait rather than
//! branching on whether a live tracker is attached. Two presentation
//! implementations live in the CLI layer: one feeding the step tree,
//! one emitting immediate log lines. They are mutually exclusive per
//! invocation and selected once, up front.

/// Receiver for pipeline step events.
///
/// Implementations must not fail observably: reporting is presentation,
/// and a rendering hiccup never aborts the pipeline.
pub trait Reporter: Send + Sync {
    /// Register a step so it renders in order, pending
    fn add(&self, key: &str, label: &str);

    /// Mark a step running
    fn start(&self, key: &str, detail: &str);

    /// Mark a step done
    fn complete(&self, key: &str, detail: &str);

    /// Mark a step failed
    fn error(&self, key: &str, detail: &str);

    /// Mark a step skipped
    fn skip(&self, key: &str, detail: &str);
}

/// Reporter that discards every event
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn add(&self, _key: &str, _label: &str) {}
    fn start(&self, _key: &str, _detail: &str) {}
    fn complete(&self, _key: &str, _detail: &str) {}
    fn error(&self, _key: &str, _detail: &str) {}
    fn skip(&self, _key: &str, _detail: &str) {}
}
