//! Reporter trait for dependency injection
//!
//! Lets the pipeline report progress without being coupled to a particular
//! console or log format.

/// Pipeline stage a package is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Transpiling,
    Compiling,
    Building,
    Staging,
    Indexing,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Transpiling => "transpiling",
            Stage::Compiling => "compiling",
            Stage::Building => "building",
            Stage::Staging => "staging",
            Stage::Indexing => "indexing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Reporter: Send + Sync {
    /// A new phase of the run has started (e.g. "Building packages").
    fn section(&self, title: &str);

    /// A package entered `stage`.
    fn stage(&self, package: &str, stage: Stage);

    /// A package finished successfully.
    fn done(&self, package: &str, detail: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Display a final summary.
    fn summary(&self, count: usize, action: &str, elapsed_secs: f64);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn stage(&self, package: &str, stage: Stage) {
        (**self).stage(package, stage);
    }
    fn done(&self, package: &str, detail: &str) {
        (**self).done(package, detail);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn summary(&self, count: usize, action: &str, elapsed_secs: f64) {
        (**self).summary(count, action, elapsed_secs);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn stage(&self, _: &str, _: Stage) {}
    fn done(&self, _: &str, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn summary(&self, _: usize, _: &str, _: f64) {}
}
