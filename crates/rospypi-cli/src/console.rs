//! Plain-text progress output.

use rospypi_core::{Reporter, Stage};

/// Writes progress to stdout and warnings to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        println!("\n{title}");
    }

    fn stage(&self, package: &str, stage: Stage) {
        println!("  {package:<24} {stage}");
    }

    fn done(&self, package: &str, detail: &str) {
        println!("  {package:<24} done ({detail})");
    }

    fn info(&self, msg: &str) {
        println!("{msg}");
    }

    fn warning(&self, msg: &str) {
        eprintln!("warning: {msg}");
    }

    fn summary(&self, count: usize, action: &str, elapsed_secs: f64) {
        let noun = if count == 1 { "package" } else { "packages" };
        println!("{count} {noun} {action} in {elapsed_secs:.1}s");
    }
}
