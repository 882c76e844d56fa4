//! Helpers for running external programs.

use std::process::Output;

/// Number of output lines kept when an external program fails.
pub const FAILURE_TAIL_LINES: usize = 20;

/// Last `n` lines of a finished process's combined stdout and stderr.
///
/// Build frontends and generators are chatty on stdout and put the actual
/// failure at the end of stderr, so stderr goes last.
pub fn output_tail(output: &Output, n: usize) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

/// Render a program invocation for logs and error messages.
pub fn display_command(cmd: &std::process::Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
