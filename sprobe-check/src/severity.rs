//! # Severity Scale and Verdict Accumulator
//!
//! Purpose: Track the worst state reached during a check together with the
//! message fragments that explain it, then render the one-line summary and
//! exit code a monitoring framework expects.
//!
//! ## Design Principles
//! 1. **Monotonic Severity**: `raise` keeps the maximum; severity never
//!    goes back down once raised.
//! 2. **Explicit Accumulator**: The verdict is a value threaded through the
//!    check, not process-global state.
//! 3. **Four-Level Convention**: OK/WARNING/CRITICAL/UNKNOWN map to exit
//!    codes 0/1/2/3.

use std::fmt;

/// Check outcome, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    /// Process exit code for this severity.
    pub fn exit_code(self) -> u8 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }

    /// Uppercase label used in the summary line.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worst severity seen so far plus the collected message fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    severity: Severity,
    messages: Vec<String>,
}

impl Verdict {
    /// Starts at OK with no messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a verdict with one fragment.
    pub fn with(severity: Severity, message: impl Into<String>) -> Self {
        let mut verdict = Self::new();
        verdict.raise(severity, message);
        verdict
    }

    /// Records `message` and raises the severity to at least `severity`.
    pub fn raise(&mut self, severity: Severity, message: impl Into<String>) {
        self.severity = self.severity.max(severity);
        self.messages.push(message.into());
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn exit_code(&self) -> u8 {
        self.severity.exit_code()
    }

    /// `<SEVERITY> - <fragments joined by ". ">`.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.severity, self.messages.join(". "))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
