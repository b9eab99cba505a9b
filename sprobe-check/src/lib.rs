//! # Sentinel Health Check
//!
//! Purpose: Turn a sentinel's INFO report into a monitoring verdict: a
//! severity, a one-line summary, and an exit code.
//!
//! ## Design Principles
//! 1. **Linear Policy**: Rules run in a fixed order and stop at the first
//!    critical finding.
//! 2. **Never Escape**: Every failure is mapped to a CRITICAL verdict.
//! 3. **Accumulator Pattern**: Severity only ever rises within a verdict.

pub mod check;
pub mod config;
pub mod policy;
pub mod severity;

pub use check::{check_sentinel, run_check, CheckError, CheckResult, InfoSource};
pub use config::{CliArgs, Config, ConfigError};
pub use policy::PolicyViolation;
pub use severity::{Severity, Verdict};
