//! # Sentinel Health Check
//!
//! Purpose: Query a sentinel's INFO fields, apply the policy, and always
//! reach a terminal verdict.
//!
//! ## Design Principles
//! 1. **Strategy Pattern**: Fields come from an `InfoSource`, so the same
//!    check runs against a live client or an in-memory report.
//! 2. **Single Error Mapping**: Every failure becomes a `CheckError`, and
//!    exactly one step turns it into a CRITICAL verdict.
//! 3. **Guaranteed Release**: The source is closed on every path before the
//!    verdict is returned.

use sprobe_client::{ClientConfig, ClientError, ClientResult, InfoFields, SentinelClient};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::policy::{self, PolicyViolation};
use crate::severity::{Severity, Verdict};

/// Result type for the check pipeline.
pub type CheckResult<T> = Result<T, CheckError>;

/// Anything that stops the check short of an OK verdict.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
}

/// Supplier of INFO fields for the check.
pub trait InfoSource {
    /// Fetches a fresh set of fields.
    fn info_fields(&mut self) -> ClientResult<InfoFields>;

    /// Releases any held resources. Must be idempotent.
    fn close(&mut self);
}

impl InfoSource for SentinelClient {
    fn info_fields(&mut self) -> ClientResult<InfoFields> {
        SentinelClient::info_fields(self)
    }

    fn close(&mut self) {
        SentinelClient::close(self);
    }
}

/// Checks the sentinel at `config` over one fresh connection.
pub fn check_sentinel(config: ClientConfig) -> Verdict {
    debug!(addr = %config.addr(), "checking sentinel");
    let mut client = SentinelClient::new(config);
    run_check(&mut client)
}

/// Runs the full check against `source` and closes it.
pub fn run_check<S: InfoSource>(source: &mut S) -> Verdict {
    let outcome = query_and_evaluate(source);
    source.close();

    match outcome {
        Ok(message) => {
            info!(%message, "sentinel healthy");
            Verdict::with(Severity::Ok, message)
        }
        Err(err) => {
            warn!(error = %err, "sentinel check failed");
            Verdict::with(Severity::Critical, err.to_string())
        }
    }
}

fn query_and_evaluate<S: InfoSource>(source: &mut S) -> CheckResult<String> {
    let info = source.info_fields()?;
    debug!(fields = info.len(), "info fields received");
    Ok(policy::evaluate(&info)?)
}
