//! Decision rules applied to a sentinel's INFO fields.

use sprobe_client::InfoFields;
use thiserror::Error;

/// Number of masters this sentinel monitors. Absent on plain servers.
pub const MASTERS_FIELD: &str = "sentinel_masters";

/// `"0"` normally, anything else while the sentinel is in TILT mode.
pub const TILT_FIELD: &str = "sentinel_tilt";

/// A field value that makes the sentinel unhealthy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Redis instance is not configured as a sentinel")]
    NotSentinel,
    #[error("Sentinel has entered TILT mode")]
    Tilt,
    #[error("Sentinel is not monitoring any masters")]
    NoMasters,
}

/// Applies the rules in order and stops at the first violation.
///
/// On success returns the informational message for an OK verdict.
pub fn evaluate(info: &InfoFields) -> Result<String, PolicyViolation> {
    let masters = info
        .get(MASTERS_FIELD)
        .map(str::trim)
        .ok_or(PolicyViolation::NotSentinel)?;

    if let Some(tilt) = info.get(TILT_FIELD) {
        if tilt.trim() != "0" {
            return Err(PolicyViolation::Tilt);
        }
    }

    if masters == "0" {
        return Err(PolicyViolation::NoMasters);
    }

    Ok(format!("Monitoring {} masters", masters))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(pairs: &[(&str, &str)]) -> InfoFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn missing_masters_field_is_not_sentinel() {
        let result = evaluate(&info(&[("role", "master"), ("sentinel_tilt", "0")]));
        assert_eq!(result, Err(PolicyViolation::NotSentinel));
    }

    #[test]
    fn role_check_runs_before_tilt_check() {
        let result = evaluate(&info(&[("sentinel_tilt", "1")]));
        assert_eq!(result, Err(PolicyViolation::NotSentinel));
    }

    #[test]
    fn tilt_mode_is_critical() {
        let result = evaluate(&info(&[("sentinel_masters", "2"), ("sentinel_tilt", "1")]));
        assert_eq!(result, Err(PolicyViolation::Tilt));
    }

    #[test]
    fn tilt_check_runs_before_master_count() {
        let result = evaluate(&info(&[("sentinel_masters", "0"), ("sentinel_tilt", "1")]));
        assert_eq!(result, Err(PolicyViolation::Tilt));
    }

    #[test]
    fn zero_masters_is_critical() {
        let result = evaluate(&info(&[("sentinel_masters", "0"), ("sentinel_tilt", "0")]));
        assert_eq!(result, Err(PolicyViolation::NoMasters));
    }

    #[test]
    fn monitored_masters_is_ok() {
        let result = evaluate(&info(&[("sentinel_masters", "3"), ("sentinel_tilt", "0")]));
        assert_eq!(result, Ok("Monitoring 3 masters".to_string()));
    }

    #[test]
    fn absent_tilt_field_is_not_tilt() {
        let result = evaluate(&info(&[("sentinel_masters", "1")]));
        assert_eq!(result, Ok("Monitoring 1 masters".to_string()));
    }

    #[test]
    fn violation_messages_are_human_readable() {
        assert_eq!(
            PolicyViolation::NotSentinel.to_string(),
            "Redis instance is not configured as a sentinel"
        );
        assert_eq!(PolicyViolation::Tilt.to_string(), "Sentinel has entered TILT mode");
        assert_eq!(
            PolicyViolation::NoMasters.to_string(),
            "Sentinel is not monitoring any masters"
        );
    }
}
