//! # INFO Report Parsing
//!
//! The server's INFO payload is a flat text report of `key:value` lines,
//! grouped under `# Section` headers. Headers and any other line without a
//! `:` are ignored.

use std::collections::HashMap;

/// Key/value fields from one INFO report. Rebuilt on every query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoFields {
    fields: HashMap<String, String>,
}

impl InfoFields {
    /// Parses an INFO payload.
    ///
    /// Lines are split at the first `:`, so values such as
    /// `address=127.0.0.1:6379` survive intact. A repeated key keeps its
    /// last value.
    pub fn parse(payload: &str) -> Self {
        let fields = payload
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        InfoFields { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InfoFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        InfoFields {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sentinel_report() {
        let info = InfoFields::parse("role:sentinel\nsentinel_masters:2\nsentinel_tilt:0\n");
        let expected: InfoFields = [
            ("role", "sentinel"),
            ("sentinel_masters", "2"),
            ("sentinel_tilt", "0"),
        ]
        .into_iter()
        .collect();
        assert_eq!(info, expected);
        assert_eq!(info.len(), 3);
    }

    #[test]
    fn drops_headers_blank_and_malformed_lines() {
        let info = InfoFields::parse("# Sentinel\r\n\r\nnot a field\r\nsentinel_masters:1\r\n");
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("sentinel_masters"), Some("1"));
    }

    #[test]
    fn strips_crlf_terminators() {
        let info = InfoFields::parse("sentinel_tilt:0\r\nsentinel_masters:4\r\n");
        assert_eq!(info.get("sentinel_tilt"), Some("0"));
        assert_eq!(info.get("sentinel_masters"), Some("4"));
    }

    #[test]
    fn splits_on_first_separator_only() {
        let info = InfoFields::parse(
            "master0:name=mymaster,status=ok,address=127.0.0.1:6379,slaves=1,sentinels=3\n",
        );
        assert_eq!(
            info.get("master0"),
            Some("name=mymaster,status=ok,address=127.0.0.1:6379,slaves=1,sentinels=3")
        );
    }

    #[test]
    fn last_duplicate_wins() {
        let info = InfoFields::parse("sentinel_masters:1\nsentinel_masters:5\n");
        assert_eq!(info.get("sentinel_masters"), Some("5"));
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn keeps_empty_values() {
        let info = InfoFields::parse("executable:\n");
        assert!(info.contains("executable"));
        assert_eq!(info.get("executable"), Some(""));
    }

    #[test]
    fn empty_payload_yields_no_fields() {
        assert!(InfoFields::parse("").is_empty());
    }
}
