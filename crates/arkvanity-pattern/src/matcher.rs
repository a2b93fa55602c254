//! Prefix/suffix match rules

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum JobError {
    #[error("Job needs a prefix and/or a suffix")]
    EmptyPattern,
}

/// A single prefix/suffix match rule.
///
/// Built once from configuration and read-only afterwards. Construction never
/// fails: a rule without any pattern is kept but marked `skip`, and
/// `require_both` is dropped to OR semantics unless both patterns are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSpec {
    prefix: String,
    suffix: String,
    require_both: bool,
    case_insensitive: bool,
    skip: bool,
}

impl JobSpec {
    pub fn new(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        require_both: bool,
        case_insensitive: bool,
    ) -> Self {
        let prefix = prefix.into();
        let suffix = suffix.into();
        let skip = prefix.is_empty() && suffix.is_empty();
        let require_both = require_both && !prefix.is_empty() && !suffix.is_empty();

        Self {
            prefix,
            suffix,
            require_both,
            case_insensitive,
            skip,
        }
    }

    /// Create a prefix-only job
    pub fn prefix(value: impl Into<String>) -> Self {
        Self::new(value, "", false, false)
    }

    /// Create a suffix-only job
    pub fn suffix(value: impl Into<String>) -> Self {
        Self::new("", value, false, false)
    }

    /// Make the job case insensitive
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Why the job is skipped, if it is
    pub fn validate(&self) -> Result<(), JobError> {
        if self.skip {
            return Err(JobError::EmptyPattern);
        }
        Ok(())
    }

    pub fn prefix_value(&self) -> &str {
        &self.prefix
    }

    pub fn suffix_value(&self) -> &str {
        &self.suffix
    }

    pub fn requires_both(&self) -> bool {
        self.require_both
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// Does `address` start with the configured prefix? False when no prefix is set.
    pub fn has_prefix(&self, address: &str) -> bool {
        if self.prefix.is_empty() {
            return false;
        }
        let (addr, pat) = (address.as_bytes(), self.prefix.as_bytes());
        addr.len() >= pat.len() && self.compare(&addr[..pat.len()], pat)
    }

    /// Does `address` end with the configured suffix? False when no suffix is set.
    pub fn has_suffix(&self, address: &str) -> bool {
        if self.suffix.is_empty() {
            return false;
        }
        let (addr, pat) = (address.as_bytes(), self.suffix.as_bytes());
        addr.len() >= pat.len() && self.compare(&addr[addr.len() - pat.len()..], pat)
    }

    /// The match predicate
    pub fn evaluate(&self, address: &str) -> bool {
        if self.skip {
            return false;
        }
        if self.require_both {
            self.has_prefix(address) && self.has_suffix(address)
        } else {
            self.has_prefix(address) || self.has_suffix(address)
        }
    }

    /// Human readable description, e.g. `prefix 'AB' OR suffix 'EF'`
    pub fn describe(&self) -> String {
        let mut text = match (self.prefix.is_empty(), self.suffix.is_empty()) {
            (true, true) => "nothing".to_string(),
            (false, true) => format!("prefix '{}'", self.prefix),
            (true, false) => format!("suffix '{}'", self.suffix),
            (false, false) => format!(
                "prefix '{}' {} suffix '{}'",
                self.prefix,
                if self.require_both { "AND" } else { "OR" },
                self.suffix
            ),
        };
        if self.case_insensitive {
            text.push_str(" (case-insensitive)");
        }
        text
    }

    #[inline]
    fn compare(&self, window: &[u8], pattern: &[u8]) -> bool {
        if self.case_insensitive {
            window.eq_ignore_ascii_case(pattern)
        } else {
            window == pattern
        }
    }
}
