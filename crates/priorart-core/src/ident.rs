//! Publication number normalization.
//!
//! Bulk archives and the index key patents by the bare digits of the
//! publication number; humans write `US20160148332A1`. Normalization strips
//! a leading 2-letter country code and a trailing kind code so both forms
//! resolve to the same key.

use crate::error::{ReconstructError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Trailing kind code: one letter followed by zero or more digits (A1, B2, A).
static KIND_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][0-9]*$").expect("regex is compile-time constant"));

/// Canonical digits-only publication number.
///
/// Construction goes through [`PatentKey::normalize`], so a `PatentKey` is
/// always non-empty and ASCII digits only. Normalizing an already canonical
/// key returns it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PatentKey(String);

impl PatentKey {
    /// Normalize a free-form publication number into a canonical key.
    ///
    /// Rules, applied in order:
    /// 1. uppercase and trim surrounding whitespace
    /// 2. strip a leading 2-letter alphabetic country code if present
    /// 3. strip a trailing kind code (`[A-Z][0-9]*`) if present
    ///
    /// # Errors
    ///
    /// Returns [`ReconstructError::InvalidIdentifier`] if the remainder is
    /// empty or not purely digits. This is local validation, reported before
    /// any I/O; it is not a lookup failure.
    pub fn normalize(input: &str) -> Result<Self> {
        let mut key = input.trim().to_uppercase();

        let prefix_is_country = {
            let mut chars = key.chars();
            matches!(
                (chars.next(), chars.next()),
                (Some(a), Some(b)) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic()
            )
        };
        if prefix_is_country {
            key.drain(..2);
        }

        if let Some(m) = KIND_CODE.find(&key) {
            key.truncate(m.start());
        }

        if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReconstructError::InvalidIdentifier(input.to_string()));
        }

        Ok(Self(key))
    }

    /// The canonical digits-only key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_country_prefix_and_kind_code() {
        let key = PatentKey::normalize("US20160148332A1").unwrap();
        assert_eq!(key.as_str(), "20160148332");
    }

    #[test]
    fn bare_digits_pass_through() {
        let key = PatentKey::normalize("20160148332").unwrap();
        assert_eq!(key.as_str(), "20160148332");
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["US20160148332A1", "20160148332", "us9876543b2", " US1234567 "] {
            let once = PatentKey::normalize(input).unwrap();
            let twice = PatentKey::normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "input {input:?}");
        }
    }

    #[test]
    fn kind_code_without_digits_is_stripped() {
        let key = PatentKey::normalize("US1234567A").unwrap();
        assert_eq!(key.as_str(), "1234567");
    }

    #[test]
    fn lowercase_input_is_uppercased_first() {
        let key = PatentKey::normalize("us20160148332a1").unwrap();
        assert_eq!(key.as_str(), "20160148332");
    }

    #[test]
    fn rejects_inputs_with_no_digits() {
        for input in ["", "US", "USA1", "   "] {
            assert!(
                matches!(
                    PatentKey::normalize(input),
                    Err(ReconstructError::InvalidIdentifier(_))
                ),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_interior_letters() {
        // Accepting these would break idempotency: a second pass would strip
        // the now-trailing letter run and produce a different key.
        assert!(PatentKey::normalize("20A16B12").is_err());
    }
}
