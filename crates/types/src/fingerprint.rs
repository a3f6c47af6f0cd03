//! Signing-certificate fingerprint helpers
//!
//! Fingerprints are SHA-256 hex digests. They are carried verbatim from user
//! input, compared case-insensitively, and persisted upper-cased.

/// Remove all whitespace from a user-supplied fingerprint.
///
/// Returns `None` when nothing is left, so an empty field means "no fingerprint".
#[must_use]
pub fn clean_fingerprint(input: &str) -> Option<String> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Cleaned and upper-cased form used for persistence and lookup keys
#[must_use]
pub fn canonical_fingerprint(input: &str) -> Option<String> {
    clean_fingerprint(input).map(|fp| fp.to_ascii_uppercase())
}

/// Case-insensitive fingerprint comparison
#[must_use]
pub fn fingerprints_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_fingerprint_strips_whitespace() {
        assert_eq!(
            clean_fingerprint(" f3f3 0b6d\n212d\t").as_deref(),
            Some("f3f30b6d212d")
        );
        assert_eq!(clean_fingerprint("   "), None);
        assert_eq!(clean_fingerprint(""), None);
    }

    #[test]
    fn test_canonical_fingerprint_uppercases() {
        assert_eq!(canonical_fingerprint("ab cd").as_deref(), Some("ABCD"));
    }

    #[test]
    fn test_fingerprints_match_ignores_case() {
        assert!(fingerprints_match("f3F30b", "F3f30B"));
        assert!(!fingerprints_match("f3f30b", "f3f30c"));
    }
}
