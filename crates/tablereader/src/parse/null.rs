//! Null classification of raw cell text.

/// Placeholder tokens meaning "no value", compared after trimming and
/// lower-casing.
pub const NULL_VALUES: &[&str] = &[
    "",
    "null",
    "none",
    "n/a",
    "na",
    "#na",
    "nan",
    "-",
    "--",
    "\u{2014}", // em dash
    "\u{2013}", // en dash
    "?",
    "???",
    ".",
    "..",
    "...",
];

/// Return `None` for a null token, otherwise the trimmed, lower-cased value.
pub fn clean_nulls(value: &str) -> Option<String> {
    let cleaned = value.trim().to_lowercase();
    if NULL_VALUES.contains(&cleaned.as_str()) {
        None
    } else {
        Some(cleaned)
    }
}

/// Check if a value represents a missing/null value.
pub fn is_null(value: &str) -> bool {
    clean_nulls(value).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_value() {
        assert!(is_null(""));
        assert!(is_null("   "));
        assert!(is_null("NA"));
        assert!(is_null(" n/a "));
        assert!(is_null("NULL"));
        assert!(is_null("None"));
        assert!(is_null("#NA"));
        assert!(is_null("NaN"));
        assert!(is_null("\u{2014}"));
        assert!(is_null(" \u{2013} "));
        assert!(is_null("???"));
        assert!(is_null("..."));
        assert!(!is_null("value"));
        assert!(!is_null("0"));
        assert!(!is_null("nil"));
        assert!(!is_null("----"));
    }

    #[test]
    fn test_clean_lowercases_and_trims() {
        assert_eq!(clean_nulls("  MacBook Pro "), Some("macbook pro".to_string()));
        assert_eq!(clean_nulls("\tJan 15, 2024\n"), Some("jan 15, 2024".to_string()));
    }
}
