//! Permissive decimal grammar for `float` columns.
//!
//! Accepts an optional sign, digits with an optional fraction (or a bare
//! fraction such as `.5`), and an optional exponent. Grouping separators,
//! surrounding text and the non-finite spellings (`inf`, `nan`) are rejected.

use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("decimal grammar is a valid regex")
});

pub fn is_permissive_decimal(value: &str) -> bool {
    DECIMAL.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_forms() {
        for value in ["12.5", "-3", "1e4", "+0.25", ".5", "7.", "1E-3", "10.50", "-2.5e+10"] {
            assert!(is_permissive_decimal(value), "{value} should parse");
        }
    }

    #[test]
    fn rejects_grouping_and_junk() {
        for value in ["abc", "1,000", "1 000", "1_000", ".", "-", "e5", "1e", "12.5.1", "inf", "NaN", "$5"] {
            assert!(!is_permissive_decimal(value), "{value} should not parse");
        }
    }

    #[test]
    fn accepted_forms_are_rust_floats() {
        for value in ["-3", "1e4", "+.5", "7.", "1E-3"] {
            assert!(is_permissive_decimal(value));
            assert!(value.parse::<f64>().is_ok(), "{value}");
        }
    }
}
