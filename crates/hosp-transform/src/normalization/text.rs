//! Free-text field canonicalization.

/// Canonical form of a diagnosis: uppercased, surrounding whitespace removed.
pub fn normalize_diagnosis(value: &str) -> String {
    value.to_uppercase().trim().to_string()
}
