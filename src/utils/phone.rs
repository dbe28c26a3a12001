//! Phone number comparison.

/// Canonicalize a phone number for equality checks.
///
/// Removes whitespace, hyphens and parentheses. No country-code handling is
/// attempted, so `+972...` and `0...` stay different. Never use the result for
/// display.
pub fn normalize_phone(phone: Option<&str>) -> String {
    phone
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Whether two phone numbers belong to the same person
pub fn same_phone(a: Option<&str>, b: Option<&str>) -> bool {
    normalize_phone(a) == normalize_phone(b)
}
