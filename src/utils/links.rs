//! Social profile link formatting.

const INSTAGRAM_BASE: &str = "https://www.instagram.com/";

/// Turn an Instagram handle or URL into an absolute URL.
///
/// Blank input yields `None`. Values that already start with `http://` or
/// `https://` are returned trimmed; anything else is treated as a handle.
pub fn format_social_link(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }

    Some(format!("{}{}", INSTAGRAM_BASE, trimmed))
}

/// Trim a link, mapping blank values to `None`
pub fn trimmed_link(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
