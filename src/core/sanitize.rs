//! Value normalization and character-set checks applied before encoding.

/// Normalize a raw field value.
///
/// Trims surrounding whitespace, optionally upper-cases, and truncates to
/// `max_length` characters. Truncation is lossy and never fails; length
/// rejection is the validator's job. An absent value sanitizes to `""`.
///
/// ```
/// use invoic::core::sanitize;
///
/// assert_eq!(sanitize("  us ", true, None), "US");
/// assert_eq!(sanitize(Some("Industrial Avenue"), false, Some(10)), "Industrial");
/// assert_eq!(sanitize(None, false, None), "");
/// ```
pub fn sanitize<'a>(
    value: impl Into<Option<&'a str>>,
    uppercase: bool,
    max_length: Option<usize>,
) -> String {
    let Some(value) = value.into() else {
        return String::new();
    };

    let mut result = value.trim().to_string();
    if uppercase {
        result = result.to_uppercase();
    }
    if let Some(max) = max_length {
        truncate_chars(&mut result, max);
    }
    result
}

/// Whether `value` is non-empty and consists only of ASCII letters, digits,
/// spaces and the symbols `_ - . @ # &`.
pub fn is_alphanumeric_text(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.' | '@' | '#' | '&'))
}

/// Length in characters (not bytes).
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn truncate_chars(s: &mut String, max: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
}
