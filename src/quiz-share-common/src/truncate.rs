//! Text truncation for log lines and error messages.

use std::borrow::Cow;

/// Truncates `s` to at most `max_len` characters, "..." included.
///
/// # Examples
/// ```
/// use quiz_share_common::truncate::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
/// assert_eq!(truncate_with_ellipsis("hello world", 8), "hello...");
/// ```
pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        Cow::Owned(format!("{}...", truncated))
    }
}
