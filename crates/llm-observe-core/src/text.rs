//! Small text helpers for diagnostics and display.

use std::borrow::Cow;

/// Marker appended to text cut by [`truncate`].
pub const ELLIPSIS: &str = "...";

/// Cuts `text` to at most `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was removed. Counts characters, not bytes.
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], ELLIPSIS)),
    }
}
