//! Search over the dialogue list

use std::borrow::Cow;

use crate::dialogue::DialogueEntry;

/// Entries whose title, original or translation contains `query`,
/// ignoring case. Relative order is preserved.
///
/// An empty query hands back the input slice without copying.
pub fn filter_entries<'a>(entries: &'a [DialogueEntry], query: &str) -> Cow<'a, [DialogueEntry]> {
    if query.is_empty() {
        return Cow::Borrowed(entries);
    }

    let needle = query.to_lowercase();
    Cow::Owned(
        entries
            .iter()
            .filter(|e| e.matches_lowercase(&needle))
            .cloned()
            .collect(),
    )
}
