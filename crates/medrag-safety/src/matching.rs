//! Word-boundary matching over normalized text

/// Whether `alias` occurs in `text` on word boundaries
///
/// Both inputs must already be normalized. The match may be followed by a
/// plural suffix (`s` or `es`), so `nsaid` is found in `nsaids`.
pub(crate) fn contains_alias(text: &str, alias: &str) -> bool {
    contains_bounded(text, alias, &["", "s", "es"])
}

/// Whether `phrase` occurs in `text` on exact word boundaries
pub(crate) fn contains_word(text: &str, phrase: &str) -> bool {
    contains_bounded(text, phrase, &[""])
}

fn contains_bounded(text: &str, needle: &str, suffixes: &[&str]) -> bool {
    if needle.is_empty() {
        return false;
    }
    text.char_indices().any(|(start, _)| {
        text[start..].starts_with(needle)
            && starts_word(text, start)
            && ends_word(&text[start + needle.len()..], suffixes)
    })
}

fn starts_word(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphanumeric())
}

fn ends_word(rest: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|suffix| {
        rest.strip_prefix(suffix)
            .is_some_and(|after| after.chars().next().is_none_or(|c| !c.is_alphanumeric()))
    })
}
