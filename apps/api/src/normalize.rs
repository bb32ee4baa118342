//! Text normalization shared by skill, responsibility and feedback handling.
//!
//! Every comparison in the matching core goes through these helpers so that
//! "Python", " python " and "PYTHON" are one key everywhere.

use std::collections::BTreeMap;
use std::collections::HashSet;

/// Trims, casefolds and collapses internal whitespace runs to a single space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`normalize_text`], but also drops trailing sentence punctuation.
/// Used for free-text items such as responsibilities and feedback messages.
pub fn normalize_sentence(text: &str) -> String {
    normalize_text(text)
        .trim_end_matches(|c: char| matches!(c, '.' | ';' | ':' | ',' | '!'))
        .trim_end()
        .to_string()
}

/// Stable dedup: keeps the first item for every key, drops items whose key is empty.
pub fn dedupe_by_key<T, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let k = key(item);
            !k.is_empty() && seen.insert(k)
        })
        .collect()
}

/// Groups items by key. Groups are ordered by first appearance; items keep input order.
pub fn group_by_key<T, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<(String, Vec<T>)>
where
    F: Fn(&T) -> String,
{
    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();

    for item in items {
        let k = key(&item);
        if k.is_empty() {
            continue;
        }
        if !groups.contains_key(&k) {
            order.push(k.clone());
        }
        groups.entry(k).or_default().push(item);
    }

    order
        .into_iter()
        .filter_map(|k| groups.remove(&k).map(|items| (k, items)))
        .collect()
}

/// Dedupes raw strings by [`normalize_text`], keeping the first spelling seen.
pub fn dedupe_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    dedupe_by_key(
        terms.iter().map(|t| t.as_ref().trim().to_string()),
        |t| normalize_text(t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_trims_casefolds_and_collapses() {
        assert_eq!(normalize_text("  Machine\t  Learning \n"), "machine learning");
        assert_eq!(normalize_text("PYTHON"), "python");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_normalize_sentence_strips_trailing_punctuation() {
        assert_eq!(
            normalize_sentence("Build data pipelines."),
            normalize_sentence("build   data pipelines")
        );
        assert_eq!(normalize_sentence("Own on-call;  "), "own on-call");
    }

    #[test]
    fn test_dedupe_by_key_keeps_first_occurrence() {
        let items = vec!["Python", "python ", "SQL", "PYTHON", "  "];
        let deduped = dedupe_by_key(items, |s| normalize_text(s));
        assert_eq!(deduped, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_group_by_key_preserves_first_appearance_order() {
        let items = vec![("b", 1), ("a", 2), ("B", 3)];
        let groups = group_by_key(items, |(k, _)| normalize_text(k));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b");
        assert_eq!(groups[0].1, vec![("b", 1), ("B", 3)]);
        assert_eq!(groups[1].0, "a");
    }

    #[test]
    fn test_dedupe_terms_trims_display_spelling() {
        let terms = dedupe_terms(&[" Rust ", "rust", "Go"]);
        assert_eq!(terms, vec!["Rust".to_string(), "Go".to_string()]);
    }
}
