//! Keyword extraction for image search.
//!
//! Derives ranked search terms from plain-text content by frequency. The
//! ranking is deliberately simple: lowercase alphabetic tokens of four or
//! more letters, minus a fixed stop-word set, sorted by descending count
//! with first-seen order breaking ties.

use crate::constants::{REGEXPS, STOP_WORDS};
use crate::utils;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Extract up to `max_keywords` ranked search terms from `text`.
///
/// Input is expected to be sanitized already; a defensive tag-strip pass
/// runs regardless. Returns an empty list when nothing qualifies — the
/// caller decides on fallback terms.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    if max_keywords == 0 || text.trim().is_empty() {
        return Vec::new();
    }

    let plain = utils::strip_tags(text).to_lowercase();

    // Count in one pass, remembering first-seen order for stable ties.
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for token in REGEXPS.alpha_token.find_iter(&plain) {
        let word = token.as_str();
        if STOP_WORD_SET.contains(word) {
            continue;
        }
        match counts.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                counts.insert(word.to_string(), 1);
                order.push(word.to_string());
            }
        }
    }

    // Stable sort: equal counts keep first-encountered order.
    order.sort_by_key(|word| std::cmp::Reverse(counts[word]));
    order.truncate(max_keywords);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_by_frequency() {
        let text = "solar panels generate power. solar energy beats coal. solar wins.";
        let keywords = extract_keywords(text, 3);
        assert_eq!(keywords[0], "solar");
        assert_eq!(keywords.len(), 3);
    }

    #[test]
    fn test_stop_words_excluded() {
        let keywords = extract_keywords("this that with have will from garden", 10);
        assert_eq!(keywords, vec!["garden".to_string()]);
    }

    #[test]
    fn test_short_tokens_excluded() {
        let keywords = extract_keywords("cat dog oak maple", 10);
        assert_eq!(keywords, vec!["maple".to_string()]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let keywords = extract_keywords("zebra apple zebra apple mango", 10);
        assert_eq!(
            keywords,
            vec!["zebra".to_string(), "apple".to_string(), "mango".to_string()]
        );
    }

    #[test]
    fn test_max_keywords_cap() {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel";
        assert_eq!(extract_keywords(text, 3).len(), 3);
    }

    #[test]
    fn test_strips_markup_before_tokenizing() {
        let keywords = extract_keywords("<p>gardening</p><script>ignored</script>", 10);
        assert!(keywords.contains(&"gardening".to_string()));
        assert!(!keywords.contains(&"script".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_keywords("", 5).is_empty());
        assert!(extract_keywords("of to in at", 5).is_empty());
        assert!(extract_keywords("words here", 0).is_empty());
    }
}
