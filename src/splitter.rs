//! Word-bounded content sectioning.
//!
//! Splits sanitized content into contiguous sections of roughly
//! `words_per_section` words without ever breaking inside a paragraph.
//! Paragraph boundaries are blank-line runs and `<p>`/`</p>` tags; the
//! boundary markers themselves are kept and reattached to the section they
//! border, so concatenating the sections reconstructs the content.

use crate::constants::REGEXPS;

/// A contiguous chunk of content plus its word count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub text: String,
    pub word_count: usize,
}

enum Part<'a> {
    Text(&'a str),
    Marker(&'a str),
}

/// Split `content` into sections of at most `words_per_section` words,
/// paragraph boundaries permitting. A paragraph longer than the limit
/// becomes its own oversized section. `words_per_section == 0` disables
/// splitting and yields at most one section.
pub fn split(content: &str, words_per_section: usize) -> Vec<Section> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if words_per_section == 0 {
        return vec![Section {
            text: trimmed.to_string(),
            word_count: count_words(trimmed),
        }];
    }

    let mut sections = Vec::new();
    let mut current = String::new();
    let mut current_words = 0usize;

    for part in split_with_markers(content) {
        match part {
            // Markers and blank runs attach to the section in progress.
            Part::Marker(marker) => current.push_str(marker),
            Part::Text(text) if text.trim().is_empty() => current.push_str(text),
            Part::Text(text) => {
                let words = count_words(text);
                if current_words > 0 && current_words + words > words_per_section {
                    push_section(&mut sections, &current, current_words);
                    current.clear();
                    current.push_str(text);
                    current_words = words;
                } else {
                    current.push_str(text);
                    current_words += words;
                }
            }
        }
    }

    push_section(&mut sections, &current, current_words);
    sections
}

/// Count `\w+` tokens; markup boundary markers contribute zero.
pub fn count_words(text: &str) -> usize {
    REGEXPS.word.find_iter(text).count()
}

/// Cut `content` at paragraph markers, keeping the markers as their own
/// parts. `Regex::split` would discard them, so walk the matches directly.
fn split_with_markers(content: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let mut last = 0;
    for found in REGEXPS.paragraph_marker.find_iter(content) {
        if found.start() > last {
            parts.push(Part::Text(&content[last..found.start()]));
        }
        parts.push(Part::Marker(found.as_str()));
        last = found.end();
    }
    if last < content.len() {
        parts.push(Part::Text(&content[last..]));
    }
    parts
}

fn push_section(sections: &mut Vec<Section>, text: &str, word_count: usize) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        sections.push(Section {
            text: trimmed.to_string(),
            word_count,
        });
    }
}
