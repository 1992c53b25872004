//! Tuning knobs for document assembly.

use crate::constants::{SanitizeFlags, FALLBACK_KEYWORDS};
use serde::{Deserialize, Serialize};

/// Options controlling sanitization, sectioning, and image insertion.
///
/// All values have sensible defaults; override what you need:
///
/// ```
/// use pressroom::AssemblyOptions;
///
/// let options = AssemblyOptions::default()
///     .words_per_section(150)
///     .max_keywords(4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyOptions {
    /// Approximate word count per section; one image boundary sits between
    /// adjacent sections. Zero means "never split" (no images inserted).
    pub words_per_section: usize,
    /// How many ranked keywords to extract for image search rotation.
    pub max_keywords: usize,
    /// Candidate count requested from the provider per boundary.
    pub per_page: usize,
    /// Used when the content yields no keywords at all.
    pub fallback_keywords: Vec<String>,
    /// Which supplementary sanitize passes run after the structural pass.
    #[serde(skip)]
    pub sanitize_flags: SanitizeFlags,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            words_per_section: 200,
            max_keywords: 6,
            per_page: 10,
            fallback_keywords: FALLBACK_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            sanitize_flags: SanitizeFlags::default(),
        }
    }
}

impl AssemblyOptions {
    pub fn words_per_section(mut self, words: usize) -> Self {
        self.words_per_section = words;
        self
    }

    pub fn max_keywords(mut self, count: usize) -> Self {
        self.max_keywords = count;
        self
    }

    pub fn per_page(mut self, count: usize) -> Self {
        self.per_page = count;
        self
    }

    pub fn fallback_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn sanitize_flags(mut self, flags: SanitizeFlags) -> Self {
        self.sanitize_flags = flags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AssemblyOptions::default();
        assert_eq!(options.words_per_section, 200);
        assert_eq!(options.max_keywords, 6);
        assert_eq!(options.per_page, 10);
        assert!(!options.fallback_keywords.is_empty());
        assert_eq!(options.sanitize_flags, SanitizeFlags::all());
    }

    #[test]
    fn test_builder_chain() {
        let options = AssemblyOptions::default()
            .words_per_section(50)
            .max_keywords(3)
            .fallback_keywords(["nature"]);
        assert_eq!(options.words_per_section, 50);
        assert_eq!(options.max_keywords, 3);
        assert_eq!(options.fallback_keywords, vec!["nature".to_string()]);
    }
}
