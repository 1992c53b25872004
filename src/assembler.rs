//! End-to-end document assembly.
//!
//! Drives the pipeline: sanitize, extract keywords, split into sections,
//! then fetch and splice one image between each pair of adjacent sections.
//! Collaborator failures never escape this module; a boundary that cannot
//! get an image simply stays imageless.

use crate::constants::REGEXPS;
use crate::keywords;
use crate::options::AssemblyOptions;
use crate::provider::{ImageProvider, ImageSize};
use crate::publisher::MediaUploader;
use crate::sanitizer::Sanitizer;
use crate::selection::{self, UsedImageRegistry};
use crate::splitter;
use crate::utils;
use rand::seq::SliceRandom;
use rand::Rng;

/// Final markup plus the image URLs that were actually embedded, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyResult {
    pub markup: String,
    pub image_urls: Vec<String>,
}

/// Orchestrates one document at a time. Create once per provider/uploader
/// pairing and call [`assemble`](ContentAssembler::assemble) per document;
/// used-image tracking is scoped to each call.
pub struct ContentAssembler<'a> {
    provider: &'a dyn ImageProvider,
    uploader: Option<&'a dyn MediaUploader>,
    options: AssemblyOptions,
    sanitizer: Sanitizer,
}

impl<'a> ContentAssembler<'a> {
    pub fn new(provider: &'a dyn ImageProvider) -> Self {
        Self {
            provider,
            uploader: None,
            options: AssemblyOptions::default(),
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn with_options(mut self, options: AssemblyOptions) -> Self {
        self.sanitizer = Sanitizer::new().flags(options.sanitize_flags);
        self.options = options;
        self
    }

    /// Re-host images through this collaborator before embedding them.
    pub fn uploader(mut self, uploader: &'a dyn MediaUploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Assemble a document with a thread-local random source.
    pub fn assemble(&self, content: &str) -> AssemblyResult {
        self.assemble_with_rng(content, &mut rand::rng())
    }

    /// Assemble a document, drawing keyword order and image choice from
    /// `rng`. Never fails: the worst outcome is sanitized content with no
    /// images.
    pub fn assemble_with_rng<R: Rng + ?Sized>(&self, content: &str, rng: &mut R) -> AssemblyResult {
        if content.trim().is_empty() {
            return AssemblyResult::default();
        }

        let mut registry = UsedImageRegistry::new();
        let sanitized = self.sanitizer.sanitize(content);

        let mut search_terms = keywords::extract_keywords(&sanitized, self.options.max_keywords);
        if search_terms.is_empty() {
            search_terms = self.options.fallback_keywords.clone();
        }
        if search_terms.is_empty() {
            // Nothing to search with; publish the sanitized content as-is.
            return AssemblyResult {
                markup: sanitized,
                image_urls: Vec::new(),
            };
        }
        search_terms.shuffle(rng);

        let sections = splitter::split(&sanitized, self.options.words_per_section);
        if sections.len() <= 1 {
            return AssemblyResult {
                markup: sanitized,
                image_urls: Vec::new(),
            };
        }

        let mut markup = String::with_capacity(sanitized.len());
        let mut image_urls = Vec::new();
        let last = sections.len() - 1;

        for (index, section) in sections.iter().enumerate() {
            markup.push_str(&section.text);
            if index == last {
                break;
            }

            let keyword = &search_terms[index % search_terms.len()];
            if let Some((url, alt)) = self.image_for_boundary(keyword, &mut registry, rng) {
                if !markup.ends_with('\n') {
                    markup.push('\n');
                }
                markup.push_str(&format!(
                    "\n<p><img src=\"{}\" alt=\"{}\"></p>\n",
                    utils::escape_attr(&url),
                    v_htmlescape::escape(&alt)
                ));
                image_urls.push(url);
            }
        }

        AssemblyResult {
            markup: finalize(&markup),
            image_urls,
        }
    }

    /// Fetch, pick, resolve, and optionally re-host one image. Every failure
    /// returns `None` so the boundary is skipped, never the whole document.
    fn image_for_boundary<R: Rng + ?Sized>(
        &self,
        keyword: &str,
        registry: &mut UsedImageRegistry,
        rng: &mut R,
    ) -> Option<(String, String)> {
        let candidates = match self.provider.search(keyword, self.options.per_page) {
            Ok(candidates) => candidates,
            Err(err) => {
                log::warn!("image search for '{keyword}' failed: {err}");
                return None;
            }
        };

        let chosen = selection::select_unique(&candidates, registry, rng)?;
        let url = match self.provider.download_url(&chosen.id, ImageSize::default()) {
            Ok(Some(url)) => url,
            Ok(None) => {
                log::warn!("no download url for image {}", chosen.id);
                return None;
            }
            Err(err) => {
                log::warn!("resolving image {} failed: {err}", chosen.id);
                return None;
            }
        };

        let alt = if chosen.description.trim().is_empty() {
            keyword.to_string()
        } else {
            chosen.description.clone()
        };

        let embedded_url = match self.uploader {
            Some(uploader) => match uploader.upload(&url, &alt) {
                Ok(media) => media.url,
                Err(err) => {
                    log::warn!("media upload failed, embedding source url: {err}");
                    url
                }
            },
            None => url,
        };

        Some((embedded_url, alt))
    }
}

/// Light final pass: cap blank-line runs and trim the ends.
fn finalize(markup: &str) -> String {
    REGEXPS
        .multi_blank_lines
        .replace_all(markup, "\n\n")
        .trim()
        .to_string()
}
