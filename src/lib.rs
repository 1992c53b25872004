//! # pressroom
//!
//! Content sanitation and section-based image insertion for publishing
//! authored HTML to WordPress-style platforms.
//!
//! The pipeline takes raw, possibly messy markup and produces a clean,
//! platform-compatible document with stock images interleaved between
//! word-bounded sections:
//!
//! 1. **Sanitize** — strip the markup down to a whitelisted tag/attribute
//!    subset ([`Sanitizer`]), with a regex safety net and whitespace
//!    normalization on top of the structural pass.
//! 2. **Extract keywords** — rank content words by frequency for image
//!    search ([`keywords::extract_keywords`]).
//! 3. **Split** — partition the sanitized content into sections of roughly
//!    N words without breaking inside a paragraph ([`splitter::split`]).
//! 4. **Insert images** — for each boundary between sections, search an
//!    [`ImageProvider`] with a rotating keyword, pick a candidate not yet
//!    used in this document, optionally re-host it through a
//!    [`MediaUploader`], and splice a minimal `<img>` paragraph
//!    ([`ContentAssembler`]).
//!
//! Collaborator failures degrade gracefully: a failed search, resolve, or
//! upload costs one image at one boundary, never the document.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pressroom::{
//!     provider_from_config, AssemblyOptions, Config, ContentAssembler, ImageSource, NewPost,
//!     PostStatus,
//! };
//!
//! fn main() -> pressroom::Result<()> {
//!     // WORDPRESS_URL, WORDPRESS_USERNAME, WORDPRESS_PASSWORD,
//!     // UNSPLASH_ACCESS_KEY, ... read from the environment.
//!     let config = Config::from_env();
//!     let wordpress = config.wordpress_client()?;
//!     let provider = provider_from_config(ImageSource::Unsplash, &config);
//!
//!     let assembler = ContentAssembler::new(provider.as_ref())
//!         .uploader(&wordpress)
//!         .with_options(AssemblyOptions::default().words_per_section(200));
//!     let result = assembler.assemble("<h1>Sleep</h1><p>Quality sleep is...</p>");
//!
//!     let post = NewPost::new("On Sleep", result.markup).status(PostStatus::Draft);
//!     let published = wordpress.create_post(&post)?;
//!     println!("draft created: {}", published.link);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`sanitizer`] — whitelist HTML cleaning
//! - [`keywords`] — search-term extraction
//! - [`splitter`] — word-bounded sectioning
//! - [`selection`] — used-image tracking and random choice
//! - [`assembler`] — the end-to-end pipeline
//! - [`provider`] — image provider contract + Unsplash/Shutterstock/placeholder clients
//! - [`publisher`] — WordPress REST client and the media-upload contract
//! - [`config`] — credential loading from the environment

pub mod assembler;
pub mod config;
pub mod constants;
pub mod error;
pub mod keywords;
pub mod options;
pub mod provider;
pub mod publisher;
pub mod sanitizer;
pub mod selection;
pub mod splitter;
pub mod utils;

pub use assembler::{AssemblyResult, ContentAssembler};
pub use config::Config;
pub use constants::SanitizeFlags;
pub use error::{PressroomError, Result};
pub use options::AssemblyOptions;
pub use provider::{
    provider_from_config, ImageCandidate, ImageProvider, ImageSize, ImageSource,
    PlaceholderImages, ShutterstockClient, UnsplashClient,
};
pub use publisher::{
    MediaUploader, NewPost, PostStatus, PublishedPost, UploadedMedia, WordPressClient,
};
pub use sanitizer::{Policy, Sanitizer};
pub use selection::UsedImageRegistry;
pub use splitter::{split, Section};
