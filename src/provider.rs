//! Image provider contract and client implementations.
//!
//! A provider answers keyword searches with candidates and resolves a chosen
//! candidate to a downloadable URL. Network failures are surfaced as errors;
//! the assembly pipeline treats every one of them as "no image available for
//! this boundary".

use crate::config::Config;
use crate::error::{PressroomError, Result};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::Duration;

const UNSPLASH_BASE_URL: &str = "https://api.unsplash.com";
const SHUTTERSTOCK_BASE_URL: &str = "https://api.shutterstock.com/v2";
const PLACEHOLDER_BASE_URL: &str = "https://picsum.photos";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// One search result, not yet resolved to a downloadable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Unique within one provider response.
    pub id: String,
    /// Used as alt text when the image is embedded.
    pub description: String,
    /// Resolvable to binary image bytes.
    pub preview_url: String,
}

/// Size hint passed when resolving a candidate's download URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Contract the assembly pipeline depends on.
///
/// Implementations must tolerate being asked for more results than they can
/// supply: return fewer, not an error.
pub trait ImageProvider {
    /// Verify the credentials work. Cheap to call repeatedly.
    fn authenticate(&self) -> bool;

    /// Search for candidates matching `query`, at most `per_page` of them.
    fn search(&self, query: &str, per_page: usize) -> Result<Vec<ImageCandidate>>;

    /// Resolve a candidate id to a download URL, if one is available.
    fn download_url(&self, id: &str, size: ImageSize) -> Result<Option<String>>;
}

// ---------------------------------------------------------------------------
// Unsplash

#[derive(Debug, Deserialize)]
struct UnsplashSearchResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    id: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    alt_description: Option<String>,
    urls: UnsplashUrls,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    #[serde(default)]
    full: Option<String>,
    #[serde(default)]
    regular: Option<String>,
    #[serde(default)]
    small: Option<String>,
}

/// Unsplash API client (`Client-ID` header auth).
pub struct UnsplashClient {
    access_key: String,
    base_url: String,
    http: Client,
}

impl UnsplashClient {
    pub fn new(access_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(access_key, UNSPLASH_BASE_URL)
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(access_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(SEARCH_TIMEOUT).build()?;
        Ok(Self {
            access_key: access_key.into(),
            base_url: base_url.into(),
            http,
        })
    }

    fn auth_header(&self) -> String {
        format!("Client-ID {}", self.access_key)
    }
}

impl ImageProvider for UnsplashClient {
    fn authenticate(&self) -> bool {
        if self.access_key.is_empty() {
            return false;
        }
        self.http
            .get(format!("{}/photos/random", self.base_url))
            .header(AUTHORIZATION, self.auth_header())
            .query(&[("count", "1")])
            .timeout(METADATA_TIMEOUT)
            .send()
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    fn search(&self, query: &str, per_page: usize) -> Result<Vec<ImageCandidate>> {
        let per_page = per_page.clamp(1, 10).to_string();
        let response = self
            .http
            .get(format!("{}/search/photos", self.base_url))
            .header(AUTHORIZATION, self.auth_header())
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
                ("order_by", "relevant"),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(PressroomError::Provider(format!(
                "unsplash search failed with status {}",
                response.status()
            )));
        }

        let parsed: UnsplashSearchResponse = response.json()?;
        Ok(parsed
            .results
            .into_iter()
            .map(|photo| ImageCandidate {
                description: photo
                    .alt_description
                    .or(photo.description)
                    .unwrap_or_else(|| query.to_string()),
                preview_url: photo.urls.regular.clone().unwrap_or_default(),
                id: photo.id,
            })
            .collect())
    }

    fn download_url(&self, id: &str, size: ImageSize) -> Result<Option<String>> {
        let response = self
            .http
            .get(format!("{}/photos/{id}", self.base_url))
            .header(AUTHORIZATION, self.auth_header())
            .timeout(METADATA_TIMEOUT)
            .send()?;

        if !response.status().is_success() {
            return Err(PressroomError::Provider(format!(
                "unsplash photo lookup failed with status {}",
                response.status()
            )));
        }

        let urls: UnsplashUrls = response
            .json::<UnsplashPhoto>()
            .map(|photo| photo.urls)?;
        let url = match size {
            ImageSize::Small => urls.small.or(urls.regular),
            ImageSize::Medium => urls.regular,
            ImageSize::Large => urls.full.or(urls.regular),
        };
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Shutterstock

#[derive(Debug, Deserialize)]
struct ShutterstockTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ShutterstockSearchResponse {
    #[serde(default)]
    data: Vec<ShutterstockImage>,
}

#[derive(Debug, Deserialize)]
struct ShutterstockImage {
    id: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    assets: Option<ShutterstockAssets>,
}

#[derive(Debug, Deserialize)]
struct ShutterstockAssets {
    #[serde(default)]
    preview: Option<ShutterstockPreview>,
}

#[derive(Debug, Deserialize)]
struct ShutterstockPreview {
    url: String,
}

/// Shutterstock API client. OAuth client-credentials token, fetched lazily
/// and cached for the lifetime of the client.
pub struct ShutterstockClient {
    consumer_key: String,
    secret_key: String,
    base_url: String,
    http: Client,
    token: Mutex<Option<String>>,
}

impl ShutterstockClient {
    pub fn new(consumer_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(consumer_key, secret_key, SHUTTERSTOCK_BASE_URL)
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(
        consumer_key: impl Into<String>,
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder().timeout(SEARCH_TIMEOUT).build()?;
        Ok(Self {
            consumer_key: consumer_key.into(),
            secret_key: secret_key.into(),
            base_url: base_url.into(),
            http,
            token: Mutex::new(None),
        })
    }

    fn access_token(&self) -> Result<String> {
        let mut cached = self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let response = self
            .http
            .post(format!("{}/oauth/access_token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.consumer_key.as_str()),
                ("client_secret", self.secret_key.as_str()),
            ])
            .timeout(METADATA_TIMEOUT)
            .send()?;

        if !response.status().is_success() {
            return Err(PressroomError::Auth(format!(
                "shutterstock token request failed with status {}",
                response.status()
            )));
        }

        let token: ShutterstockTokenResponse = response.json()?;
        *cached = Some(token.access_token.clone());
        Ok(token.access_token)
    }
}

impl ImageProvider for ShutterstockClient {
    fn authenticate(&self) -> bool {
        self.access_token().is_ok()
    }

    fn search(&self, query: &str, per_page: usize) -> Result<Vec<ImageCandidate>> {
        let token = self.access_token()?;
        let per_page = per_page.clamp(1, 20).to_string();
        let response = self
            .http
            .get(format!("{}/images/search", self.base_url))
            .bearer_auth(&token)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("sort", "popular"),
                ("orientation", "horizontal"),
                ("image_type", "photo"),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(PressroomError::Provider(format!(
                "shutterstock search failed with status {}",
                response.status()
            )));
        }

        let parsed: ShutterstockSearchResponse = response.json()?;
        Ok(parsed
            .data
            .into_iter()
            .map(|image| ImageCandidate {
                description: image
                    .description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| query.to_string()),
                preview_url: image
                    .assets
                    .as_ref()
                    .and_then(|assets| assets.preview.as_ref())
                    .map(|preview| preview.url.clone())
                    .unwrap_or_default(),
                id: image.id,
            })
            .collect())
    }

    fn download_url(&self, id: &str, _size: ImageSize) -> Result<Option<String>> {
        // Free-tier accounts only get the watermark-free preview asset; the
        // size hint has nothing to select between.
        let token = self.access_token()?;
        let response = self
            .http
            .get(format!("{}/images/{id}", self.base_url))
            .bearer_auth(&token)
            .timeout(METADATA_TIMEOUT)
            .send()?;

        if !response.status().is_success() {
            return Err(PressroomError::Provider(format!(
                "shutterstock image lookup failed with status {}",
                response.status()
            )));
        }

        let image: ShutterstockImage = response.json()?;
        Ok(image
            .assets
            .and_then(|assets| assets.preview)
            .map(|preview| preview.url))
    }
}

// ---------------------------------------------------------------------------
// Placeholder

/// Offline fallback provider serving deterministic placeholder URLs.
pub struct PlaceholderImages {
    base_url: String,
}

impl Default for PlaceholderImages {
    fn default() -> Self {
        Self {
            base_url: PLACEHOLDER_BASE_URL.to_string(),
        }
    }
}

impl PlaceholderImages {
    pub fn new() -> Self {
        Self::default()
    }

    fn query_seed(query: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        hasher.finish() % 1000
    }
}

impl ImageProvider for PlaceholderImages {
    fn authenticate(&self) -> bool {
        true
    }

    fn search(&self, query: &str, per_page: usize) -> Result<Vec<ImageCandidate>> {
        let seed = Self::query_seed(query);
        let count = per_page.clamp(1, 3);
        Ok((0..count)
            .map(|i| {
                let variant = seed + i as u64;
                ImageCandidate {
                    id: format!("placeholder_{i}_{variant}"),
                    description: format!("Placeholder image for {query}"),
                    preview_url: format!("{}/800/400?random={variant}", self.base_url),
                }
            })
            .collect())
    }

    fn download_url(&self, id: &str, _size: ImageSize) -> Result<Option<String>> {
        let variant = id.rsplit('_').next().unwrap_or_default();
        if variant.is_empty() {
            return Ok(Some(format!("{}/800/400", self.base_url)));
        }
        Ok(Some(format!("{}/800/400?random={variant}", self.base_url)))
    }
}

// ---------------------------------------------------------------------------
// Source selection

/// Which image backend to use for a publishing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSource {
    #[default]
    Unsplash,
    Shutterstock,
    Placeholder,
}

/// Build the requested provider, falling back to placeholder images when
/// credentials are missing or rejected. Mirrors the publish workflow's
/// expectation that image sourcing never blocks a post.
pub fn provider_from_config(source: ImageSource, config: &Config) -> Box<dyn ImageProvider> {
    match source {
        ImageSource::Unsplash => {
            if let Some(key) = config.unsplash_access_key.as_deref() {
                match UnsplashClient::new(key) {
                    Ok(client) if client.authenticate() => {
                        log::info!("using unsplash for images");
                        return Box::new(client);
                    }
                    Ok(_) => log::warn!("unsplash authentication failed, using placeholder images"),
                    Err(err) => log::warn!("unsplash client setup failed: {err}"),
                }
            } else {
                log::warn!("unsplash access key not configured, using placeholder images");
            }
        }
        ImageSource::Shutterstock => {
            match (
                config.shutterstock_consumer_key.as_deref(),
                config.shutterstock_secret_key.as_deref(),
            ) {
                (Some(consumer_key), Some(secret_key)) => {
                    match ShutterstockClient::new(consumer_key, secret_key) {
                        Ok(client) if client.authenticate() => {
                            log::info!("using shutterstock for images");
                            return Box::new(client);
                        }
                        Ok(_) => {
                            log::warn!("shutterstock authentication failed, using placeholder images")
                        }
                        Err(err) => log::warn!("shutterstock client setup failed: {err}"),
                    }
                }
                _ => log::warn!("shutterstock credentials not configured, using placeholder images"),
            }
        }
        ImageSource::Placeholder => {}
    }

    log::info!("using placeholder images");
    Box::new(PlaceholderImages::new())
}
