//! WordPress REST API client and the media-upload contract.
//!
//! The assembly pipeline only needs `MediaUploader`; the rest of the client
//! (connection check, post creation) exists so a publishing run can go from
//! raw content to a live post without another dependency.

use crate::error::{PressroomError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(30);

/// A hosted copy of an uploaded image.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// URL to embed instead of the provider's own.
    pub url: String,
    /// Library id on the hosting platform, when it reports one.
    pub media_id: Option<u64>,
}

/// Optional collaborator that re-hosts an external image before embedding.
///
/// Failures are soft: the assembler falls back to the source URL.
pub trait MediaUploader {
    fn upload(&self, source_url: &str, alt_text: &str) -> Result<UploadedMedia>;
}

/// Publication state for a created post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Publish,
    Draft,
    Private,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Private => "private",
        }
    }
}

/// A post ready for submission.
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub slug: Option<String>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: PostStatus::default(),
            slug: None,
        }
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// A post as the platform reports it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub id: u64,
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct WpUser {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WpPost {
    id: u64,
    #[serde(default)]
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WpMedia {
    id: u64,
    source_url: String,
}

/// Client for the WordPress REST API (`/wp-json/wp/v2`), HTTP Basic auth.
pub struct WordPressClient {
    api_url: String,
    auth_header: String,
    http: Client,
}

impl WordPressClient {
    pub fn new(site_url: &str, username: &str, password: &str) -> Result<Self> {
        let parsed = Url::parse(site_url)
            .map_err(|err| PressroomError::Config(format!("invalid site url: {err}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PressroomError::Config(
                "site url must use http or https".to_string(),
            ));
        }

        let credentials = format!("{username}:{password}");
        let http = Client::builder().timeout(TRANSFER_TIMEOUT).build()?;
        Ok(Self {
            api_url: format!("{}/wp-json/wp/v2", site_url.trim_end_matches('/')),
            auth_header: format!("Basic {}", STANDARD.encode(credentials)),
            http,
        })
    }

    /// Verify the credentials by fetching the current user.
    pub fn test_connection(&self) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/users/me", self.api_url))
            .header(AUTHORIZATION, &self.auth_header)
            .timeout(REQUEST_TIMEOUT)
            .send()?;

        match response.status() {
            StatusCode::OK => {
                let user: WpUser = response.json()?;
                Ok(format!(
                    "connected as {}",
                    user.name.unwrap_or_else(|| "unknown user".to_string())
                ))
            }
            StatusCode::UNAUTHORIZED => Err(PressroomError::Auth(
                "invalid username or password".to_string(),
            )),
            StatusCode::NOT_FOUND => Err(PressroomError::Config(
                "wordpress api not found at this url".to_string(),
            )),
            status => Err(PressroomError::Publish(format!(
                "connection check failed with status {status}"
            ))),
        }
    }

    /// Create a post. Returns the platform's id and canonical link.
    pub fn create_post(&self, post: &NewPost) -> Result<PublishedPost> {
        let mut payload = serde_json::json!({
            "title": post.title,
            "content": post.content,
            "status": post.status.as_str(),
        });
        if let Some(slug) = post.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            payload["slug"] = serde_json::Value::String(slug.to_string());
        }

        let response = self
            .http
            .post(format!("{}/posts", self.api_url))
            .header(AUTHORIZATION, &self.auth_header)
            .json(&payload)
            .send()?;

        match response.status() {
            StatusCode::CREATED => {
                let created: WpPost = response.json()?;
                Ok(PublishedPost {
                    id: created.id,
                    link: created.link.unwrap_or_default(),
                })
            }
            StatusCode::UNAUTHORIZED => Err(PressroomError::Auth(
                "not allowed to create posts".to_string(),
            )),
            StatusCode::BAD_REQUEST => {
                let message = response
                    .json::<serde_json::Value>()
                    .ok()
                    .and_then(|body| body.get("message").and_then(|m| m.as_str().map(String::from)))
                    .unwrap_or_else(|| "invalid post data".to_string());
                Err(PressroomError::Publish(message))
            }
            status => Err(PressroomError::Publish(format!(
                "post creation failed with status {status}"
            ))),
        }
    }

    /// List recent posts.
    pub fn get_posts(&self, per_page: usize) -> Result<Vec<PublishedPost>> {
        let per_page = per_page.max(1).to_string();
        let response = self
            .http
            .get(format!("{}/posts", self.api_url))
            .header(AUTHORIZATION, &self.auth_header)
            .query(&[("per_page", per_page.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()?;

        if !response.status().is_success() {
            return Err(PressroomError::Publish(format!(
                "listing posts failed with status {}",
                response.status()
            )));
        }

        let posts: Vec<WpPost> = response.json()?;
        Ok(posts
            .into_iter()
            .map(|post| PublishedPost {
                id: post.id,
                link: post.link.unwrap_or_default(),
            })
            .collect())
    }

    /// Download an external image and re-host it in the media library.
    pub fn upload_media(&self, source_url: &str, alt_text: &str) -> Result<UploadedMedia> {
        let image = self
            .http
            .get(source_url)
            .timeout(TRANSFER_TIMEOUT)
            .send()?;
        if !image.status().is_success() {
            return Err(PressroomError::Upload(format!(
                "image download failed with status {}",
                image.status()
            )));
        }

        let content_type = image
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let filename = filename_for(source_url, &content_type);
        let bytes = image.bytes()?;

        let response = self
            .http
            .post(format!("{}/media", self.api_url))
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, &content_type)
            .header(
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            )
            .body(bytes.to_vec())
            .send()?;

        if response.status() != StatusCode::CREATED {
            return Err(PressroomError::Upload(format!(
                "media upload failed with status {}",
                response.status()
            )));
        }
        let media: WpMedia = response.json()?;

        // Alt text is cosmetic; the upload stands even if this step fails.
        if !alt_text.trim().is_empty() {
            let alt_update = self
                .http
                .post(format!("{}/media/{}", self.api_url, media.id))
                .header(AUTHORIZATION, &self.auth_header)
                .json(&serde_json::json!({ "alt_text": alt_text }))
                .timeout(REQUEST_TIMEOUT)
                .send();
            if let Err(err) = alt_update {
                log::debug!("alt text update for media {} failed: {err}", media.id);
            }
        }

        Ok(UploadedMedia {
            url: media.source_url,
            media_id: Some(media.id),
        })
    }
}

impl MediaUploader for WordPressClient {
    fn upload(&self, source_url: &str, alt_text: &str) -> Result<UploadedMedia> {
        self.upload_media(source_url, alt_text)
    }
}

/// Derive an upload filename from the source URL, patching in an extension
/// when the path has none (common with placeholder services).
fn filename_for(source_url: &str, content_type: &str) -> String {
    let name = Url::parse(source_url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(String::from))
        })
        .unwrap_or_else(|| "image".to_string());

    if name.contains('.') {
        return name;
    }
    let extension = match content_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    };
    format!("{name}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_USER_PASS: &str = "Basic dXNlcjpwYXNz";

    fn client(server: &mockito::Server) -> WordPressClient {
        WordPressClient::new(&server.url(), "user", "pass").unwrap()
    }

    #[test]
    fn test_rejects_invalid_site_url() {
        assert!(WordPressClient::new("not a url", "u", "p").is_err());
        assert!(WordPressClient::new("ftp://example.com", "u", "p").is_err());
    }

    #[test]
    fn test_test_connection_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/wp-json/wp/v2/users/me")
            .match_header("authorization", BASIC_USER_PASS)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1,"name":"Ada"}"#)
            .create();

        let message = client(&server).test_connection().unwrap();
        mock.assert();
        assert!(message.contains("Ada"));
    }

    #[test]
    fn test_test_connection_bad_credentials() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/wp-json/wp/v2/users/me")
            .with_status(401)
            .create();

        let err = client(&server).test_connection().unwrap_err();
        assert!(matches!(err, PressroomError::Auth(_)));
    }

    #[test]
    fn test_create_post_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/wp-json/wp/v2/posts")
            .match_header("authorization", BASIC_USER_PASS)
            .match_header("content-type", "application/json")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":99,"link":"https://blog.example/hello-world"}"#)
            .create();

        let post = NewPost::new("Hello", "<p>World</p>")
            .status(PostStatus::Draft)
            .slug("  hello-world  ");
        let published = client(&server).create_post(&post).unwrap();

        mock.assert();
        assert_eq!(published.id, 99);
        assert_eq!(published.link, "https://blog.example/hello-world");
    }

    #[test]
    fn test_create_post_surfaces_server_message() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/wp-json/wp/v2/posts")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":"rest_invalid","message":"content is empty"}"#)
            .create();

        let err = client(&server)
            .create_post(&NewPost::new("t", ""))
            .unwrap_err();
        assert!(err.to_string().contains("content is empty"));
    }

    #[test]
    fn test_upload_media_roundtrip() {
        let mut server = mockito::Server::new();
        let image_mock = server
            .mock("GET", "/images/photo.jpg")
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_body([0xFF, 0xD8, 0xFF, 0xE0])
            .create();
        let media_mock = server
            .mock("POST", "/wp-json/wp/v2/media")
            .match_header("authorization", BASIC_USER_PASS)
            .match_header("content-disposition", "attachment; filename=\"photo.jpg\"")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":7,"source_url":"https://blog.example/wp-content/photo.jpg"}"#)
            .create();
        let alt_mock = server
            .mock("POST", "/wp-json/wp/v2/media/7")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":7}"#)
            .create();

        let source = format!("{}/images/photo.jpg", server.url());
        let media = client(&server).upload_media(&source, "a photo").unwrap();

        image_mock.assert();
        media_mock.assert();
        alt_mock.assert();
        assert_eq!(media.url, "https://blog.example/wp-content/photo.jpg");
        assert_eq!(media.media_id, Some(7));
    }

    #[test]
    fn test_upload_media_download_failure() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/missing.png").with_status(404).create();

        let source = format!("{}/missing.png", server.url());
        let err = client(&server).upload_media(&source, "alt").unwrap_err();
        assert!(matches!(err, PressroomError::Upload(_)));
    }

    #[test]
    fn test_filename_extension_patching() {
        assert_eq!(
            filename_for("https://picsum.photos/800/400", "image/jpeg"),
            "400.jpg"
        );
        assert_eq!(
            filename_for("https://img.example/cat.png", "image/png"),
            "cat.png"
        );
        assert_eq!(filename_for("not a url", "image/png"), "image.png");
    }
}
