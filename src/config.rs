//! Credential loading from the process environment.

use crate::error::{PressroomError, Result};
use crate::publisher::WordPressClient;
use serde::{Deserialize, Serialize};
use std::env;

/// Credentials for the publishing platform and image providers.
///
/// Every field is optional; the provider factory and publisher constructor
/// decide what to do when something is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub wordpress_url: Option<String>,
    pub wordpress_username: Option<String>,
    pub wordpress_password: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub shutterstock_consumer_key: Option<String>,
    pub shutterstock_secret_key: Option<String>,
}

impl Config {
    /// Read credentials from the environment. Unset and blank variables
    /// become `None`.
    pub fn from_env() -> Self {
        Self {
            wordpress_url: read_var("WORDPRESS_URL"),
            wordpress_username: read_var("WORDPRESS_USERNAME"),
            wordpress_password: read_var("WORDPRESS_PASSWORD"),
            unsplash_access_key: read_var("UNSPLASH_ACCESS_KEY"),
            shutterstock_consumer_key: read_var("SHUTTERSTOCK_CONSUMER_KEY"),
            shutterstock_secret_key: read_var("SHUTTERSTOCK_SECRET_KEY"),
        }
    }

    pub fn has_wordpress(&self) -> bool {
        self.wordpress_url.is_some()
            && self.wordpress_username.is_some()
            && self.wordpress_password.is_some()
    }

    /// Build a WordPress client from the configured credentials.
    pub fn wordpress_client(&self) -> Result<WordPressClient> {
        match (
            self.wordpress_url.as_deref(),
            self.wordpress_username.as_deref(),
            self.wordpress_password.as_deref(),
        ) {
            (Some(url), Some(username), Some(password)) => {
                WordPressClient::new(url, username, password)
            }
            _ => Err(PressroomError::Config(
                "wordpress url, username, and password must all be set".to_string(),
            )),
        }
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_become_none() {
        env::set_var("PRESSROOM_TEST_BLANK", "   ");
        assert_eq!(read_var("PRESSROOM_TEST_BLANK"), None);
        assert_eq!(read_var("PRESSROOM_TEST_UNSET"), None);

        env::set_var("PRESSROOM_TEST_SET", " value ");
        assert_eq!(read_var("PRESSROOM_TEST_SET"), Some("value".to_string()));
    }

    #[test]
    fn test_wordpress_client_requires_all_credentials() {
        let config = Config {
            wordpress_url: Some("https://blog.example".to_string()),
            wordpress_username: Some("user".to_string()),
            ..Config::default()
        };
        assert!(!config.has_wordpress());
        assert!(matches!(
            config.wordpress_client(),
            Err(PressroomError::Config(_))
        ));

        let complete = Config {
            wordpress_password: Some("pass".to_string()),
            ..config
        };
        assert!(complete.has_wordpress());
        assert!(complete.wordpress_client().is_ok());
    }
}
