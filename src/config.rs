//! Push configuration.
//!
//! The backend URL and VAPID public key are baked in at build time
//! (`PAWSOME_API_URL`, `PAWSOME_VAPID_PUBLIC_KEY`). Native processes may
//! override either with an environment variable of the same name.

use serde::Serialize;

use crate::constants::{API_URL_ENV, DEFAULT_API_URL, SUBSCRIBE_PATH, VAPID_PUBLIC_KEY_ENV};

/// Configuration consumed by the subscription flow.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PushConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Base64url VAPID public key. `None` when not configured.
    pub vapid_public_key: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self::new(option_env!("PAWSOME_API_URL"), option_env!("PAWSOME_VAPID_PUBLIC_KEY"))
    }
}

impl PushConfig {
    /// Build a configuration, normalizing blank values.
    ///
    /// A missing or blank URL falls back to [`DEFAULT_API_URL`]; a blank key
    /// counts as missing.
    pub fn new(api_url: Option<&str>, vapid_public_key: Option<&str>) -> Self {
        let api_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        let vapid_public_key = vapid_public_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        Self {
            api_url,
            vapid_public_key,
        }
    }

    /// Build-time configuration with environment variable overrides.
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        let api_url = std::env::var(API_URL_ENV).ok();
        let vapid_public_key = std::env::var(VAPID_PUBLIC_KEY_ENV).ok();
        if api_url.is_none() && vapid_public_key.is_none() {
            return;
        }

        let overridden = Self::new(
            api_url.as_deref().or(Some(self.api_url.as_str())),
            vapid_public_key
                .as_deref()
                .or(self.vapid_public_key.as_deref()),
        );
        *self = overridden;
    }

    /// Full URL of the subscription registry endpoint.
    pub fn subscribe_url(&self) -> String {
        format!("{}{}", self.api_url, SUBSCRIBE_PATH)
    }

    /// Set the VAPID public key.
    pub fn with_vapid_public_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.vapid_public_key = (!key.trim().is_empty()).then(|| key.trim().to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_falls_back_to_default() {
        let config = PushConfig::new(None, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.vapid_public_key, None);
    }

    #[test]
    fn test_blank_values_are_treated_as_missing() {
        let config = PushConfig::new(Some("  "), Some(""));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.vapid_public_key, None);
    }

    #[test]
    fn test_subscribe_url_trims_trailing_slash() {
        let config = PushConfig::new(Some("https://api.pawsome.org/"), Some("BEl6"));
        assert_eq!(
            config.subscribe_url(),
            "https://api.pawsome.org/api/notifications/subscribe"
        );
        assert_eq!(config.vapid_public_key.as_deref(), Some("BEl6"));
    }

    #[test]
    fn test_with_vapid_public_key() {
        let config = PushConfig::new(None, None).with_vapid_public_key("BEl6");
        assert_eq!(config.vapid_public_key.as_deref(), Some("BEl6"));

        let config = config.with_vapid_public_key(" ");
        assert_eq!(config.vapid_public_key, None);
    }
}
