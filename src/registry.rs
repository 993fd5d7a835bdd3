//! Client for the backend subscription registry.
//!
//! This module provides [`RegistryClient`], which posts push registrations
//! to `POST /api/notifications/subscribe` with the user's bearer token.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::PushConfig;
use crate::registration::SubscriptionPayload;

/// Errors from submitting a subscription.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The request never produced a response.
    #[error("Subscription request failed: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("Backend rejected subscription (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// `message` from the error body, or the raw body.
        message: String,
    },
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// HTTP client for the subscription registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    subscribe_url: String,
}

impl RegistryClient {
    /// Creates a client for the backend named in `config`.
    ///
    /// No request timeout is set; the browser's fetch has none either.
    pub fn new(config: &PushConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a client with a pre-configured HTTP client.
    pub fn with_client(client: Client, config: &PushConfig) -> Self {
        Self {
            client,
            subscribe_url: config.subscribe_url(),
        }
    }

    /// Returns the registry endpoint URL.
    pub fn subscribe_url(&self) -> &str {
        &self.subscribe_url
    }

    /// Submit a subscription on behalf of the bearer of `credential`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Network` if the request fails in transit and
    /// `RegistryError::Rejected` for any non-2xx response.
    pub async fn submit(
        &self,
        credential: &str,
        payload: &SubscriptionPayload,
    ) -> Result<(), RegistryError> {
        log::debug!("[Push] Submitting subscription to {}", self.subscribe_url);

        let response = self
            .client
            .post(&self.subscribe_url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(credential)
            .json(payload)
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            log::info!("[Push] Subscription registered with backend ({status})");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);

        Err(RegistryError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
