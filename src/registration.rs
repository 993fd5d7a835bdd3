//! Push registration records and the payload sent to the backend.
//!
//! A [`PushRegistration`] is what the browser's push manager hands back
//! (the `PushSubscription.toJSON()` shape). The backend only wants the
//! flattened [`SubscriptionPayload`].

use serde::{Deserialize, Serialize};

/// Key bundle of a push registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationKeys {
    /// Browser's P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Shared auth secret (base64url).
    pub auth: String,
}

/// A push registration owned by the runtime.
///
/// Created once per browser installation and reused across sessions until
/// it is revoked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PushRegistration {
    /// Push service endpoint URL.
    pub endpoint: String,
    /// Expiry in milliseconds since the epoch, when the push service sets one.
    #[serde(
        rename = "expirationTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_time: Option<f64>,
    /// Encryption keys for payload delivery.
    pub keys: RegistrationKeys,
}

impl PushRegistration {
    /// Build a registration from its endpoint and key bundle.
    pub fn new(
        endpoint: impl Into<String>,
        p256dh: impl Into<String>,
        auth: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            expiration_time: None,
            keys: RegistrationKeys {
                p256dh: p256dh.into(),
                auth: auth.into(),
            },
        }
    }
}

/// Body of `POST /api/notifications/subscribe`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPayload {
    /// Push service endpoint URL.
    pub endpoint: String,
    /// Browser's P-256 ECDH public key.
    pub p256dh: String,
    /// Shared auth secret.
    pub auth: String,
}

impl From<&PushRegistration> for SubscriptionPayload {
    fn from(registration: &PushRegistration) -> Self {
        Self {
            endpoint: registration.endpoint.clone(),
            p256dh: registration.keys.p256dh.clone(),
            auth: registration.keys.auth.clone(),
        }
    }
}

/// Options passed to the push manager when creating a registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Every push must surface a visible notification.
    pub user_visible_only: bool,
    /// Decoded VAPID public key identifying the sending server.
    pub application_server_key: Vec<u8>,
}

impl SubscribeOptions {
    /// Options for a user-visible registration bound to `key`.
    pub fn user_visible(application_server_key: Vec<u8>) -> Self {
        Self {
            user_visible_only: true,
            application_server_key,
        }
    }
}
