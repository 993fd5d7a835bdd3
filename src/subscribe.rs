//! Push subscription flow.
//!
//! Ensures this browser holds a push registration and that the backend knows
//! about it:
//!
//! ```text
//! capability check ─► VAPID key check ─► permission prompt
//!     ─► service worker ready ─► existing registration?
//!            ├── yes: reuse as-is
//!            └── no:  subscribe (user-visible, VAPID key)
//!     ─► POST {endpoint, p256dh, auth} with bearer token
//! ```
//!
//! Every failure is contained: it is logged, sometimes alerted, and turned
//! into a [`SubscribeOutcome`]. Nothing is retried; the caller re-runs the
//! whole flow.

use crate::config::PushConfig;
use crate::keys::{ApplicationServerKey, KeyError};
use crate::registration::{PushRegistration, SubscribeOptions, SubscriptionPayload};
use crate::registry::{RegistryClient, RegistryError};
use crate::runtime::{Capabilities, PermissionState, PushRuntime, RuntimeError};

/// Alert shown when the runtime cannot do push at all.
pub const UNSUPPORTED_ALERT: &str = "Push notifications are not supported in this browser.";

/// Alert shown when no VAPID public key was configured.
pub const UNCONFIGURED_ALERT: &str =
    "Push notifications are not configured. Please contact an administrator.";

/// Alert shown when the user did not grant permission.
pub const PERMISSION_ALERT: &str =
    "Notification permission was not granted. Enable notifications in your browser settings to receive alerts.";

/// How a subscription attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    /// The backend accepted the registration.
    Subscribed(PushRegistration),
    /// The runtime lacks a service worker or push manager.
    Unsupported(Capabilities),
    /// No VAPID public key is configured.
    Unconfigured,
    /// The configured VAPID key could not be decoded.
    InvalidKey(KeyError),
    /// The user did not grant notification permission.
    PermissionDenied(PermissionState),
    /// A runtime step (ready, lookup, subscribe) failed.
    RuntimeFailure(RuntimeError),
    /// The backend answered with a non-2xx status.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Diagnostic message from the response body.
        message: String,
    },
    /// The request to the backend failed in transit.
    NetworkError(String),
}

impl SubscribeOutcome {
    /// Returns `true` only for `Subscribed`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Subscribed(_))
    }
}

impl From<RegistryError> for SubscribeOutcome {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Network(msg) => Self::NetworkError(msg),
            RegistryError::Rejected { status, message } => Self::Rejected { status, message },
        }
    }
}

/// Drives the subscription flow against a [`PushRuntime`].
#[derive(Debug)]
pub struct PushSubscriber<R> {
    runtime: R,
    registry: RegistryClient,
    vapid_public_key: Option<String>,
}

impl<R: PushRuntime> PushSubscriber<R> {
    /// Creates a subscriber for the backend and key named in `config`.
    pub fn new(runtime: R, config: &PushConfig) -> Self {
        Self::with_registry(
            runtime,
            RegistryClient::new(config),
            config.vapid_public_key.clone(),
        )
    }

    /// Creates a subscriber with a pre-built registry client.
    pub fn with_registry(
        runtime: R,
        registry: RegistryClient,
        vapid_public_key: Option<String>,
    ) -> Self {
        Self {
            runtime,
            registry,
            vapid_public_key,
        }
    }

    /// The runtime this subscriber drives.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Run the flow once for the bearer of `credential`.
    ///
    /// The credential is passed through untouched; an empty one is left for
    /// the backend to reject.
    pub async fn subscribe(&self, credential: &str) -> SubscribeOutcome {
        let capabilities = self.runtime.capabilities();
        if !capabilities.supports_push() {
            log::warn!(
                "[Push] Push not supported (service worker: {}, push manager: {})",
                capabilities.service_worker,
                capabilities.push_manager
            );
            self.runtime.alert(UNSUPPORTED_ALERT);
            return SubscribeOutcome::Unsupported(capabilities);
        }

        let Some(vapid_public_key) = self.vapid_public_key.as_deref() else {
            log::error!("[Push] VAPID public key is not configured");
            self.runtime.alert(UNCONFIGURED_ALERT);
            return SubscribeOutcome::Unconfigured;
        };

        match self.register(credential, vapid_public_key).await {
            Ok(registration) => SubscribeOutcome::Subscribed(registration),
            Err(outcome) => outcome,
        }
    }

    async fn register(
        &self,
        credential: &str,
        vapid_public_key: &str,
    ) -> Result<PushRegistration, SubscribeOutcome> {
        let permission = self.runtime.request_permission().await.map_err(|e| {
            log::error!("[Push] {e}");
            SubscribeOutcome::RuntimeFailure(e)
        })?;
        if !permission.is_granted() {
            log::warn!("[Push] Notification permission {permission}");
            self.runtime.alert(PERMISSION_ALERT);
            return Err(SubscribeOutcome::PermissionDenied(permission));
        }

        let worker = self.runtime.ready().await.map_err(runtime_failure)?;

        let registration = match self
            .runtime
            .get_registration(&worker)
            .await
            .map_err(runtime_failure)?
        {
            Some(existing) => {
                log::info!("[Push] Reusing existing registration");
                existing
            }
            None => {
                let key = ApplicationServerKey::from_base64url(vapid_public_key).map_err(|e| {
                    log::error!("[Push] {e}");
                    SubscribeOutcome::InvalidKey(e)
                })?;
                let options = SubscribeOptions::user_visible(key.into_bytes());
                let created = self
                    .runtime
                    .create_registration(&worker, &options)
                    .await
                    .map_err(runtime_failure)?;
                log::info!("[Push] Created new push registration");
                created
            }
        };

        let payload = SubscriptionPayload::from(&registration);
        self.registry
            .submit(credential, &payload)
            .await
            .map_err(|e| {
                log::error!("[Push] {e}");
                SubscribeOutcome::from(e)
            })?;

        Ok(registration)
    }
}

fn runtime_failure(err: RuntimeError) -> SubscribeOutcome {
    log::error!("[Push] {err}");
    SubscribeOutcome::RuntimeFailure(err)
}

/// Subscribe this device to push notifications.
///
/// Returns `true` only when a registration exists and the backend accepted
/// it. The cause of a `false` is only visible in the log; use
/// [`PushSubscriber::subscribe`] to get it as a value.
pub async fn subscribe_to_push_notifications<R: PushRuntime>(
    runtime: R,
    config: &PushConfig,
    credential: &str,
) -> bool {
    PushSubscriber::new(runtime, config)
        .subscribe(credential)
        .await
        .is_success()
}
