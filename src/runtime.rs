//! Runtime abstraction for permission and push registration.
//!
//! The browser owns notification permission and push registrations; this
//! crate only drives them. [`PushRuntime`] is the seam the subscription flow
//! talks to, implemented by `BrowserRuntime` on wasm32 and by fakes in tests.
//!
//! # Architecture
//!
//! ```text
//! PushRuntime (trait)
//!     │
//!     ├── capabilities()          navigator.serviceWorker / PushManager
//!     ├── request_permission()    Notification.requestPermission()
//!     ├── ready()                 navigator.serviceWorker.ready
//!     ├── get_registration()      pushManager.getSubscription()
//!     ├── create_registration()   pushManager.subscribe()
//!     └── alert()                 window.alert()
//! ```
//!
//! The trait is `?Send`: browser futures live on a single-threaded executor.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::registration::{PushRegistration, SubscribeOptions};

/// Result of a notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// The user allowed notifications.
    Granted,
    /// The user blocked notifications.
    Denied,
    /// The user dismissed the prompt without choosing.
    Default,
}

impl PermissionState {
    /// Parse the string form returned by `Notification.requestPermission()`.
    ///
    /// Unknown values are treated as `Default`, which never proceeds.
    pub fn parse(value: &str) -> Self {
        match value {
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Default,
        }
    }

    /// Returns `true` only for `Granted`.
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Which background-delivery capabilities the runtime exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// `navigator.serviceWorker` is available.
    pub service_worker: bool,
    /// `PushManager` is available.
    pub push_manager: bool,
}

impl Capabilities {
    /// Both capabilities present.
    pub fn supports_push(self) -> bool {
        self.service_worker && self.push_manager
    }
}

/// Errors raised by a runtime operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The permission prompt failed.
    #[error("Permission request failed: {0}")]
    Permission(String),
    /// The service worker never became usable.
    #[error("Service worker not ready: {0}")]
    NotReady(String),
    /// Looking up the existing registration failed.
    #[error("Registration lookup failed: {0}")]
    Lookup(String),
    /// The push manager refused to create a registration.
    #[error("Registration failed: {0}")]
    Subscribe(String),
    /// The registration could not be read back.
    #[error("Malformed registration: {0}")]
    Malformed(String),
}

/// Permission and push registration authority.
///
/// `Worker` is the handle produced once the background registration is
/// ready; lookups and creation go through it.
#[async_trait(?Send)]
pub trait PushRuntime {
    /// Handle to an active service worker registration.
    type Worker;

    /// Report which capabilities exist. Never prompts.
    fn capabilities(&self) -> Capabilities;

    /// Ask the user for notification permission.
    ///
    /// May wait indefinitely on the user.
    async fn request_permission(&self) -> Result<PermissionState, RuntimeError>;

    /// Wait for the background registration to become active.
    async fn ready(&self) -> Result<Self::Worker, RuntimeError>;

    /// Look up the current push registration, if any. Never creates one.
    async fn get_registration(
        &self,
        worker: &Self::Worker,
    ) -> Result<Option<PushRegistration>, RuntimeError>;

    /// Create a new push registration.
    async fn create_registration(
        &self,
        worker: &Self::Worker,
        options: &SubscribeOptions,
    ) -> Result<PushRegistration, RuntimeError>;

    /// Show a blocking, user-visible warning.
    ///
    /// Runtimes without a UI log the message instead.
    fn alert(&self, message: &str) {
        log::warn!("[Push] {message}");
    }
}

#[async_trait(?Send)]
impl<T: PushRuntime + ?Sized> PushRuntime for &T {
    type Worker = T::Worker;

    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    async fn request_permission(&self) -> Result<PermissionState, RuntimeError> {
        (**self).request_permission().await
    }

    async fn ready(&self) -> Result<Self::Worker, RuntimeError> {
        (**self).ready().await
    }

    async fn get_registration(
        &self,
        worker: &Self::Worker,
    ) -> Result<Option<PushRegistration>, RuntimeError> {
        (**self).get_registration(worker).await
    }

    async fn create_registration(
        &self,
        worker: &Self::Worker,
        options: &SubscribeOptions,
    ) -> Result<PushRegistration, RuntimeError> {
        (**self).create_registration(worker, options).await
    }

    fn alert(&self, message: &str) {
        (**self).alert(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_state_parse() {
        assert_eq!(PermissionState::parse("granted"), PermissionState::Granted);
        assert_eq!(PermissionState::parse("denied"), PermissionState::Denied);
        assert_eq!(PermissionState::parse("default"), PermissionState::Default);
        assert_eq!(PermissionState::parse("prompt"), PermissionState::Default);
        assert!(PermissionState::Granted.is_granted());
        assert!(!PermissionState::Default.is_granted());
    }

    #[test]
    fn test_permission_state_display_roundtrip() {
        for state in [
            PermissionState::Granted,
            PermissionState::Denied,
            PermissionState::Default,
        ] {
            assert_eq!(PermissionState::parse(&state.to_string()), state);
        }
    }

    #[test]
    fn test_capabilities_require_both() {
        let both = Capabilities {
            service_worker: true,
            push_manager: true,
        };
        assert!(both.supports_push());
        assert!(!Capabilities {
            push_manager: false,
            ..both
        }
        .supports_push());
        assert!(!Capabilities::default().supports_push());
    }
}
