//! Pawsome Push - web push subscription for the Pawsome rescue PWA.
//!
//! Registers the current browser for push delivery and tells the Pawsome
//! backend about the registration, so coordinators can reach volunteers
//! with incident alerts.
//!
//! # Architecture
//!
//! - **Runtime** - [`PushRuntime`] trait over permission and push registration
//! - **Subscribe** - the flow itself, [`PushSubscriber`] and
//!   [`subscribe_to_push_notifications`]
//! - **Registry** - HTTP client for `POST /api/notifications/subscribe`
//! - **Keys** - VAPID key decoding and validation
//! - **Browser** - wasm32 runtime over `navigator.serviceWorker` (wasm only)
//!
//! # Modules
//!
//! - [`config`] - Backend URL and VAPID key configuration
//! - [`keys`] - base64url key material
//! - [`registration`] - Registration records and the backend payload
//! - [`registry`] - Backend subscription registry client
//! - [`runtime`] - Runtime capability trait
//! - [`subscribe`] - Subscription flow

pub mod config;
pub mod constants;
pub mod keys;
pub mod registration;
pub mod registry;
pub mod runtime;
pub mod subscribe;

#[cfg(target_arch = "wasm32")]
pub mod browser;

// Re-export commonly used types
pub use config::PushConfig;
pub use keys::{url_base64_to_bytes, ApplicationServerKey, KeyError};
pub use registration::{PushRegistration, SubscribeOptions, SubscriptionPayload};
pub use registry::{RegistryClient, RegistryError};
pub use runtime::{Capabilities, PermissionState, PushRuntime, RuntimeError};
pub use subscribe::{subscribe_to_push_notifications, PushSubscriber, SubscribeOutcome};
