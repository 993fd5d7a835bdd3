//! Application-wide constants for the push subscription flow.
//!
//! Endpoint paths and configuration defaults live here so the flow, the
//! CLI and the browser binding agree on them.

// ============================================================================
// Backend
// ============================================================================

/// Backend base URL used when none is configured.
///
/// Matches the local development server of the Pawsome backend.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Path of the backend subscription registry, relative to the base URL.
pub const SUBSCRIBE_PATH: &str = "/api/notifications/subscribe";

// ============================================================================
// Configuration keys
// ============================================================================

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "PAWSOME_API_URL";

/// Environment variable holding the base64url VAPID public key.
pub const VAPID_PUBLIC_KEY_ENV: &str = "PAWSOME_VAPID_PUBLIC_KEY";

// ============================================================================
// Key material
// ============================================================================

/// Length of an uncompressed SEC1 P-256 point (`0x04 || x || y`).
pub const UNCOMPRESSED_P256_LEN: usize = 65;
