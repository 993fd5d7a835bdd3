//! WebAssembly bindings for the browser push runtime.
//!
//! Implements [`PushRuntime`] over the browser globals the PWA shell uses:
//!
//! - `navigator.serviceWorker.ready` for the active registration
//! - `registration.pushManager.getSubscription()` / `subscribe()`
//! - `Notification.requestPermission()`
//! - `alert()` for user-visible warnings
//!
//! Objects are reached through `js_sys::Reflect` so a missing capability is
//! an ordinary error instead of a thrown exception.

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::config::PushConfig;
use crate::keys;
use crate::registration::{PushRegistration, SubscribeOptions};
use crate::runtime::{Capabilities, PermissionState, PushRuntime, RuntimeError};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = alert)]
    fn window_alert(message: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = Notification, js_name = requestPermission)]
    fn request_notification_permission() -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(message: &str);

    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    fn console_warn(message: &str);

    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn console_log(message: &str);
}

/// Best-effort text for a thrown JS value.
fn js_error(value: JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => format!("{value:?}"),
    }
}

fn property(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

fn has_property(target: &JsValue, key: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(key)).unwrap_or(false)
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, JsValue> {
    let method: Function = property(target, name)?.dyn_into()?;
    method.apply(target, args)
}

async fn await_promise(value: JsValue) -> Result<JsValue, JsValue> {
    let promise: Promise = value.dyn_into()?;
    JsFuture::from(promise).await
}

fn navigator() -> JsValue {
    property(&js_sys::global(), "navigator").unwrap_or(JsValue::UNDEFINED)
}

/// Read a `PushSubscription` through its `toJSON()` form.
fn read_registration(subscription: &JsValue) -> Result<PushRegistration, RuntimeError> {
    let json = call_method(subscription, "toJSON", &Array::new())
        .map_err(|e| RuntimeError::Malformed(js_error(e)))?;
    serde_wasm_bindgen::from_value(json).map_err(|e| RuntimeError::Malformed(e.to_string()))
}

/// [`PushRuntime`] backed by the browser's service worker and push manager.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserRuntime;

#[async_trait(?Send)]
impl PushRuntime for BrowserRuntime {
    /// The `ServiceWorkerRegistration` resolved from `navigator.serviceWorker.ready`.
    type Worker = JsValue;

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            service_worker: has_property(&navigator(), "serviceWorker"),
            push_manager: has_property(&js_sys::global(), "PushManager"),
        }
    }

    async fn request_permission(&self) -> Result<PermissionState, RuntimeError> {
        let promise =
            request_notification_permission().map_err(|e| RuntimeError::Permission(js_error(e)))?;
        let result = JsFuture::from(promise)
            .await
            .map_err(|e| RuntimeError::Permission(js_error(e)))?;
        Ok(PermissionState::parse(
            result.as_string().as_deref().unwrap_or_default(),
        ))
    }

    async fn ready(&self) -> Result<JsValue, RuntimeError> {
        let container = property(&navigator(), "serviceWorker")
            .map_err(|e| RuntimeError::NotReady(js_error(e)))?;
        let ready =
            property(&container, "ready").map_err(|e| RuntimeError::NotReady(js_error(e)))?;
        await_promise(ready)
            .await
            .map_err(|e| RuntimeError::NotReady(js_error(e)))
    }

    async fn get_registration(
        &self,
        worker: &JsValue,
    ) -> Result<Option<PushRegistration>, RuntimeError> {
        let push_manager =
            property(worker, "pushManager").map_err(|e| RuntimeError::Lookup(js_error(e)))?;
        let pending = call_method(&push_manager, "getSubscription", &Array::new())
            .map_err(|e| RuntimeError::Lookup(js_error(e)))?;
        let subscription = await_promise(pending)
            .await
            .map_err(|e| RuntimeError::Lookup(js_error(e)))?;

        if subscription.is_null() || subscription.is_undefined() {
            return Ok(None);
        }
        read_registration(&subscription).map(Some)
    }

    async fn create_registration(
        &self,
        worker: &JsValue,
        options: &SubscribeOptions,
    ) -> Result<PushRegistration, RuntimeError> {
        let subscribe_error = |e: JsValue| RuntimeError::Subscribe(js_error(e));

        let js_options = Object::new();
        Reflect::set(
            &js_options,
            &JsValue::from_str("userVisibleOnly"),
            &JsValue::from_bool(options.user_visible_only),
        )
        .map_err(subscribe_error)?;
        Reflect::set(
            &js_options,
            &JsValue::from_str("applicationServerKey"),
            &Uint8Array::from(options.application_server_key.as_slice()),
        )
        .map_err(subscribe_error)?;

        let push_manager = property(worker, "pushManager").map_err(subscribe_error)?;
        let pending = call_method(&push_manager, "subscribe", &Array::of1(&js_options))
            .map_err(subscribe_error)?;
        let subscription = await_promise(pending).await.map_err(subscribe_error)?;
        read_registration(&subscription)
    }

    fn alert(&self, message: &str) {
        if let Err(e) = window_alert(message) {
            log::warn!("[Push] {message} (alert unavailable: {})", js_error(e));
        }
    }
}

/// `log` backend writing to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        match record.level() {
            log::Level::Error => console_error(&message),
            log::Level::Warn => console_warn(&message),
            _ => console_log(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

/// Subscribe this browser to push notifications.
///
/// Resolves to `true` once the backend has accepted the registration,
/// `false` otherwise. Details go to the console.
#[wasm_bindgen(js_name = subscribeToPushNotifications)]
pub async fn subscribe_browser(credential: String) -> bool {
    crate::subscribe::subscribe_to_push_notifications(
        BrowserRuntime,
        &PushConfig::default(),
        &credential,
    )
    .await
}

/// Decode a base64url VAPID key into the bytes `PushManager.subscribe()` expects.
#[wasm_bindgen(js_name = urlBase64ToUint8Array)]
pub fn url_base64_to_uint8_array(input: &str) -> Result<Vec<u8>, JsValue> {
    keys::url_base64_to_bytes(input).map_err(|e| JsValue::from_str(&e.to_string()))
}
