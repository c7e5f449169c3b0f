//! DOM-backed adapters for the browser build.
//!
//! Handles to `window`, storage and history are looked up on every call rather
//! than stored, so the adapters stay `Send + Sync` like the traits require. The
//! `popstate` closure is not `Send` either and lives in a thread-local slot;
//! wasm runs on a single thread.

use crate::{
    app_lib::{api::Blob, KeyValueStorage, Notifier, SaveError, StorageError},
    features::{
        auth::{History, NavigationListener},
        reports::{ObjectUrl, SaveSink},
    },
    routes::{paths, Route},
};
use std::cell::RefCell;
use tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{BlobPropertyBag, HtmlAnchorElement, PopStateEvent, Storage, Url, Window};

const POPSTATE: &str = "popstate";

type PopStateHandler = Closure<dyn FnMut(PopStateEvent)>;

thread_local! {
    static POPSTATE_HANDLER: RefCell<Option<PopStateHandler>> = const { RefCell::new(None) };
}

fn window() -> Option<Window> {
    web_sys::window()
}

fn js_message(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

#[derive(Clone, Copy, Debug)]
enum Area {
    Local,
    Session,
}

/// `localStorage` or `sessionStorage` of the current window.
#[derive(Clone, Copy, Debug)]
pub struct BrowserStorage {
    area: Area,
}

impl BrowserStorage {
    /// Long-lived storage shared by every tab.
    #[must_use]
    pub fn local() -> Self {
        Self { area: Area::Local }
    }

    /// Per-tab storage.
    #[must_use]
    pub fn session() -> Self {
        Self {
            area: Area::Session,
        }
    }

    fn storage(self) -> Result<Storage, StorageError> {
        let window = window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = match self.area {
            Area::Local => window.local_storage(),
            Area::Session => window.session_storage(),
        };
        storage
            .map_err(|err| StorageError::Unavailable(js_message(&err)))?
            .ok_or_else(|| StorageError::Unavailable(format!("{:?} storage disabled", self.area)))
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(js_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Unavailable(js_message(&err)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StorageError::Unavailable(js_message(&err)))
    }
}

type RouterFn = Box<dyn Fn(Route) + Send + Sync>;

/// `window.history` plus an optional router hook for in-app transitions.
/// Without a router, `navigate` falls back to a full page load.
#[derive(Default)]
pub struct BrowserHistory {
    router: Option<RouterFn>,
}

impl BrowserHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_router(router: impl Fn(Route) + Send + Sync + 'static) -> Self {
        Self {
            router: Some(Box::new(router)),
        }
    }
}

impl History for BrowserHistory {
    fn current(&self) -> String {
        window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_else(|| paths::ROOT.to_string())
    }

    fn replace(&self, path: &str) {
        let result = window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| window.history())
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(err) = result {
            warn!("history.replaceState failed: {}", js_message(&err));
        }
    }

    fn push(&self, path: &str) {
        let result = window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| window.history())
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(err) = result {
            warn!("history.pushState failed: {}", js_message(&err));
        }
    }

    fn navigate(&self, route: Route) {
        if let Some(router) = &self.router {
            router(route);
            return;
        }
        if let Some(window) = window() {
            if let Err(err) = window.location().set_href(route.path()) {
                warn!("navigation to {route} failed: {}", js_message(&err));
            }
        }
    }

    fn attach(&self, listener: NavigationListener) {
        self.detach();
        let Some(window) = window() else {
            warn!("no window, Back/Forward events will not be guarded");
            return;
        };

        let handler = PopStateHandler::new(move |_event: PopStateEvent| {
            let outcome = listener();
            debug!(?outcome, "popstate handled");
        });
        if let Err(err) =
            window.add_event_listener_with_callback(POPSTATE, handler.as_ref().unchecked_ref())
        {
            warn!("adding popstate listener failed: {}", js_message(&err));
            return;
        }
        POPSTATE_HANDLER.with(|slot| *slot.borrow_mut() = Some(handler));
    }

    fn detach(&self) {
        let Some(handler) = POPSTATE_HANDLER.with(|slot| slot.borrow_mut().take()) else {
            return;
        };
        if let Some(window) = window() {
            if let Err(err) = window
                .remove_event_listener_with_callback(POPSTATE, handler.as_ref().unchecked_ref())
            {
                warn!("removing popstate listener failed: {}", js_message(&err));
            }
        }
    }
}

/// Saves through a transient `<a download>` element over a blob object URL.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSink;

impl SaveSink for BrowserSink {
    fn create_object_url(&self, blob: Blob) -> Result<ObjectUrl, SaveError> {
        let bytes = js_sys::Uint8Array::from(blob.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        if let Some(content_type) = &blob.content_type {
            options.set_type(content_type);
        }
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|err| SaveError::Platform(js_message(&err)))?;
        Url::create_object_url_with_blob(&blob)
            .map(ObjectUrl::new)
            .map_err(|err| SaveError::Platform(js_message(&err)))
    }

    fn save(&self, url: &ObjectUrl, filename: &str) -> Result<(), SaveError> {
        let platform = |err: JsValue| SaveError::Platform(js_message(&err));
        let document = window()
            .and_then(|window| window.document())
            .ok_or_else(|| SaveError::Platform("no document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| SaveError::Platform("no document body".to_string()))?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(platform)?
            .dyn_into()
            .map_err(|_| SaveError::Platform("anchor element expected".to_string()))?;
        anchor.set_href(url.as_str());
        anchor.set_download(filename);

        body.append_child(&anchor).map_err(platform)?;
        anchor.click();
        body.remove_child(&anchor).map_err(platform)?;
        Ok(())
    }

    fn revoke(&self, url: &ObjectUrl) {
        if let Err(err) = Url::revoke_object_url(url.as_str()) {
            warn!("revokeObjectURL failed: {}", js_message(&err));
        }
    }
}

/// `window.alert`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn alert(&self, message: &str) {
        if let Some(window) = window() {
            if let Err(err) = window.alert_with_message(message) {
                warn!("alert failed: {}", js_message(&err));
            }
        }
    }
}
