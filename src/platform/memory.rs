//! In-process adapters. They keep everything in memory and record what
//! happened so flows can be inspected without a browser.

use crate::{
    app_lib::{api::Blob, KeyValueStorage, Notifier, SaveError, StorageError},
    features::{
        auth::{History, NavigationListener, NavigationOutcome},
        reports::{ObjectUrl, SaveSink},
    },
    routes::{paths, Route},
};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::debug;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Key-value storage that lives as long as the process (a browser tab's
/// `sessionStorage`, or a test fixture).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let items = items
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self {
            items: Mutex::new(items),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        lock(&self.items).clone()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

#[derive(Debug)]
struct HistoryState {
    entries: Vec<String>,
    index: usize,
    navigations: Vec<Route>,
    attachments: usize,
}

/// Session history with browser semantics: `push` drops forward entries,
/// `replace` rewrites the current one, `back`/`forward` move the cursor and
/// fire the attached listener the way `popstate` does.
pub struct MemoryHistory {
    state: Mutex<HistoryState>,
    listener: Mutex<Option<NavigationListener>>,
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHistory")
            .field("state", &*lock(&self.state))
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl MemoryHistory {
    #[must_use]
    pub fn new(start: &str) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                entries: vec![start.to_string()],
                index: 0,
                navigations: Vec::new(),
                attachments: 0,
            }),
            listener: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn at_login() -> Self {
        Self::new(paths::LOGIN)
    }

    /// Moves one entry back, as the Back button does. Returns `false` at the start.
    pub fn back(&self) -> bool {
        let moved = {
            let mut state = lock(&self.state);
            if state.index == 0 {
                false
            } else {
                state.index -= 1;
                true
            }
        };
        if moved {
            self.notify();
        }
        moved
    }

    /// Moves one entry forward. Returns `false` at the end.
    pub fn forward(&self) -> bool {
        let moved = {
            let mut state = lock(&self.state);
            if state.index + 1 >= state.entries.len() {
                false
            } else {
                state.index += 1;
                true
            }
        };
        if moved {
            self.notify();
        }
        moved
    }

    /// Delivers a Back/Forward event to the attached listener without moving
    /// the cursor. `None` when nothing is attached.
    pub fn notify(&self) -> Option<NavigationOutcome> {
        // released before the call, the listener writes back into this history
        let listener = lock(&self.listener).clone()?;
        let outcome = listener();
        debug!(?outcome, "history event delivered");
        Some(outcome)
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        lock(&self.listener).is_some()
    }

    /// How many times a listener was attached.
    #[must_use]
    pub fn attach_count(&self) -> usize {
        lock(&self.state).attachments
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        lock(&self.state).entries.clone()
    }

    /// Routes requested through `navigate`, oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<Route> {
        lock(&self.state).navigations.clone()
    }
}

impl History for MemoryHistory {
    fn current(&self) -> String {
        let state = lock(&self.state);
        state.entries[state.index].clone()
    }

    fn replace(&self, path: &str) {
        let mut state = lock(&self.state);
        let index = state.index;
        state.entries[index] = path.to_string();
    }

    fn push(&self, path: &str) {
        let mut state = lock(&self.state);
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(path.to_string());
        state.index = keep;
    }

    fn navigate(&self, route: Route) {
        debug!(route = %route, "navigate");
        lock(&self.state).navigations.push(route);
        self.push(route.path());
    }

    fn attach(&self, listener: NavigationListener) {
        lock(&self.state).attachments += 1;
        *lock(&self.listener) = Some(listener);
    }

    fn detach(&self) {
        lock(&self.listener).take();
    }
}

#[derive(Debug, Default)]
struct SinkState {
    next: u64,
    blobs: HashMap<String, Blob>,
    saved: Vec<(String, ObjectUrl)>,
    revoked: Vec<ObjectUrl>,
}

/// Save sink that keeps blobs in memory and records saves and revocations.
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<SinkState>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filenames of completed saves, oldest first.
    #[must_use]
    pub fn saved_names(&self) -> Vec<String> {
        lock(&self.state)
            .saved
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    #[must_use]
    pub fn revoked(&self) -> Vec<ObjectUrl> {
        lock(&self.state).revoked.clone()
    }

    /// Object URLs created but not yet revoked.
    #[must_use]
    pub fn live_urls(&self) -> usize {
        lock(&self.state).blobs.len()
    }
}

impl SaveSink for MemorySink {
    fn create_object_url(&self, blob: Blob) -> Result<ObjectUrl, SaveError> {
        let mut state = lock(&self.state);
        state.next += 1;
        let url = ObjectUrl::new(format!("blob:memory/{}", state.next));
        state.blobs.insert(url.as_str().to_string(), blob);
        Ok(url)
    }

    fn save(&self, url: &ObjectUrl, filename: &str) -> Result<(), SaveError> {
        let mut state = lock(&self.state);
        if !state.blobs.contains_key(url.as_str()) {
            return Err(SaveError::UnknownObjectUrl(url.as_str().to_string()));
        }
        state.saved.push((filename.to_string(), url.clone()));
        Ok(())
    }

    fn revoke(&self, url: &ObjectUrl) {
        let mut state = lock(&self.state);
        state.blobs.remove(url.as_str());
        state.revoked.push(url.clone());
    }
}

/// Notifier that records alerts instead of showing them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        lock(&self.alerts).push(message.to_string());
    }
}
