//! Process-wide navigation guard.
//!
//! Once a session exists the guard pins the current history entry to the
//! application root and re-asserts it on every Back/Forward event, so Back never
//! reaches the login view. Views install it by calling `mount()` and keep the
//! returned registration for as long as they are mounted; the platform listener
//! is attached on the first registration and detached when the last one drops,
//! so remounting a view never installs it twice.
//!
//! UX-only guard; real access control lives on the API.

use crate::{
    app_lib::StorageError,
    features::auth::session::SessionStore,
    routes::{paths, Route},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info, warn};

/// Back/Forward handler handed to the platform history.
pub type NavigationListener = Arc<dyn Fn() -> NavigationOutcome + Send + Sync>;

/// Platform session history (`window.history` plus the router).
pub trait History: Send + Sync {
    /// Path of the current entry.
    fn current(&self) -> String;
    /// Rewrites the current entry in place.
    fn replace(&self, path: &str);
    /// Adds an entry after the current one, dropping forward entries.
    fn push(&self, path: &str);
    /// Router transition to `route`.
    fn navigate(&self, route: Route);
    /// Starts delivering Back/Forward events to `listener`, replacing any
    /// listener attached before.
    fn attach(&self, listener: NavigationListener);
    /// Stops delivering Back/Forward events.
    fn detach(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    Authenticated,
}

/// What a Back/Forward event led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// No registration, or nothing to guard.
    Ignored,
    /// Authenticated: the root entry was pushed again.
    RootReasserted,
    /// The guard and the stored session disagreed; the role was cleared and
    /// the user sent to the login view.
    LoggedOut,
}

#[derive(Debug)]
struct GuardInner {
    state: GuardState,
    registrations: usize,
}

struct Shared {
    inner: Mutex<GuardInner>,
    history: Arc<dyn History>,
    session: SessionStore,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, GuardInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct NavigationGuard {
    shared: Arc<Shared>,
}

impl NavigationGuard {
    pub fn new(history: Arc<dyn History>, session: SessionStore) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(GuardInner {
                    state: GuardState::Unauthenticated,
                    registrations: 0,
                }),
                history,
                session,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GuardInner> {
        self.shared.lock()
    }

    /// Cold-load initialization: a persisted role means the user is already
    /// authenticated and the root entry is asserted right away.
    pub fn hydrate(&self) -> GuardState {
        let mut inner = self.lock();
        if self.shared.session.has_role() {
            inner.state = GuardState::Authenticated;
            self.shared.history.replace(paths::ROOT);
            debug!("guard hydrated from persisted session");
        } else {
            inner.state = GuardState::Unauthenticated;
        }
        inner.state
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.lock().state
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.lock().registrations > 0
    }

    /// Registers a mounted view. The platform listener stays attached while at
    /// least one registration is alive.
    #[must_use = "dropping the registration unmounts the view immediately"]
    pub fn mount(&self) -> GuardRegistration {
        let mut inner = self.lock();
        inner.registrations += 1;
        if inner.registrations == 1 {
            // weak so the history does not keep the guard alive
            let guard = Arc::downgrade(&self.shared);
            self.shared.history.attach(Arc::new(move || {
                Weak::upgrade(&guard).map_or(NavigationOutcome::Ignored, |shared| {
                    NavigationGuard { shared }.on_navigation()
                })
            }));
            debug!("navigation intercept attached");
        }
        GuardRegistration {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Called after the session was written: pins the root entry, then routes
    /// to the landing page when there is one.
    pub fn authenticated(&self, landing: Option<Route>) {
        {
            let mut inner = self.lock();
            inner.state = GuardState::Authenticated;
            self.shared.history.replace(paths::ROOT);
        }
        if let Some(route) = landing {
            self.shared.history.navigate(route);
        }
        info!(landing = ?landing.map(Route::path), "authenticated");
    }

    /// Handles a Back/Forward event.
    pub fn on_navigation(&self) -> NavigationOutcome {
        let mut inner = self.lock();
        if inner.registrations == 0 {
            return NavigationOutcome::Ignored;
        }

        match (inner.state, self.shared.session.has_role()) {
            (GuardState::Authenticated, true) => {
                self.shared.history.push(paths::ROOT);
                NavigationOutcome::RootReasserted
            }
            (GuardState::Unauthenticated, false) => NavigationOutcome::Ignored,
            (state, _) => {
                debug!(?state, "guard and stored session disagree");
                if let Err(err) = self.shared.session.clear_role() {
                    warn!("failed to clear role on back navigation: {err}");
                }
                inner.state = GuardState::Unauthenticated;
                drop(inner);
                self.shared.history.navigate(Route::Login);
                NavigationOutcome::LoggedOut
            }
        }
    }

    /// Explicit logout: clears the session and routes to the login view.
    ///
    /// # Errors
    /// Returns an error if the session cannot be cleared; the guard is left
    /// unauthenticated either way.
    pub fn logout(&self) -> Result<(), StorageError> {
        let result = self.shared.session.clear();
        self.lock().state = GuardState::Unauthenticated;
        self.shared.history.navigate(Route::Login);
        info!("logged out");
        result
    }
}

/// Keeps a view's guard registration alive; dropping it unmounts the view.
pub struct GuardRegistration {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for GuardRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardRegistration").finish_non_exhaustive()
    }
}

impl Drop for GuardRegistration {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        inner.registrations = inner.registrations.saturating_sub(1);
        if inner.registrations == 0 {
            self.shared.history.detach();
            debug!("navigation intercept detached");
        }
    }
}
