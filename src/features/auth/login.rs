use crate::{
    app_lib::{ApiClient, AppError, BusyFlag, RequestGeneration, StorageError, ValidationError},
    features::auth::{
        client,
        guard::NavigationGuard,
        role::{self, Resolution},
        session::SessionStore,
        types::Credentials,
    },
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("login already in progress")]
    Busy,
    #[error("login failed")]
    Rejected { status: u16 },
    #[error("login failed: {0}")]
    Transport(AppError),
    #[error("login failed: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session written and the guard switched to authenticated.
    SignedIn(Resolution),
    /// The form was unmounted while the request was in flight; the response
    /// was dropped.
    Stale,
}

/// The login view's controller: one instance per mounted form.
pub struct LoginForm {
    client: ApiClient,
    session: SessionStore,
    guard: NavigationGuard,
    busy: BusyFlag,
    generation: RequestGeneration,
}

impl LoginForm {
    pub fn new(client: ApiClient, session: SessionStore, guard: NavigationGuard) -> Self {
        Self {
            client,
            session,
            guard,
            busy: BusyFlag::new(),
            generation: RequestGeneration::new(),
        }
    }

    /// Whether a submission is in flight; the submit control is disabled while true.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Drops interest in any in-flight response.
    pub fn unmount(&self) {
        self.generation.invalidate();
    }

    /// Validates, posts the credentials once, resolves the role and persists the
    /// session. No retry is attempted on failure.
    ///
    /// # Errors
    /// `Validation` before any request, `Busy` while another submission runs,
    /// `Rejected`/`Transport` when the server call fails, `Storage` when the
    /// session cannot be written.
    #[instrument(skip_all)]
    pub async fn submit(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        credentials.validate()?;

        let _busy = self.busy.try_acquire().ok_or(AuthError::Busy)?;
        let ticket = self.generation.begin();

        let body = client::login(&self.client, credentials)
            .await
            .map_err(|err| match err {
                AppError::Http { status, .. } => {
                    warn!(status, "login rejected");
                    AuthError::Rejected { status }
                }
                other => {
                    warn!("login request failed: {other}");
                    AuthError::Transport(other)
                }
            })?;

        if !self.generation.is_current(ticket) {
            debug!("discarding login response for an unmounted form");
            return Ok(LoginOutcome::Stale);
        }

        let resolution = role::resolve(&body);
        self.session.write(&resolution.session)?;
        self.guard.authenticated(resolution.route);

        Ok(LoginOutcome::SignedIn(resolution))
    }
}
