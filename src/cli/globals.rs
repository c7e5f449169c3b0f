use crate::{
    app_lib::{ApiClient, AppConfig, KeyValueStorage},
    features::auth::{keys, NavigationGuard, SessionStore},
    platform::{FileStorage, MemoryHistory, MemoryStorage},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{path::PathBuf, sync::Arc};

/// File holding the long-lived store inside the state directory.
pub const LOCAL_STORE_FILE: &str = "local.json";

#[derive(Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub state_dir: PathBuf,
    pub access_token: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, state_dir: PathBuf) -> Self {
        Self {
            api_url,
            state_dir,
            access_token: None,
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.access_token = Some(token);
    }

    #[must_use]
    pub fn local_store_path(&self) -> PathBuf {
        self.state_dir.join(LOCAL_STORE_FILE)
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_url", &self.api_url)
            .field("state_dir", &self.state_dir)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// One invocation of the binary behaves like one page load of the console:
/// the long-lived store is a JSON file in the state directory, the per-tab
/// store starts empty (seeded with the access token), and history starts on
/// the login view.
pub struct Console {
    pub client: ApiClient,
    pub session: SessionStore,
    pub tab: Arc<MemoryStorage>,
    pub history: Arc<MemoryHistory>,
    pub guard: NavigationGuard,
}

impl Console {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the per-tab
    /// store cannot be seeded.
    pub fn open(globals: &GlobalArgs) -> Result<Self> {
        let client = ApiClient::new(AppConfig::new(globals.api_url.clone()))
            .context("failed to build API client")?;

        let local = Arc::new(FileStorage::new(globals.local_store_path()));
        let tab = Arc::new(MemoryStorage::new());
        if let Some(token) = &globals.access_token {
            tab.set(keys::ACCESS_TOKEN, token.expose_secret())?;
        }

        let session = SessionStore::new(local, tab.clone());
        let history = Arc::new(MemoryHistory::at_login());
        let guard = NavigationGuard::new(history.clone(), session.clone());
        guard.hydrate();

        Ok(Self {
            client,
            session,
            tab,
            history,
            guard,
        })
    }
}
