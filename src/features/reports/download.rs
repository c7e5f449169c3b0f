use crate::app_lib::{
    api::Blob, ApiClient, AppError, BusyFlag, Notifier, RequestGeneration, SaveError,
};
use secrecy::SecretString;
use std::{fmt, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Alert shown for every failed download.
pub const DOWNLOAD_FAILED: &str = "Failed to download file. Please try again.";

/// How long an object URL outlives the save it was created for.
pub const REVOKE_DELAY: Duration = Duration::from_millis(100);
#[cfg(target_arch = "wasm32")]
const REVOKE_DELAY_MS: u32 = 100;

/// Opaque handle to downloaded bytes held by a `SaveSink`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Where downloaded files go: the browser's object URL + anchor save, or a
/// directory for the operator binary.
pub trait SaveSink: Send + Sync {
    /// Keeps `blob` alive behind a new object URL.
    ///
    /// # Errors
    /// Returns an error if the platform refuses to create the URL.
    fn create_object_url(&self, blob: Blob) -> Result<ObjectUrl, SaveError>;

    /// Saves the bytes behind `url` under `filename`.
    ///
    /// # Errors
    /// Returns an error if the URL is unknown or the save fails.
    fn save(&self, url: &ObjectUrl, filename: &str) -> Result<(), SaveError>;

    /// Releases the bytes behind `url`. Unknown URLs are ignored.
    fn revoke(&self, url: &ObjectUrl);
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no file name in {0:?}")]
    MissingFileName(String),
    #[error("download already in progress")]
    Busy,
    #[error("download failed: {0}")]
    Request(#[from] AppError),
    #[error("download failed: {0}")]
    Save(#[from] SaveError),
}

/// Final `/`-separated segment of `resource_path`. Empty, `.` and `..` are
/// not file names.
#[must_use]
pub fn file_name(resource_path: &str) -> Option<&str> {
    resource_path
        .trim()
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Pending revocation of a saved file's object URL.
#[derive(Debug)]
pub struct Cleanup {
    #[cfg(not(target_arch = "wasm32"))]
    task: tokio::task::JoinHandle<()>,
}

impl Cleanup {
    #[cfg(not(target_arch = "wasm32"))]
    fn schedule(sink: Arc<dyn SaveSink>, url: ObjectUrl) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(REVOKE_DELAY).await;
            sink.revoke(&url);
        });
        Self { task }
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule(sink: Arc<dyn SaveSink>, url: ObjectUrl) -> Self {
        gloo_timers::callback::Timeout::new(REVOKE_DELAY_MS, move || sink.revoke(&url)).forget();
        Self {}
    }

    /// Resolves once the object URL has been revoked.
    pub async fn finished(self) {
        #[cfg(not(target_arch = "wasm32"))]
        if let Err(err) = self.task.await {
            warn!("object URL cleanup did not run: {err}");
        }

        // timers with equal delays fire in registration order
        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::sleep(REVOKE_DELAY).await;
    }
}

#[derive(Debug)]
pub struct Saved {
    pub filename: String,
    pub url: ObjectUrl,
    pub cleanup: Cleanup,
}

#[derive(Debug)]
pub enum DownloadOutcome {
    Saved(Saved),
    /// The view moved on before the response arrived; nothing was saved.
    Stale,
}

/// Downloads protected report files for one mounted view.
pub struct ReportFetcher {
    client: ApiClient,
    sink: Arc<dyn SaveSink>,
    notifier: Arc<dyn Notifier>,
    busy: BusyFlag,
    generation: RequestGeneration,
}

impl ReportFetcher {
    pub fn new(client: ApiClient, sink: Arc<dyn SaveSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            sink,
            notifier,
            busy: BusyFlag::new(),
            generation: RequestGeneration::new(),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn unmount(&self) {
        self.generation.invalidate();
    }

    /// Fetches `resource_path` from the media root and saves it under its
    /// final path segment. Failures raise the download alert once; there is no
    /// retry.
    ///
    /// # Errors
    /// `Busy` while another download runs; otherwise any fetch or save failure.
    #[instrument(skip(self, bearer))]
    pub async fn download(
        &self,
        resource_path: &str,
        bearer: Option<&SecretString>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let _busy = self.busy.try_acquire().ok_or(DownloadError::Busy)?;

        let result = self.fetch_and_save(resource_path, bearer).await;
        if let Err(err) = &result {
            warn!("download failed: {err}");
            self.notifier.alert(DOWNLOAD_FAILED);
        }
        result
    }

    async fn fetch_and_save(
        &self,
        resource_path: &str,
        bearer: Option<&SecretString>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let filename = file_name(resource_path)
            .ok_or_else(|| DownloadError::MissingFileName(resource_path.to_string()))?
            .to_string();
        let url = self.client.report_url(resource_path);

        let ticket = self.generation.begin();
        let response = self.client.get_bytes(&url, bearer).await;
        if !self.generation.is_current(ticket) {
            debug!("discarding download response for an unmounted view");
            return Ok(DownloadOutcome::Stale);
        }

        let object_url = self.sink.create_object_url(response?)?;
        if let Err(err) = self.sink.save(&object_url, &filename) {
            self.sink.revoke(&object_url);
            return Err(err.into());
        }

        info!(file = %filename, "report saved");
        let cleanup = Cleanup::schedule(Arc::clone(&self.sink), object_url.clone());

        Ok(DownloadOutcome::Saved(Saved {
            filename,
            url: object_url,
            cleanup,
        }))
    }
}
