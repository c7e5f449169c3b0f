//! Save sink that writes downloads into a directory. Object URLs are opaque
//! `blob:` handles over bytes held in memory until revoked, mirroring how the
//! browser keeps a blob alive while the save completes.

use crate::{
    app_lib::{api::Blob, SaveError},
    features::reports::{ObjectUrl, SaveSink},
};
use std::{
    collections::HashMap,
    fs,
    path::{Component, Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, info};
use ulid::Ulid;

#[derive(Debug)]
pub struct DiskSink {
    dir: PathBuf,
    blobs: Mutex<HashMap<String, Blob>>,
}

impl DiskSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a save named `filename` lands. The name must be a single plain
    /// component so a crafted resource path cannot leave `dir`.
    ///
    /// # Errors
    /// Returns `SaveError::InvalidFileName` for names carrying a separator, a
    /// drive or root prefix, or a `.`/`..` component.
    pub fn target(&self, filename: &str) -> Result<PathBuf, SaveError> {
        let invalid = || SaveError::InvalidFileName(filename.to_string());
        if filename.contains(['/', '\\', ':']) {
            return Err(invalid());
        }
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(filename)),
            _ => Err(invalid()),
        }
    }

    fn blobs(&self) -> MutexGuard<'_, HashMap<String, Blob>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SaveSink for DiskSink {
    fn create_object_url(&self, blob: Blob) -> Result<ObjectUrl, SaveError> {
        let url = ObjectUrl::new(format!("blob:campusdesk/{}", Ulid::new()));
        debug!(url = %url, size = blob.bytes.len(), "object URL created");
        self.blobs().insert(url.as_str().to_string(), blob);
        Ok(url)
    }

    fn save(&self, url: &ObjectUrl, filename: &str) -> Result<(), SaveError> {
        let bytes = self
            .blobs()
            .get(url.as_str())
            .map(|blob| blob.bytes.clone())
            .ok_or_else(|| SaveError::UnknownObjectUrl(url.as_str().to_string()))?;

        let target = self.target(filename)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&target, bytes)?;

        info!(path = %target.display(), "file saved");
        Ok(())
    }

    fn revoke(&self, url: &ObjectUrl) {
        if self.blobs().remove(url.as_str()).is_some() {
            debug!(url = %url, "object URL revoked");
        }
    }
}
