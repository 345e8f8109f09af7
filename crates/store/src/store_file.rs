//! JSON file-backed message store with atomic writes.

use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    tokio::{fs, io::AsyncWriteExt, sync::Mutex},
    tracing::{debug, info, warn},
};

use crate::{
    Error, Result,
    store::{MessageStore, get_or_create},
    types::{Entry, Snapshot, UserId},
};

/// What was found on disk.
enum Loaded {
    Ready(Snapshot),
    Missing,
    Corrupt,
    Unreadable(std::io::Error),
}

/// Single-document store: the whole mapping lives in one JSON file.
///
/// All access goes through one async mutex, so the read-modify-write in
/// `append` never interleaves with another writer in this process.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    async fn read_snapshot(&self) -> Loaded {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Loaded::Missing,
            Err(e) => return Loaded::Unreadable(e),
        };
        if data.trim().is_empty() {
            return Loaded::Missing;
        }
        match serde_json::from_str::<Snapshot>(&data) {
            Ok(snapshot) => Loaded::Ready(snapshot),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "message store is corrupt");
                Loaded::Corrupt
            },
        }
    }

    /// Move a corrupt file aside so the next write does not destroy it.
    /// Earlier quarantined copies are kept: the first goes to `.corrupt`,
    /// later ones to `.corrupt.1`, `.corrupt.2`, ...
    async fn quarantine(&self) -> Result<()> {
        let mut target = self.sibling("corrupt");
        let mut n = 0_u32;
        while fs::try_exists(&target).await? {
            n += 1;
            target = self.sibling(&format!("corrupt.{n}"));
        }
        fs::rename(&self.path, &target).await?;
        warn!(
            path = %self.path.display(),
            moved_to = %target.display(),
            "moved corrupt message store aside"
        );
        Ok(())
    }

    /// Atomic write: write and sync a temp file, keep a `.bak` of the
    /// previous contents, rename the temp file over the target.
    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.sibling("tmp");

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        if fs::try_exists(&self.path).await.unwrap_or(false) {
            let bak = self.sibling("bak");
            if let Err(e) = fs::copy(&self.path, &bak).await {
                warn!(path = %bak.display(), error = %e, "failed to refresh store backup");
            }
        }

        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for FileStore {
    async fn append(&self, user_id: &UserId, text: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut snapshot = match self.read_snapshot().await {
            Loaded::Ready(snapshot) => snapshot,
            Loaded::Missing => {
                info!(path = %self.path.display(), "creating message store");
                Snapshot::new()
            },
            Loaded::Corrupt => {
                self.quarantine().await?;
                Snapshot::new()
            },
            // Refuse to overwrite history we could not read.
            Loaded::Unreadable(e) => {
                return Err(Error::unreadable(self.path.display().to_string(), e));
            },
        };

        let log = get_or_create(&mut snapshot, user_id);
        log.push(Entry::new(text, timestamp));
        let entries = log.len();

        self.write_snapshot(&snapshot).await?;
        debug!(user_id = %user_id, entries, "appended entry");
        Ok(())
    }

    async fn load_all(&self) -> Result<Snapshot> {
        let _guard = self.lock.lock().await;
        match self.read_snapshot().await {
            Loaded::Ready(snapshot) => Ok(snapshot),
            Loaded::Missing | Loaded::Corrupt => Ok(Snapshot::new()),
            Loaded::Unreadable(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "message store unreadable, treating as empty"
                );
                Ok(Snapshot::new())
            },
        }
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write_snapshot(snapshot).await
    }
}
