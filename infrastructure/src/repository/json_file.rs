//! JSON snapshot file store
//!
//! Wraps [`InMemoryVotingRequestRepository`] and keeps it in step with a
//! snapshot file shared by separate CLI invocations.
//!
//! Every operation holds an advisory lock on a sidecar `<file>.lock`
//! (shared for reads, exclusive for writes) and reloads the snapshot under
//! it. A write then runs against the fresh state and renames a new snapshot
//! into place before the lock is released, so no process works on a stale
//! copy.

use super::in_memory::InMemoryVotingRequestRepository;
use async_trait::async_trait;
use ballot_application::ports::repository::{
    Admission, Mutation, RemovalGuard, RepositoryError, VotingRequestRepository,
};
use ballot_domain::{ParticipantId, RequestId, ResolutionId, Vote, VoteChoice, VotingRequest};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, trace, warn};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    requests: Vec<VotingRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockMode {
    Shared,
    Exclusive,
}

/// Advisory lock on the sidecar file, released on drop
struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release store lock: {}", e);
        }
    }
}

/// Held for the whole reload, operate, persist sequence
struct StoreGuard<'a> {
    _local: MutexGuard<'a, ()>,
    _file: FileLock,
}

/// File-backed repository
pub struct JsonFileRepository {
    inner: InMemoryVotingRequestRepository,
    path: PathBuf,
    lock_path: PathBuf,
    /// Orders operations of this process before they queue on the file lock
    local: Mutex<()>,
}

impl JsonFileRepository {
    /// Open the store at `path`, loading the snapshot if the file exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let repository = Self {
            inner: InMemoryVotingRequestRepository::new(),
            lock_path: path.with_file_name(lock_name),
            path,
            local: Mutex::new(()),
        };

        {
            let _guard = repository.lock(LockMode::Shared).await?;
            debug!(
                "Opened store {} with {} voting requests",
                repository.path.display(),
                repository.inner.len()
            );
        }
        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, e: impl std::fmt::Display) -> RepositoryError {
        RepositoryError::Storage(format!("{}: {}", self.path.display(), e))
    }

    /// Take the process-local and file locks, then reload the snapshot
    async fn lock(&self, mode: LockMode) -> Result<StoreGuard<'_>, RepositoryError> {
        let local = self.local.lock().await;

        let lock_path = self.lock_path.clone();
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<File> {
            if let Some(parent) = lock_path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)?;
            match mode {
                LockMode::Shared => FileExt::lock_shared(&file)?,
                LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
            }
            Ok(file)
        })
        .await
        .map_err(|e| self.storage_error(e))?
        .map_err(|e| self.storage_error(e))?;
        trace!("Locked {} ({:?})", self.lock_path.display(), mode);

        let guard = StoreGuard {
            _local: local,
            _file: FileLock { file },
        };
        self.reload().await?;
        Ok(guard)
    }

    async fn reload(&self) -> Result<(), RepositoryError> {
        let requests = match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let snapshot: Snapshot =
                    serde_json::from_slice(&bytes).map_err(|e| self.storage_error(e))?;
                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(self.storage_error(format!(
                        "unsupported snapshot version {}",
                        snapshot.version
                    )));
                }
                snapshot.requests
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(self.storage_error(e)),
        };
        self.inner.reset(requests);
        Ok(())
    }

    /// Write the snapshot. Caller holds the exclusive lock.
    async fn persist(&self) -> Result<(), RepositoryError> {
        let mut requests = self.inner.list().await?;
        requests.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            requests,
        };
        let content = serde_json::to_vec_pretty(&snapshot).map_err(|e| self.storage_error(e))?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content)
            .await
            .map_err(|e| self.storage_error(e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.storage_error(e))?;

        debug!(
            "Wrote {} voting requests to {}",
            snapshot.requests.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl VotingRequestRepository for JsonFileRepository {
    fn next_id(&self) -> RequestId {
        self.inner.next_id()
    }

    async fn insert(&self, request: VotingRequest) -> Result<(), RepositoryError> {
        let _guard = self.lock(LockMode::Exclusive).await?;
        self.inner.insert(request).await?;
        self.persist().await
    }

    async fn get(&self, id: &RequestId) -> Result<Option<VotingRequest>, RepositoryError> {
        let _guard = self.lock(LockMode::Shared).await?;
        self.inner.get(id).await
    }

    async fn list(&self) -> Result<Vec<VotingRequest>, RepositoryError> {
        let _guard = self.lock(LockMode::Shared).await?;
        self.inner.list().await
    }

    async fn update(
        &self,
        id: &RequestId,
        mutation: Mutation<'_>,
    ) -> Result<VotingRequest, RepositoryError> {
        let _guard = self.lock(LockMode::Exclusive).await?;
        let updated = self.inner.update(id, mutation).await?;
        self.persist().await?;
        Ok(updated)
    }

    async fn remove(
        &self,
        id: &RequestId,
        guard: RemovalGuard<'_>,
    ) -> Result<VotingRequest, RepositoryError> {
        let _guard = self.lock(LockMode::Exclusive).await?;
        let removed = self.inner.remove(id, guard).await?;
        self.persist().await?;
        Ok(removed)
    }

    async fn append_vote(
        &self,
        request_id: &RequestId,
        resolution_id: &ResolutionId,
        participant_id: &ParticipantId,
        choice: VoteChoice,
        admit: Admission<'_>,
    ) -> Result<Vote, RepositoryError> {
        let _guard = self.lock(LockMode::Exclusive).await?;
        let vote = self
            .inner
            .append_vote(request_id, resolution_id, participant_id, choice, admit)
            .await?;
        self.persist().await?;
        Ok(vote)
    }
}
