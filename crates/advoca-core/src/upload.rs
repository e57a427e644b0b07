//! Concurrent file-transfer coordination.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::backend::FileBackend;
use crate::notify::NotificationHub;

/// A file handed to the coordinator.
///
/// Drag-and-drop and explicit selection both converge here.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub path: PathBuf,
    pub file_name: String,
}

impl UploadSource {
    /// Builds a source from a path, deriving the display name from the
    /// final path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, file_name }
    }
}

/// What the backend reports for a stored file.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub original_name: String,
}

/// Terminal state of one transfer. Tasks are never retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Pending,
    Success,
    Failure(String),
}

/// One file transfer with its own independent lifecycle.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub id: Uuid,
    pub file_name: String,
    /// Fraction in `[0, 1]`, monotonically non-decreasing.
    pub progress: f32,
    pub outcome: UploadOutcome,
}

type TaskMap = Arc<RwLock<HashMap<Uuid, UploadTask>>>;

/// Runs a batch of file transfers with real concurrency.
///
/// Every file gets its own task and its own tokio task; one transfer's
/// failure never disturbs the others. Successes post a short-lived notice
/// and bump the `files_changed` signal so the file catalog re-fetches the
/// authoritative list (no optimistic insertion); failures post a
/// longer-lived error notice.
pub struct UploadCoordinator<B> {
    backend: Arc<B>,
    tasks: TaskMap,
    notices: NotificationHub,
    files_changed: watch::Sender<u64>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl<B: FileBackend + 'static> UploadCoordinator<B> {
    pub fn new(backend: Arc<B>, notices: NotificationHub) -> Self {
        let (files_changed, _) = watch::channel(0);
        Self {
            backend,
            tasks: Arc::new(RwLock::new(HashMap::new())),
            notices,
            files_changed,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Submits a batch; each file starts transferring immediately.
    ///
    /// Returns the task ids in batch order.
    pub async fn submit(&self, batch: Vec<UploadSource>) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(batch.len());
        let mut in_flight = self.in_flight.lock().await;

        for source in batch {
            let id = Uuid::new_v4();
            let task = UploadTask {
                id,
                file_name: source.file_name.clone(),
                progress: 0.0,
                outcome: UploadOutcome::Pending,
            };
            self.tasks.write().await.insert(id, task);
            ids.push(id);

            in_flight.push(tokio::spawn(Self::run_transfer(
                self.backend.clone(),
                self.tasks.clone(),
                self.notices.clone(),
                self.files_changed.clone(),
                id,
                source,
            )));
        }

        ids
    }

    async fn run_transfer(
        backend: Arc<B>,
        tasks: TaskMap,
        notices: NotificationHub,
        files_changed: watch::Sender<u64>,
        id: Uuid,
        source: UploadSource,
    ) {
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let mut transfer = std::pin::pin!(backend.upload(&source, progress_tx));
        let mut progress_open = true;

        let outcome = loop {
            tokio::select! {
                update = progress_rx.recv(), if progress_open => {
                    match update {
                        Some(fraction) => Self::record_progress(&tasks, id, fraction).await,
                        None => progress_open = false,
                    }
                }
                result = &mut transfer => break result,
            }
        };

        // Drain progress that arrived in the same poll as completion.
        while let Ok(fraction) = progress_rx.try_recv() {
            Self::record_progress(&tasks, id, fraction).await;
        }

        match outcome {
            Ok(receipt) => {
                tracing::info!("[Upload] {} completed", receipt.original_name);
                {
                    let mut tasks = tasks.write().await;
                    if let Some(task) = tasks.get_mut(&id) {
                        task.progress = 1.0;
                        task.outcome = UploadOutcome::Success;
                    }
                }
                notices.post_success(format!("{} uploaded successfully", receipt.original_name));
                files_changed.send_modify(|revision| *revision += 1);
            }
            Err(e) => {
                tracing::warn!("[Upload] {} failed: {}", source.file_name, e);
                {
                    let mut tasks = tasks.write().await;
                    if let Some(task) = tasks.get_mut(&id) {
                        task.outcome = UploadOutcome::Failure(e.to_string());
                    }
                }
                notices.post_error(format!("Upload failed for {}: {}", source.file_name, e));
            }
        }
    }

    async fn record_progress(tasks: &TaskMap, id: Uuid, fraction: f32) {
        let mut tasks = tasks.write().await;
        if let Some(task) = tasks.get_mut(&id) {
            let fraction = fraction.clamp(0.0, 1.0);
            // Progress never moves backwards, whatever the transport reports.
            if fraction > task.progress {
                task.progress = fraction;
            }
        }
    }

    /// Snapshot of one task.
    pub async fn task(&self, id: Uuid) -> Option<UploadTask> {
        self.tasks.read().await.get(&id).cloned()
    }

    /// Snapshot of all tasks, in no particular order.
    pub async fn tasks(&self) -> Vec<UploadTask> {
        self.tasks.read().await.values().cloned().collect()
    }

    /// Signal bumped after every successful upload; the file catalog
    /// subscribes to it to re-fetch the authoritative list.
    pub fn subscribe_files_changed(&self) -> watch::Receiver<u64> {
        self.files_changed.subscribe()
    }

    /// The notification surface transfers report to.
    pub fn notices(&self) -> &NotificationHub {
        &self.notices
    }

    /// Awaits every transfer spawned so far.
    pub async fn wait_for_completion(&self) {
        let handles: Vec<_> = self.in_flight.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("[Upload] Transfer task panicked: {}", e);
            }
        }
    }
}
