//! Shared state of background generation jobs.
//!
//! Handlers register a job as `Pending` and hand its id back to the client
//! straight away. Workers never touch the map directly: they push
//! [`JobUpdate`]s into an mpsc channel and [`start_job_updater`] applies them,
//! so the status endpoint only ever needs a read lock.

use common::jobs::JobStatus;
use log::debug;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Clonable handle shared with every handler as `web::Data`.
#[derive(Clone)]
pub struct JobsState {
    /// Job id to its latest status.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    /// Feeds [`start_job_updater`].
    pub tx: mpsc::Sender<JobUpdate>,
}

#[derive(Debug)]
pub struct JobUpdate {
    pub job_id: String,
    pub status: JobStatus,
}

impl JobsState {
    /// A fresh state plus the receiver to pass to [`start_job_updater`].
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        let state = Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    /// Records `job_id` as `Pending`.
    pub async fn register(&self, job_id: &str) {
        self.jobs
            .write()
            .await
            .insert(job_id.to_string(), JobStatus::Pending);
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }
}

/// Applies updates until every sender is gone.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        debug!("Job {} -> {:?}", update.job_id, update.status);
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id, update.status);
    }
}
