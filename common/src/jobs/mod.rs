use crate::model::generation::Batch;
use serde::{Deserialize, Serialize};

/// Status of a background generation job, polled by clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    /// Percentage of requested rows processed so far.
    InProgress(u32),
    Completed(Box<Batch>),
    Failed(String),
}
