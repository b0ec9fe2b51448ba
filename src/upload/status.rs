//! Upload phases and the state carried by each of them

use crate::error::ConsoleError;
use crate::upload::types::{ProgressEvent, SelectedFile, ShardMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shard id to the latest progress reported for it
pub type UploadProgress = BTreeMap<String, ProgressEvent>;

/// The phase of the current upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadStatus::Idle => write!(f, "idle"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Succeeded => write!(f, "succeeded"),
            UploadStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of the current upload. Only the data valid in a phase exists in it.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Idle,
    Uploading {
        progress: UploadProgress,
        shards: Vec<ShardMetadata>,
        started_at: DateTime<Utc>,
    },
    Succeeded {
        root_cid: String,
        shards: Vec<ShardMetadata>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
    Failed {
        error: ConsoleError,
        /// Shards stored before the failure
        shards: Vec<ShardMetadata>,
    },
}

impl Default for UploadOutcome {
    fn default() -> Self {
        UploadOutcome::Idle
    }
}

impl UploadOutcome {
    pub fn status(&self) -> UploadStatus {
        match self {
            UploadOutcome::Idle => UploadStatus::Idle,
            UploadOutcome::Uploading { .. } => UploadStatus::Uploading,
            UploadOutcome::Succeeded { .. } => UploadStatus::Succeeded,
            UploadOutcome::Failed { .. } => UploadStatus::Failed,
        }
    }

    pub fn shards(&self) -> &[ShardMetadata] {
        match self {
            UploadOutcome::Idle => &[],
            UploadOutcome::Uploading { shards, .. }
            | UploadOutcome::Succeeded { shards, .. }
            | UploadOutcome::Failed { shards, .. } => shards,
        }
    }
}

/// Read-only projection of the controller for presentation code
#[derive(Debug, Clone)]
pub struct UploadView<'a> {
    pub status: UploadStatus,
    pub file: Option<&'a SelectedFile>,
    pub error: Option<&'a ConsoleError>,
    pub data_cid: Option<&'a str>,
    pub stored_dag_shards: &'a [ShardMetadata],
    pub upload_progress: Option<&'a UploadProgress>,
}

impl<'a> UploadView<'a> {
    pub(crate) fn new(file: Option<&'a SelectedFile>, outcome: &'a UploadOutcome) -> Self {
        let (error, data_cid, upload_progress) = match outcome {
            UploadOutcome::Idle => (None, None, None),
            UploadOutcome::Uploading { progress, .. } => (None, None, Some(progress)),
            UploadOutcome::Succeeded { root_cid, .. } => (None, Some(root_cid.as_str()), None),
            UploadOutcome::Failed { error, .. } => (Some(error), None, None),
        };
        Self {
            status: outcome.status(),
            file,
            error,
            data_cid,
            stored_dag_shards: outcome.shards(),
            upload_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status() {
        assert_eq!(UploadOutcome::default().status(), UploadStatus::Idle);

        let failed = UploadOutcome::Failed {
            error: ConsoleError::upload_error("network timeout"),
            shards: vec![ShardMetadata::new("bagA", 10)],
        };
        assert_eq!(failed.status(), UploadStatus::Failed);
        assert!(failed.status().is_terminal());
        assert_eq!(failed.shards().len(), 1);
    }

    #[test]
    fn test_view_exposes_only_phase_data() {
        let now = Utc::now();
        let outcome = UploadOutcome::Succeeded {
            root_cid: "bafyroot".into(),
            shards: vec![ShardMetadata::new("bagA", 10)],
            started_at: now,
            finished_at: now,
        };
        let view = UploadView::new(None, &outcome);
        assert_eq!(view.status, UploadStatus::Succeeded);
        assert_eq!(view.data_cid, Some("bafyroot"));
        assert!(view.error.is_none());
        assert!(view.upload_progress.is_none());
        assert_eq!(view.stored_dag_shards.len(), 1);
    }
}
