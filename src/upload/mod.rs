//! Upload tracking for the storage console
//!
//! This module holds the selection, the uploader seam and the controller
//! that turns uploader events into a renderable upload status.

pub mod controller;
pub mod dry_run;
pub mod status;
pub mod types;
pub mod uploader;

pub use controller::{CompleteCallback, StatusCallback, UploadStatusController};
pub use dry_run::DryRunUploader;
pub use status::{UploadOutcome, UploadProgress, UploadStatus, UploadView};
pub use types::{
    FileEntry, ProgressEvent, SelectedFile, ShardMetadata, UploadOptions, UploadResult, UploadType,
};
pub use uploader::{UploadEvent, Uploader};
