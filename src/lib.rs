pub mod config;
pub mod console;
pub mod error;
pub mod upload;

pub use config::{ConsoleConfig, LogLevel};

pub use console::{file_icon_label, gateway_url, human_file_size, render};

pub use error::{ConsoleError, Result};

pub use upload::{
    DryRunUploader, ProgressEvent, SelectedFile, ShardMetadata, UploadEvent, UploadOptions,
    UploadOutcome, UploadProgress, UploadResult, UploadStatus, UploadStatusController, UploadType,
    UploadView, Uploader,
};
