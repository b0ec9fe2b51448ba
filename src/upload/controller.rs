//! Upload status controller
//!
//! Holds the user's selection and the outcome of the current upload, and
//! folds the events coming back from an [`Uploader`] into that outcome.
//! Phases only move forward: idle, uploading, then succeeded or failed.
//! Going back to idle takes an explicit [`UploadStatusController::reset`].

use crate::error::{ConsoleError, Result};
use crate::upload::status::{UploadOutcome, UploadProgress, UploadStatus, UploadView};
use crate::upload::types::{SelectedFile, ShardMetadata, UploadOptions, UploadResult, UploadType};
use crate::upload::uploader::{UploadEvent, Uploader};
use chrono::Utc;
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;

/// Called with the new status after every transition
pub type StatusCallback = Arc<dyn Fn(UploadStatus) + Send + Sync>;

/// Called once when an upload succeeds
pub type CompleteCallback = Arc<dyn Fn(&UploadResult) + Send + Sync>;

pub struct UploadStatusController<U> {
    uploader: U,
    file: Option<SelectedFile>,
    options: UploadOptions,
    outcome: UploadOutcome,
    on_change: Option<StatusCallback>,
    on_upload_complete: Option<CompleteCallback>,
}

impl<U> std::fmt::Debug for UploadStatusController<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadStatusController")
            .field("file", &self.file.as_ref().map(|file| &file.name))
            .field("options", &self.options)
            .field("outcome", &self.outcome)
            .field("on_change", &self.on_change.is_some())
            .field("on_upload_complete", &self.on_upload_complete.is_some())
            .finish()
    }
}

impl<U: Uploader> UploadStatusController<U> {
    pub fn new(uploader: U) -> Self {
        Self {
            uploader,
            file: None,
            options: UploadOptions::default(),
            outcome: UploadOutcome::Idle,
            on_change: None,
            on_upload_complete: None,
        }
    }

    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(UploadStatus) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn on_upload_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&UploadResult) + Send + Sync + 'static,
    {
        self.on_upload_complete = Some(Arc::new(callback));
        self
    }

    pub fn status(&self) -> UploadStatus {
        self.outcome.status()
    }

    pub fn outcome(&self) -> &UploadOutcome {
        &self.outcome
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn options(&self) -> UploadOptions {
        self.options
    }

    pub fn view(&self) -> UploadView<'_> {
        UploadView::new(self.file.as_ref(), &self.outcome)
    }

    /// Select the item to upload together with its options.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No file is given
    /// - The options are contradictory
    /// - A directory is given without `allow_directory`
    /// - An upload is already in progress or finished
    pub fn select_file(
        &mut self,
        file: Option<SelectedFile>,
        options: UploadOptions,
    ) -> Result<()> {
        self.require_idle("select a file")?;

        let file = file.ok_or_else(|| ConsoleError::validation("file", "No file selected"))?;
        options.validate()?;

        if file.is_directory && !options.allow_directory {
            return Err(ConsoleError::validation(
                "file",
                format!("{} is a directory but directory uploads are off", file.name),
            ));
        }

        log::debug!(
            "Selected {} ({} bytes, {})",
            file.name,
            file.size(),
            options.upload_type()
        );
        self.file = Some(file);
        self.options = options;
        Ok(())
    }

    pub fn set_upload_type(&mut self, upload_type: UploadType) -> Result<()> {
        self.require_idle("change the upload type")?;
        upload_type.apply(&mut self.options);
        Ok(())
    }

    pub fn set_wrap_in_directory(&mut self, wrap: bool) -> Result<()> {
        self.require_idle("change wrap-in-directory")?;
        self.options.wrap_in_directory = wrap;
        Ok(())
    }

    /// Move to uploading and hand the selection to the uploader.
    ///
    /// The returned stream must be fed back through [`Self::apply_event`].
    /// Without a selection the uploader is never called.
    pub fn start(&mut self) -> Result<BoxStream<'static, UploadEvent>> {
        self.require_idle("submit")?;

        let file = self
            .file
            .clone()
            .ok_or_else(|| ConsoleError::validation("file", "No file selected"))?;

        log::info!(
            "Uploading {} ({} bytes) as {}",
            file.name,
            file.size(),
            self.options.upload_type()
        );
        let stream = self.uploader.submit(file, self.options);
        self.transition(UploadOutcome::Uploading {
            progress: UploadProgress::new(),
            shards: Vec::new(),
            started_at: Utc::now(),
        });
        Ok(stream)
    }

    /// Submit the selection and drive the upload until it ends.
    ///
    /// Upload failures are not returned as errors; they leave the controller
    /// in [`UploadStatus::Failed`]. Errors are only returned when the upload
    /// could not start.
    pub async fn submit(&mut self) -> Result<UploadStatus> {
        let mut events = self.start()?;

        while let Some(event) = events.next().await {
            let terminal = event.is_terminal();
            self.apply_event(event);
            if terminal {
                break;
            }
        }

        self.end_of_stream();
        Ok(self.status())
    }

    /// Mark the uploader stream as exhausted.
    ///
    /// An upload still in flight at this point never reported how it ended
    /// and is marked as failed.
    pub fn end_of_stream(&mut self) {
        if self.status() == UploadStatus::Uploading {
            self.fail(ConsoleError::upload_error(
                "upload stream ended before the upload completed",
            ));
        }
    }

    /// Fold one uploader event into the current outcome.
    ///
    /// Events that arrive while not uploading are dropped.
    pub fn apply_event(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::Progress(progress_event) => match &mut self.outcome {
                UploadOutcome::Uploading { progress, .. } => {
                    log::trace!(
                        "Shard {}: {}/{} bytes",
                        progress_event.shard_id,
                        progress_event.bytes_loaded,
                        progress_event.bytes_total
                    );
                    progress.insert(progress_event.shard_id.clone(), progress_event);
                }
                _ => self.ignore("progress"),
            },
            UploadEvent::ShardStored(shard) => match &mut self.outcome {
                UploadOutcome::Uploading { shards, .. } => {
                    if shards.iter().any(|stored| stored.cid == shard.cid) {
                        log::warn!("Shard {} reported as stored twice", shard.cid);
                    } else {
                        log::debug!("Shard {} ({} bytes) stored", shard.cid, shard.size);
                        shards.push(shard);
                    }
                }
                _ => self.ignore("shard stored"),
            },
            UploadEvent::Succeeded { root, shards } => self.succeed(root, shards),
            UploadEvent::Failed(message) => {
                if self.status() == UploadStatus::Uploading {
                    self.fail(ConsoleError::upload_error(message));
                } else {
                    self.ignore("failure");
                }
            }
        }
    }

    /// Clear the selection and go back to idle.
    ///
    /// # Errors
    ///
    /// Returns an error while an upload is in flight; uploads cannot be
    /// cancelled.
    pub fn reset(&mut self) -> Result<()> {
        if self.status() == UploadStatus::Uploading {
            return Err(ConsoleError::invalid_state("reset", UploadStatus::Uploading));
        }

        self.file = None;
        if self.status() != UploadStatus::Idle {
            self.transition(UploadOutcome::Idle);
        }
        Ok(())
    }

    fn succeed(&mut self, root_cid: String, reported: Vec<ShardMetadata>) {
        let (mut shards, started_at) = match std::mem::take(&mut self.outcome) {
            UploadOutcome::Uploading {
                shards, started_at, ..
            } => (shards, started_at),
            other => {
                self.outcome = other;
                self.ignore("success");
                return;
            }
        };

        for shard in reported {
            if !shards.iter().any(|stored| stored.cid == shard.cid) {
                shards.push(shard);
            }
        }

        let finished_at = Utc::now();
        let result = UploadResult {
            root_cid: root_cid.clone(),
            file_name: self
                .file
                .as_ref()
                .map(|file| file.name.clone())
                .unwrap_or_default(),
            size: self.file.as_ref().map(SelectedFile::size).unwrap_or(0),
            shards: shards.clone(),
            started_at,
            finished_at,
        };

        log::info!(
            "Uploaded {} as {} in {} shard(s), {} ms",
            result.file_name,
            root_cid,
            shards.len(),
            result.duration_ms()
        );

        self.transition(UploadOutcome::Succeeded {
            root_cid,
            shards,
            started_at,
            finished_at,
        });

        if let Some(callback) = &self.on_upload_complete {
            callback(&result);
        }
    }

    fn fail(&mut self, error: ConsoleError) {
        let shards = match std::mem::take(&mut self.outcome) {
            UploadOutcome::Uploading { shards, .. } => shards,
            other => {
                self.outcome = other;
                return;
            }
        };
        log::warn!(
            "Upload failed after {} stored shard(s): {}",
            shards.len(),
            error
        );
        self.transition(UploadOutcome::Failed { error, shards });
    }

    fn transition(&mut self, outcome: UploadOutcome) {
        let from = self.outcome.status();
        self.outcome = outcome;
        let to = self.outcome.status();
        log::debug!("Upload status {} -> {}", from, to);

        if let Some(callback) = &self.on_change {
            callback(to);
        }
    }

    fn require_idle(&self, operation: &str) -> Result<()> {
        match self.status() {
            UploadStatus::Idle => Ok(()),
            status => Err(ConsoleError::invalid_state(operation, status)),
        }
    }

    fn ignore(&self, kind: &str) {
        log::warn!("Ignoring {} event while {}", kind, self.status());
    }
}
