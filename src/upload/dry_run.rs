//! In-process uploader that stores nothing
//!
//! Splits the selection into fixed-size shards and reports the same event
//! sequence a real uploader would. Identifiers are sha-256 digests rendered
//! as hex with a content-id style prefix; they are stable for the same input
//! but are not real CIDs. A shard id covers the shard's byte offset as well
//! as its bytes, so repeated content still yields distinct shards.

use crate::error::{ConsoleError, Result};
use crate::upload::types::{ProgressEvent, SelectedFile, ShardMetadata, UploadOptions};
use crate::upload::uploader::{UploadEvent, Uploader};
use futures::stream::{self, BoxStream, StreamExt};
use sha2::{Digest, Sha256};

const SHARD_PREFIX: &str = "bag";
const ROOT_PREFIX: &str = "bafy";

#[derive(Debug, Clone)]
pub struct DryRunUploader {
    shard_size: usize,
    fail_after: Option<(usize, String)>,
}

impl DryRunUploader {
    pub fn new(shard_size: usize) -> Result<Self> {
        if shard_size == 0 {
            return Err(ConsoleError::validation(
                "shard_size",
                "Shard size must be greater than 0",
            ));
        }
        Ok(Self {
            shard_size,
            fail_after: None,
        })
    }

    /// Fail with `message` once `shards` shards have been stored
    pub fn fail_after(mut self, shards: usize, message: impl Into<String>) -> Self {
        self.fail_after = Some((shards, message.into()));
        self
    }

    /// Compute the full event sequence for a selection
    pub fn plan(&self, file: &SelectedFile, options: UploadOptions) -> Vec<UploadEvent> {
        let data: Vec<u8> = file
            .entries
            .iter()
            .flat_map(|entry| entry.contents.iter().copied())
            .collect();

        let chunks: Vec<&[u8]> = if data.is_empty() {
            vec![data.as_slice()]
        } else {
            data.chunks(self.shard_size).collect()
        };

        let mut events = Vec::with_capacity(chunks.len() * 3 + 1);
        let mut stored = Vec::with_capacity(chunks.len());

        let mut offset = 0u64;
        for chunk in chunks {
            if let Some((limit, message)) = &self.fail_after {
                if stored.len() >= *limit {
                    events.push(UploadEvent::Failed(message.clone()));
                    return events;
                }
            }

            let mut hasher = Sha256::new();
            hasher.update(offset.to_be_bytes());
            hasher.update(chunk);
            let cid = format!("{}{}", SHARD_PREFIX, hex::encode(hasher.finalize()));
            let total = chunk.len() as u64;
            offset += total;
            events.push(UploadEvent::Progress(ProgressEvent::new(&cid, total / 2, total)));
            events.push(UploadEvent::Progress(ProgressEvent::new(&cid, total, total)));

            let shard = ShardMetadata::new(cid, total);
            events.push(UploadEvent::ShardStored(shard.clone()));
            stored.push(shard);
        }

        let mut root = Sha256::new();
        root.update([options.wrap_in_directory as u8, options.upload_as_car as u8]);
        if options.wrap_in_directory || file.is_directory {
            root.update(file.name.as_bytes());
        }
        for shard in &stored {
            root.update(shard.cid.as_bytes());
        }
        let root = format!("{}{}", ROOT_PREFIX, hex::encode(root.finalize()));

        events.push(UploadEvent::Succeeded {
            root,
            shards: stored,
        });
        events
    }
}

impl Uploader for DryRunUploader {
    fn submit(
        &self,
        file: SelectedFile,
        options: UploadOptions,
    ) -> BoxStream<'static, UploadEvent> {
        let events = self.plan(&file, options);
        log::debug!(
            "Dry-run upload of {} produces {} events",
            file.name,
            events.len()
        );
        stream::iter(events).boxed()
    }
}
