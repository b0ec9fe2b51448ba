//! The external uploader capability
//!
//! The console never packages or transfers data itself. It hands the selected
//! file and options to an [`Uploader`] and reacts to the stream of
//! [`UploadEvent`]s that comes back.

use crate::upload::types::{ProgressEvent, SelectedFile, ShardMetadata, UploadOptions};
use futures::stream::BoxStream;

/// Everything an uploader can report about an in-flight upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Bytes sent for one shard
    Progress(ProgressEvent),
    /// A shard has been stored by the service
    ShardStored(ShardMetadata),
    /// The upload finished; `root` addresses the uploaded item
    Succeeded {
        root: String,
        shards: Vec<ShardMetadata>,
    },
    /// The upload failed; the message is shown to the user as-is
    Failed(String),
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadEvent::Succeeded { .. } | UploadEvent::Failed(_))
    }
}

/// A capability that uploads a selection and reports progress as a stream.
///
/// Implementations should end the stream with exactly one terminal event.
pub trait Uploader: Send + Sync {
    fn submit(
        &self,
        file: SelectedFile,
        options: UploadOptions,
    ) -> BoxStream<'static, UploadEvent>;
}

impl<U: Uploader + ?Sized> Uploader for std::sync::Arc<U> {
    fn submit(
        &self,
        file: SelectedFile,
        options: UploadOptions,
    ) -> BoxStream<'static, UploadEvent> {
        (**self).submit(file, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        assert!(UploadEvent::Failed("boom".into()).is_terminal());
        assert!(UploadEvent::Succeeded {
            root: "bafyroot".into(),
            shards: vec![]
        }
        .is_terminal());
        assert!(!UploadEvent::ShardStored(ShardMetadata::new("bagA", 1)).is_terminal());
        assert!(!UploadEvent::Progress(ProgressEvent::new("bagA", 1, 2)).is_terminal());
    }
}
