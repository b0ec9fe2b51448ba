//! Text rendering of the upload console
//!
//! Turns an [`UploadView`] into the lines shown to the user for each phase.

use crate::config::ConsoleConfig;
use crate::upload::status::{UploadStatus, UploadView};
use crate::upload::types::{ProgressEvent, SelectedFile, UploadType};

const BAR_WIDTH: usize = 40;
const MIB: f64 = 1024.0 * 1024.0;

/// Shown under the upload form in every idle state
pub const PUBLIC_DATA_NOTICE: &str = "Public Data: all uploaded data is available to anyone \
who requests it using the correct CID. Do not store private or sensitive information \
in an unencrypted form.";

/// Shown under the upload form in every idle state
pub const PERMANENT_DATA_NOTICE: &str = "Permanent Data: removing files removes them from \
your listing, but nodes on the decentralized storage network may keep copies \
indefinitely. Do not upload data that may need to be permanently deleted.";

/// Action offered once an upload has succeeded; it resets the console
pub const ADD_MORE_ACTION: &str = "Add More";

/// Size in MiB with two decimals, e.g. `2.00 MiB`
pub fn human_file_size(bytes: u64) -> String {
    format!("{:.2} MiB", bytes as f64 / MIB)
}

/// Short label describing the kind of file
pub fn file_icon_label(file: &SelectedFile) -> String {
    let mut parts = file.mime_type.split('/');
    let top = parts.next().unwrap_or("");

    if top.is_empty() {
        return match file.name.rsplit('.').next() {
            Some(ext) if ext.len() < 5 => ext.to_string(),
            _ => "Data".to_string(),
        };
    }

    if top == "image" {
        return file.mime_type.rsplit('/').next().unwrap_or(top).to_string();
    }

    top.to_string()
}

/// Link to uploaded content through the configured gateway
pub fn gateway_url(cid: &str, gateway_host: &str) -> String {
    format!("https://{}.ipfs.{}/", cid, gateway_host)
}

/// One progress bar, or a spinner marker when the total is unknown
pub fn progress_bar(event: &ProgressEvent) -> String {
    match event.percent_complete() {
        Some(percent) => {
            let filled = BAR_WIDTH * percent as usize / 100;
            format!(
                "[{}{}] {:>3}%",
                "#".repeat(filled),
                ".".repeat(BAR_WIDTH - filled),
                percent
            )
        }
        None => format!("[{:^width$}]", "working", width = BAR_WIDTH),
    }
}

/// Render the console for the current phase
pub fn render(
    view: &UploadView<'_>,
    upload_type: UploadType,
    config: &ConsoleConfig,
) -> Vec<String> {
    match view.status {
        UploadStatus::Idle => {
            let mut lines = match view.file {
                Some(file) => vec![
                    format!("[{}] {}", file_icon_label(file).to_uppercase(), file.name),
                    human_file_size(file.size()),
                    "Upload".to_string(),
                ],
                None => vec![upload_type.prompt().to_string()],
            };
            lines.push(PUBLIC_DATA_NOTICE.to_string());
            lines.push(PERMANENT_DATA_NOTICE.to_string());
            lines
        }
        UploadStatus::Uploading => {
            let name = view.file.map(|f| f.name.as_str()).unwrap_or_default();
            let mut lines = vec![format!("Uploading {}", name)];
            if let Some(progress) = view.upload_progress {
                lines.extend(progress.values().map(progress_bar));
            }
            lines.extend(view.stored_dag_shards.iter().map(|shard| {
                format!("shard {} ({}) uploaded", shard.cid, human_file_size(shard.size))
            }));
            lines
        }
        UploadStatus::Succeeded => {
            let cid = view.data_cid.unwrap_or_default();
            vec![
                "Uploaded".to_string(),
                cid.to_string(),
                gateway_url(cid, &config.gateway_host),
                ADD_MORE_ACTION.to_string(),
            ]
        }
        UploadStatus::Failed => {
            let message = view
                .error
                .map(|e| e.user_message())
                .unwrap_or_default();
            vec![
                format!("Error: failed to upload file: {}", message),
                "Check the logs for details.".to_string(),
            ]
        }
    }
}
