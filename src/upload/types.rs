use crate::error::{ConsoleError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What kind of item the user is uploading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadType {
    File,
    Directory,
    Car,
}

impl Default for UploadType {
    fn default() -> Self {
        UploadType::File
    }
}

impl UploadType {
    /// Prompt shown in the drop area before anything is selected
    pub fn prompt(&self) -> &'static str {
        match self {
            UploadType::File => "Drag File or Click to Browse",
            UploadType::Directory => "Drag Directory or Click to Browse",
            UploadType::Car => "Drag CAR or Click to Browse",
        }
    }

    /// Set the option flags implied by this upload type.
    ///
    /// `wrap_in_directory` is left alone; it only applies to plain files but
    /// the user's choice is kept when switching back and forth.
    pub fn apply(&self, options: &mut UploadOptions) {
        let (upload_as_car, allow_directory) = match self {
            UploadType::File => (false, false),
            UploadType::Directory => (false, true),
            UploadType::Car => (true, false),
        };
        options.upload_as_car = upload_as_car;
        options.allow_directory = allow_directory;
    }
}

impl std::fmt::Display for UploadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadType::File => write!(f, "File"),
            UploadType::Directory => write!(f, "Directory"),
            UploadType::Car => write!(f, "CAR"),
        }
    }
}

impl std::str::FromStr for UploadType {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(UploadType::File),
            "directory" | "dir" => Ok(UploadType::Directory),
            "car" => Ok(UploadType::Car),
            other => Err(ConsoleError::validation(
                "upload_type",
                format!("Unknown upload type '{}'", other),
            )),
        }
    }
}

/// Upload configuration handed to the uploader with every submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    pub wrap_in_directory: bool,
    pub upload_as_car: bool,
    pub allow_directory: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            wrap_in_directory: true,
            upload_as_car: false,
            allow_directory: false,
        }
    }
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrap_in_directory(mut self, wrap: bool) -> Self {
        self.wrap_in_directory = wrap;
        self
    }

    pub fn upload_as_car(mut self, car: bool) -> Self {
        self.upload_as_car = car;
        self
    }

    pub fn allow_directory(mut self, allow: bool) -> Self {
        self.allow_directory = allow;
        self
    }

    pub fn for_type(upload_type: UploadType) -> Self {
        let mut options = Self::default();
        upload_type.apply(&mut options);
        options
    }

    /// The upload type these flags correspond to
    pub fn upload_type(&self) -> UploadType {
        if self.upload_as_car {
            UploadType::Car
        } else if self.allow_directory {
            UploadType::Directory
        } else {
            UploadType::File
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload_as_car && self.allow_directory {
            return Err(ConsoleError::validation(
                "options",
                "A CAR upload cannot also be a directory upload",
            ));
        }
        Ok(())
    }
}

/// One file inside a selection. A plain file selection has exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the selected item
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// The file, directory or CAR picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type, empty when unknown
    pub mime_type: String,
    pub entries: Vec<FileEntry>,
    pub is_directory: bool,
}

impl SelectedFile {
    /// A single file held in memory
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let name = name.into();
        Self {
            entries: vec![FileEntry {
                path: PathBuf::from(&name),
                contents: bytes,
            }],
            name,
            mime_type: mime_type.into(),
            is_directory: false,
        }
    }

    /// Read a file, or a directory when `allow_directory` is set, from disk
    pub fn from_path<P: AsRef<Path>>(path: P, allow_directory: bool) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ConsoleError::validation("file", format!("No file name in {}", path.display()))
            })?;

        if !path.exists() {
            return Err(ConsoleError::validation(
                "file",
                format!("File does not exist: {}", path.display()),
            ));
        }

        if path.is_dir() {
            if !allow_directory {
                return Err(ConsoleError::validation(
                    "file",
                    format!("{} is a directory; select the Directory upload type", path.display()),
                ));
            }
            let entries = collect_entries(path)?;
            log::debug!("Read {} entries from directory {}", entries.len(), path.display());
            return Ok(Self {
                name,
                mime_type: String::new(),
                entries,
                is_directory: true,
            });
        }

        let contents = std::fs::read(path)?;
        Ok(Self {
            mime_type: mime_from_name(&name).to_string(),
            entries: vec![FileEntry {
                path: PathBuf::from(&name),
                contents,
            }],
            name,
            is_directory: false,
        })
    }

    /// Total size in bytes of all entries
    pub fn size(&self) -> u64 {
        self.entries.iter().map(|e| e.contents.len() as u64).sum()
    }
}

fn collect_entries(root: &Path) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).map_err(|e| {
            ConsoleError::validation(
                "file",
                format!("{} is outside {}: {}", entry.path().display(), root.display(), e),
            )
        })?;
        entries.push(FileEntry {
            path: relative.to_path_buf(),
            contents: std::fs::read(entry.path())?,
        });
    }
    Ok(entries)
}

fn mime_from_name(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return "",
    };
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "car" => "application/vnd.ipld.car",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => "",
    }
}

/// Progress of a single shard in flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub shard_id: String,
    pub bytes_loaded: u64,
    pub bytes_total: u64,
    pub length_computable: bool,
}

impl ProgressEvent {
    pub fn new(shard_id: impl Into<String>, bytes_loaded: u64, bytes_total: u64) -> Self {
        Self {
            shard_id: shard_id.into(),
            bytes_loaded,
            bytes_total,
            length_computable: true,
        }
    }

    /// A progress event whose total is unknown
    pub fn indeterminate(shard_id: impl Into<String>, bytes_loaded: u64) -> Self {
        Self {
            shard_id: shard_id.into(),
            bytes_loaded,
            bytes_total: 0,
            length_computable: false,
        }
    }

    /// Whole percent complete, or `None` when the total is not known
    pub fn percent_complete(&self) -> Option<u8> {
        if !self.length_computable || self.bytes_total == 0 {
            return None;
        }
        let percent = self.bytes_loaded.min(self.bytes_total) * 100 / self.bytes_total;
        Some(percent as u8)
    }
}

/// A shard that has been stored by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardMetadata {
    pub cid: String,
    pub size: u64,
}

impl ShardMetadata {
    pub fn new(cid: impl Into<String>, size: u64) -> Self {
        Self {
            cid: cid.into(),
            size,
        }
    }
}

/// Summary of a successful upload, passed to the completion callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub root_cid: String,
    pub file_name: String,
    pub size: u64,
    pub shards: Vec<ShardMetadata>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl UploadResult {
    pub fn duration_ms(&self) -> u64 {
        (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }
}
