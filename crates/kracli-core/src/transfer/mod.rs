//! Streaming downloads and TUS resumable uploads.

pub mod download;
pub mod upload;

use thiserror::Error;

/// Progress reporting for byte transfers; the CLI feeds these into its
/// progress bar.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent {
    /// The transfer is starting. `total` is the absolute size when
    /// known, `resumed_from` the already-transferred prefix.
    Started { total: Option<u64>, resumed_from: u64 },
    /// A chunk of this many bytes completed.
    Chunk(u64),
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("File not found or not accessible")]
    SourceMissing,

    #[error("File has zero size")]
    SourceEmpty,

    #[error("Download failed with status {0}")]
    DownloadStatus(reqwest::StatusCode),

    #[error("Error retrieving upload resource")]
    NoUploadResource,

    #[error("File already uploaded or other error")]
    ProbeFailed,

    #[error("Local file and upload resource differ in size")]
    SizeMismatch,

    #[error("Server response carried no Upload-Offset header")]
    MissingUploadOffset,

    #[error("Server acknowledged offset {offset} beyond the upload length {length}")]
    OffsetOverrun { offset: u64, length: u64 },

    #[error("Upload stopped at offset {offset} of {length}")]
    Incomplete { offset: u64, length: u64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// Process exit code for this failure: 2 for the upload preflight
    /// checks, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            TransferError::SourceMissing | TransferError::SourceEmpty => 2,
            _ => 1,
        }
    }
}
