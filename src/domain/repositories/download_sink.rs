// src/domain/repositories/download_sink.rs
use std::fmt::Debug;
use std::path::PathBuf;

use crate::domain::error::DomainResult;

/// Destination for files handed to the user when a remote write fails
pub trait DownloadSink: Send + Sync + Debug {
    /// Writes `contents` under `file_name` and returns where it landed
    fn save_download(&self, file_name: &str, contents: &str) -> DomainResult<PathBuf>;
}
