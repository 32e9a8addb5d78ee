// src/infrastructure/download.rs
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::domain::error::DomainResult;
use crate::domain::repositories::download_sink::DownloadSink;
use crate::infrastructure::error::InfrastructureError;

/// Writes fallback files into the export directory, overwriting older ones
#[derive(Debug, Clone)]
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FileDownloadSink {
    #[instrument(skip(self, contents), level = "debug")]
    fn save_download(&self, file_name: &str, contents: &str) -> DomainResult<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| InfrastructureError::FileSystem(format!("Invalid file name: {}", file_name)))?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            InfrastructureError::FileSystem(format!("Cannot create {}: {}", self.dir.display(), e))
        })?;

        let path = self.dir.join(name);
        fs::write(&path, contents).map_err(|e| {
            InfrastructureError::FileSystem(format!("Cannot write {}: {}", path.display(), e))
        })?;
        info!("Saved {}", path.display());
        Ok(path)
    }
}
