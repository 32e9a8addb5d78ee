// src/application/services/tag_store.rs
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::application::error::ApplicationResult;
use crate::domain::error::DomainResult;
use crate::domain::repositories::download_sink::DownloadSink;
use crate::domain::repositories::key_value_store::{KeyValueStore, TAGS_KEY};
use crate::domain::repositories::remote_tag_repository::RemoteTagRepository;
use crate::domain::services::clipboard::ClipboardService;
use crate::domain::tag_data::TagData;

pub const TEAM_TAGS_FILE: &str = "team-tags.json";
pub const AVAILABLE_TAGS_FILE: &str = "available-tags.json";

/// Where the committed snapshot came from on load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Local,
    Defaults,
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadSource::Remote => write!(f, "remote server"),
            LoadSource::Local => write!(f, "local storage"),
            LoadSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Result of pushing one tag file to the remote endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// No server configured
    Disabled,
    Saved,
    /// The push failed; the file was handed over locally instead
    Fallback {
        error: String,
        download: Option<PathBuf>,
        copied_to_clipboard: bool,
    },
}

impl RemoteOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, RemoteOutcome::Saved)
    }

    pub fn download(&self) -> Option<&Path> {
        match self {
            RemoteOutcome::Fallback { download, .. } => download.as_deref(),
            _ => None,
        }
    }
}

/// What happened beyond the local write during a publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub team_tags: RemoteOutcome,
    pub available_tags: RemoteOutcome,
}

impl PublishReport {
    pub fn remote_saved(&self) -> bool {
        self.team_tags.is_saved() && self.available_tags.is_saved()
    }

    pub fn fallback_files(&self) -> Vec<&Path> {
        [&self.team_tags, &self.available_tags]
            .into_iter()
            .filter_map(RemoteOutcome::download)
            .collect()
    }
}

/// Owner of the committed tag snapshot.
///
/// The local key-value store is the durable source of truth. The remote
/// file-save endpoint is written after it on a best-effort basis. Observers
/// receive the visible view through a replay-latest channel.
pub struct TagStore {
    local: Arc<dyn KeyValueStore>,
    remote: Option<Arc<dyn RemoteTagRepository>>,
    downloads: Arc<dyn DownloadSink>,
    clipboard: Option<Arc<dyn ClipboardService>>,
    committed: RwLock<TagData>,
    view: watch::Sender<TagData>,
}

impl TagStore {
    pub fn new(
        local: Arc<dyn KeyValueStore>,
        remote: Option<Arc<dyn RemoteTagRepository>>,
        downloads: Arc<dyn DownloadSink>,
        clipboard: Option<Arc<dyn ClipboardService>>,
    ) -> Self {
        let (view, _) = watch::channel(TagData::default());
        Self {
            local,
            remote,
            downloads,
            clipboard,
            committed: RwLock::new(TagData::default()),
            view,
        }
    }

    /// Establishes the committed snapshot: remote files, then local storage,
    /// then the built-in fixture. Failures are logged, never returned.
    #[instrument(skip(self), level = "debug")]
    pub fn load(&self) -> LoadSource {
        if let Some(remote) = &self.remote {
            match (remote.fetch_team_tags(), remote.fetch_available_tags()) {
                (Ok(team_tags), Ok(available_tags)) => {
                    let mut data = self.current();
                    data.team_tags = team_tags;
                    data.available_tags = available_tags;
                    if let Err(e) = self.write_local(&data) {
                        warn!("Could not cache remote tags locally: {}", e);
                    }
                    self.replace(data);
                    info!("Loaded tags from remote server");
                    return LoadSource::Remote;
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Remote tag files unavailable, using local storage: {}", e);
                }
            }
        }

        match self.read_local() {
            Ok(Some(data)) => {
                self.replace(data);
                debug!("Loaded tags from local storage");
                return LoadSource::Local;
            }
            Ok(None) => debug!("No stored tags found"),
            Err(e) => warn!("Stored tags unreadable, using defaults: {}", e),
        }

        let data = TagData::defaults();
        if let Err(e) = self.write_local(&data) {
            warn!("Could not store default tags: {}", e);
        }
        self.replace(data);
        LoadSource::Defaults
    }

    /// Latest committed snapshot
    pub fn current(&self) -> TagData {
        self.committed.read().clone()
    }

    /// Latest visible view, including any broadcast pending edits
    pub fn view(&self) -> TagData {
        self.view.borrow().clone()
    }

    /// Replay-latest stream of the visible view
    pub fn subscribe(&self) -> watch::Receiver<TagData> {
        self.view.subscribe()
    }

    /// Updates observers without touching the committed snapshot
    pub fn broadcast(&self, view: TagData) {
        self.view.send_replace(view);
    }

    /// Commits a snapshot.
    ///
    /// The local write must succeed before anything else changes. The remote
    /// push that follows is reported in the returned [`PublishReport`].
    #[instrument(skip_all, level = "debug")]
    pub fn publish(&self, snapshot: TagData) -> ApplicationResult<PublishReport> {
        self.write_local(&snapshot)
            .map_err(|e| e.context("Failed to write tags to local storage"))?;

        self.replace(snapshot.clone());
        let report = self.push_remote(&snapshot);
        debug!(?report, "Published tag snapshot");
        Ok(report)
    }

    fn replace(&self, data: TagData) {
        *self.committed.write() = data.clone();
        self.broadcast(data);
    }

    fn read_local(&self) -> DomainResult<Option<TagData>> {
        self.local
            .get(TAGS_KEY)?
            .map(|json| TagData::from_json(&json))
            .transpose()
    }

    fn write_local(&self, data: &TagData) -> DomainResult<()> {
        let json = serde_json::to_string(data)?;
        self.local.set(TAGS_KEY, &json)
    }

    fn push_remote(&self, snapshot: &TagData) -> PublishReport {
        let Some(remote) = &self.remote else {
            return PublishReport {
                team_tags: RemoteOutcome::Disabled,
                available_tags: RemoteOutcome::Disabled,
            };
        };

        let team_tags = match remote.save_team_tags(&snapshot.team_tags) {
            Ok(()) => RemoteOutcome::Saved,
            Err(e) => self.fallback(TEAM_TAGS_FILE, &snapshot.team_tags, e.to_string()),
        };
        let available_tags = match remote.save_available_tags(&snapshot.available_tags) {
            Ok(()) => RemoteOutcome::Saved,
            Err(e) => self.fallback(AVAILABLE_TAGS_FILE, &snapshot.available_tags, e.to_string()),
        };

        PublishReport {
            team_tags,
            available_tags,
        }
    }

    fn fallback<T: serde::Serialize + ?Sized>(
        &self,
        file_name: &str,
        payload: &T,
        error: String,
    ) -> RemoteOutcome {
        warn!("Remote save of {} failed: {}", file_name, error);

        let json = match serde_json::to_string_pretty(payload) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize {} for fallback: {}", file_name, e);
                return RemoteOutcome::Fallback {
                    error,
                    download: None,
                    copied_to_clipboard: false,
                };
            }
        };

        let download = match self.downloads.save_download(file_name, &json) {
            Ok(path) => {
                info!("Wrote {} to {}", file_name, path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Could not write fallback file {}: {}", file_name, e);
                None
            }
        };

        let copied_to_clipboard = match &self.clipboard {
            Some(clipboard) => match clipboard.copy_to_clipboard(&json) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Clipboard fallback failed: {}", e);
                    false
                }
            },
            None => false,
        };

        RemoteOutcome::Fallback {
            error,
            download,
            copied_to_clipboard,
        }
    }
}

impl fmt::Debug for TagStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagStore")
            .field("local", &self.local)
            .field("remote", &self.remote)
            .field("downloads", &self.downloads)
            .field("clipboard", &self.clipboard.as_ref().map(|_| "Arc<dyn ClipboardService>"))
            .finish()
    }
}
