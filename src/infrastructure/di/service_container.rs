// src/infrastructure/di/service_container.rs
use crate::application::error::ApplicationResult;
use crate::application::{
    AdminGate, CollectionCatalog, LogoCatalog, QuizService, ServerStatus, TagEditor, TagQuery,
    TagStore, TeamDirectory,
};
use crate::config::Settings;
use crate::domain::repositories::download_sink::DownloadSink;
use crate::domain::repositories::key_value_store::KeyValueStore;
use crate::domain::repositories::remote_tag_repository::RemoteTagRepository;
use crate::domain::services::clipboard::ClipboardService;
use crate::domain::team_info::TeamsDocument;
use crate::infrastructure::clipboard::ClipboardServiceImpl;
use crate::infrastructure::download::FileDownloadSink;
use crate::infrastructure::http::HttpTagRepository;
use crate::infrastructure::json::{read_manifest, read_teams_document};
use crate::infrastructure::storage::FileKeyValueStore;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Production service container - single source of truth for service creation
pub struct ServiceContainer {
    // Backends
    pub local_store: Arc<dyn KeyValueStore>,
    pub remote: Option<Arc<dyn RemoteTagRepository>>,
    pub downloads: Arc<dyn DownloadSink>,
    pub clipboard_service: Arc<dyn ClipboardService>,

    // Tag state
    pub tag_store: Arc<TagStore>,
    pub tag_editor: Arc<TagEditor>,
    pub tag_query: Arc<TagQuery>,

    // Catalogs and the rest
    pub logo_catalog: Arc<LogoCatalog>,
    pub collection_catalog: Arc<CollectionCatalog>,
    pub team_directory: Arc<TeamDirectory>,
    pub admin_gate: Arc<AdminGate>,
    pub server_status: Arc<ServerStatus>,
    pub quiz_service: Arc<QuizService>,
}

impl ServiceContainer {
    /// Create all services with explicit dependency injection
    pub fn new(config: &Settings) -> ApplicationResult<Self> {
        let local_store: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(&config.data_dir));
        Self::with_local_store(config, local_store)
    }

    /// Same wiring over a caller-supplied local store
    pub fn with_local_store(
        config: &Settings,
        local_store: Arc<dyn KeyValueStore>,
    ) -> ApplicationResult<Self> {
        let remote = Self::create_remote(config)?;
        let downloads: Arc<dyn DownloadSink> = Arc::new(FileDownloadSink::new(&config.export_dir));
        let clipboard_service: Arc<dyn ClipboardService> = Arc::new(ClipboardServiceImpl::new());

        let tag_store = Arc::new(TagStore::new(
            local_store.clone(),
            remote.clone(),
            downloads.clone(),
            config.clipboard_fallback.then(|| clipboard_service.clone()),
        ));
        let tag_editor = Arc::new(TagEditor::new(tag_store.clone()));
        let tag_query = Arc::new(TagQuery::new(tag_store.clone()));

        let logo_catalog = Arc::new(Self::create_logo_catalog(config));
        let collection_catalog = Arc::new(CollectionCatalog::new(local_store.clone()));
        let team_directory = Arc::new(Self::create_team_directory(config));
        let admin_gate = Arc::new(AdminGate::new(local_store.clone(), &config.admin.password));
        let server_status = Arc::new(ServerStatus::new(remote.clone()));
        let quiz_service = Arc::new(QuizService::new(local_store.clone()));

        Ok(Self {
            local_store,
            remote,
            downloads,
            clipboard_service,
            tag_store,
            tag_editor,
            tag_query,
            logo_catalog,
            collection_catalog,
            team_directory,
            admin_gate,
            server_status,
            quiz_service,
        })
    }

    fn create_remote(config: &Settings) -> ApplicationResult<Option<Arc<dyn RemoteTagRepository>>> {
        if !config.remote_enabled() {
            debug!("Remote persistence disabled");
            return Ok(None);
        }
        let repository = HttpTagRepository::new(&config.server_url, config.request_timeout_ms)?;
        Ok(Some(Arc::new(repository)))
    }

    fn create_logo_catalog(config: &Settings) -> LogoCatalog {
        match read_manifest(&config.catalog.manifest_path) {
            Ok(entries) => LogoCatalog::new(entries),
            Err(e) => {
                error!(
                    "Cannot load logo manifest {}: {}",
                    config.catalog.manifest_path.display(),
                    e
                );
                LogoCatalog::new(Vec::new())
            }
        }
    }

    fn create_team_directory(config: &Settings) -> TeamDirectory {
        match read_teams_document(&config.catalog.teams_info_path) {
            Ok(document) => TeamDirectory::new(document),
            Err(e) => {
                warn!(
                    "Cannot load team info {}: {}",
                    config.catalog.teams_info_path.display(),
                    e
                );
                TeamDirectory::new(TeamsDocument::default())
            }
        }
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("local_store", &"Arc<dyn KeyValueStore>")
            .field("remote", &self.remote.as_ref().map(|_| "Arc<dyn RemoteTagRepository>"))
            .field("downloads", &"Arc<dyn DownloadSink>")
            .field("clipboard_service", &"Arc<dyn ClipboardService>")
            .field("tag_store", &self.tag_store)
            .field("logos", &self.logo_catalog.len())
            .field("server_status", &self.server_status)
            .finish()
    }
}
