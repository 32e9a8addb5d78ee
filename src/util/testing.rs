// src/util/testing.rs
//! Shared test scaffolding: logging, environment isolation and in-memory fakes
//! of the persistence backends.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::config::{
    CatalogOpts, Settings, ENV_ADMIN_PASSWORD, ENV_DATA_DIR, ENV_EXPORT_DIR, ENV_PORT,
    ENV_SERVER_URL,
};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::logo::ManifestEntry;
use crate::domain::repositories::download_sink::DownloadSink;
use crate::domain::repositories::key_value_store::KeyValueStore;
use crate::domain::repositories::remote_tag_repository::RemoteTagRepository;
use crate::domain::services::clipboard::ClipboardService;
use crate::domain::tag::Tag;
use crate::domain::tag_data::TeamTags;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::json::write_json_pretty;
use crate::infrastructure::storage::InMemoryKeyValueStore;

const GUARDED_VARS: [&str; 5] = [
    ENV_DATA_DIR,
    ENV_SERVER_URL,
    ENV_ADMIN_PASSWORD,
    ENV_PORT,
    ENV_EXPORT_DIR,
];

/// Global test configuration, initialized exactly once via OnceLock.
#[derive(Debug)]
pub struct TestEnv {
    /// Small manifest spanning the priority leagues and a regional one
    pub manifest: Vec<ManifestEntry>,
}

impl TestEnv {
    fn new() -> Self {
        let entry = |name: &str, league: &str, file: &str| ManifestEntry {
            name: name.to_string(),
            path: format!("assets/logos/{}/{}", league, file),
            league: Some(league.to_string()),
        };
        Self {
            manifest: vec![
                entry("ΠΑΟΚ", "SUPERLEAGUE", "paok.png"),
                entry("ΑΕΚ", "SUPERLEAGUE", "aek.png"),
                entry("ΟΦΗ", "SUPERLEAGUE", "ofi.png"),
                entry("ΠΑΣ ΛΑΜΙΑ", "SUPERLEAGUE", "lamia.png"),
                entry("ΑΕ ΚΗΦΙΣΙΑΣ", "SUPERLEAGUE 2", "kifisia.png"),
                entry("ΠΑΝΑΧΑΪΚΗ", "SUPERLEAGUE 2", "panachaiki.png"),
                entry("ΑΟ ΠΟΡΟΣ", "Γ ΕΘΝΙΚΗ", "poros.png"),
                entry("ΑΟ ΗΛΥΣΙΑΚΟΣ", "ΕΠΣ ΑΘΗΝΩΝ", "ilisiakos.png"),
            ],
        }
    }
}

static TEST_ENV: OnceLock<TestEnv> = OnceLock::new();

/// Initializes the global test environment exactly once and returns it.
pub fn init_test_env() -> &'static TestEnv {
    TEST_ENV.get_or_init(|| {
        setup_test_logging();
        info!("Test environment initialized");
        TestEnv::new()
    })
}

/// Logging setup only runs once; later calls do nothing if `tracing` is already set.
fn setup_test_logging() {
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["reqwest", "hyper", "hyper_util", "mio", "want", "tower"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Restores every `GFLOGOS_*` variable on drop
#[derive(Debug, Clone)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            saved: GUARDED_VARS
                .iter()
                .map(|name| (*name, env::var(name).ok()))
                .collect(),
        }
    }

    /// Unsets every guarded variable
    pub fn clear() {
        for name in GUARDED_VARS {
            env::remove_var(name);
        }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(val) => env::set_var(name, val),
                None => env::remove_var(name),
            }
        }
    }
}

/// Tag from a literal known to be valid
pub fn tag(value: &str) -> Tag {
    Tag::new(value).unwrap_or_else(|e| panic!("invalid test tag {:?}: {}", value, e))
}

/// Remote endpoint double with a switchable liveness flag
#[derive(Debug)]
pub struct FakeRemote {
    online: AtomicBool,
    save_calls: AtomicUsize,
    available_tags: Mutex<Vec<Tag>>,
    team_tags: Mutex<TeamTags>,
}

impl FakeRemote {
    fn with_status(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
            save_calls: AtomicUsize::new(0),
            available_tags: Mutex::new(Vec::new()),
            team_tags: Mutex::new(TeamTags::new()),
        }
    }

    pub fn online() -> Self {
        Self::with_status(true)
    }

    pub fn offline() -> Self {
        Self::with_status(false)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Replaces the files the fake serves
    pub fn seed(&self, available_tags: Vec<Tag>, team_tags: TeamTags) {
        *self.available_tags.lock() = available_tags;
        *self.team_tags.lock() = team_tags;
    }

    /// Successful saves so far, both files counted
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn stored_team_tags(&self) -> TeamTags {
        self.team_tags.lock().clone()
    }

    fn ensure_online(&self) -> DomainResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::RemoteUnavailable("connection refused".to_string()))
        }
    }
}

impl RemoteTagRepository for FakeRemote {
    fn fetch_team_tags(&self) -> DomainResult<TeamTags> {
        self.ensure_online()?;
        Ok(self.team_tags.lock().clone())
    }

    fn fetch_available_tags(&self) -> DomainResult<Vec<Tag>> {
        self.ensure_online()?;
        Ok(self.available_tags.lock().clone())
    }

    fn save_team_tags(&self, team_tags: &TeamTags) -> DomainResult<()> {
        self.ensure_online()?;
        *self.team_tags.lock() = team_tags.clone();
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn save_available_tags(&self, available_tags: &[Tag]) -> DomainResult<()> {
        self.ensure_online()?;
        *self.available_tags.lock() = available_tags.to_vec();
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Download sink keeping files in memory
#[derive(Debug, Default)]
pub struct MemoryDownloads {
    files: Mutex<BTreeMap<String, String>>,
}

impl MemoryDownloads {
    pub fn contents(&self, file_name: &str) -> Option<String> {
        self.files.lock().get(file_name).cloned()
    }
}

impl DownloadSink for MemoryDownloads {
    fn save_download(&self, file_name: &str, contents: &str) -> DomainResult<PathBuf> {
        self.files
            .lock()
            .insert(file_name.to_string(), contents.to_string());
        Ok(PathBuf::from("memory").join(file_name))
    }
}

/// Clipboard that records every copy
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    copies: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn copies(&self) -> Vec<String> {
        self.copies.lock().clone()
    }
}

impl ClipboardService for RecordingClipboard {
    fn copy_to_clipboard(&self, text: &str) -> DomainResult<()> {
        self.copies.lock().push(text.to_string());
        Ok(())
    }
}

/// In-memory store whose writes can be made to fail
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: InMemoryKeyValueStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(DomainError::Storage("disk full".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> DomainResult<()> {
        self.check()?;
        self.inner.remove(key)
    }
}

/// Store rejecting every write from the start
pub fn failing_store() -> FlakyStore {
    let store = FlakyStore::default();
    store.fail_writes(true);
    store
}

/// Settings with the remote disabled and every path inside `dir`.
///
/// The sample manifest is written to `dir/logos-manifest.json`; team info is
/// left absent.
pub fn offline_settings(dir: &Path) -> Settings {
    let manifest_path = dir.join("logos-manifest.json");
    write_json_pretty(&manifest_path, &init_test_env().manifest)
        .unwrap_or_else(|e| panic!("cannot write test manifest: {}", e));

    Settings {
        data_dir: dir.join("data"),
        export_dir: dir.join("exports"),
        server_url: String::new(),
        catalog: CatalogOpts {
            manifest_path,
            teams_info_path: dir.join("teams.json"),
            collections_file: dir.join("collections.json"),
        },
        ..Default::default()
    }
}

/// Container over an in-memory local store with tag data loaded
pub fn offline_container(settings: &Settings) -> ServiceContainer {
    let container =
        ServiceContainer::with_local_store(settings, Arc::new(InMemoryKeyValueStore::new()))
            .unwrap_or_else(|e| panic!("cannot wire test container: {}", e));
    container.tag_store.load();
    container
}
