// src/config.rs
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

pub const ENV_DATA_DIR: &str = "GFLOGOS_DATA_DIR";
pub const ENV_SERVER_URL: &str = "GFLOGOS_SERVER_URL";
pub const ENV_ADMIN_PASSWORD: &str = "GFLOGOS_ADMIN_PASSWORD";
pub const ENV_PORT: &str = "GFLOGOS_PORT";
pub const ENV_EXPORT_DIR: &str = "GFLOGOS_EXPORT_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerOpts {
    /// Port the file-save server listens on (default: 3000)
    pub port: u16,

    /// File backing `/api/team-tags`
    pub team_tags_file: PathBuf,

    /// File backing `/api/available-tags`
    pub available_tags_file: PathBuf,
}

impl Default for ServerOpts {
    fn default() -> Self {
        Self {
            port: 3000,
            team_tags_file: PathBuf::from("src/assets/data/team-tags.json"),
            available_tags_file: PathBuf::from("src/assets/data/available-tags.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogOpts {
    /// Logo manifest produced by `gflogos manifest`
    pub manifest_path: PathBuf,

    /// Team descriptions, `{"teams": {...}}`
    pub teams_info_path: PathBuf,

    /// Collections file used by `col-export` and `col-load` in the admin shell
    pub collections_file: PathBuf,
}

impl Default for CatalogOpts {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("assets/logos-manifest.json"),
            teams_info_path: PathBuf::from("assets/data/teams.json"),
            collections_file: PathBuf::from("assets/data/collections.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminOpts {
    pub password: String,
}

impl Default for AdminOpts {
    fn default() -> Self {
        Self {
            password: "stavrosadmin".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Directory of the local key-value store
    pub data_dir: PathBuf,

    /// Where fallback downloads and exports are written
    pub export_dir: PathBuf,

    /// Base URL of the file-save server; empty disables remote persistence
    pub server_url: String,

    /// Timeout for each request to the file-save server
    pub request_timeout_ms: u64,

    /// Interval of the background liveness probe
    pub health_interval_secs: u64,

    /// Also copy fallback files to the clipboard
    pub clipboard_fallback: bool,

    pub server: ServerOpts,

    pub catalog: CatalogOpts,

    pub admin: AdminOpts,
}

fn config_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/gflogos")
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = config_home();
        let export_dir = dirs::download_dir().unwrap_or_else(|| data_dir.join("exports"));
        Self {
            data_dir,
            export_dir,
            server_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 5000,
            health_interval_secs: 30,
            clipboard_fallback: false,
            server: ServerOpts::default(),
            catalog: CatalogOpts::default(),
            admin: AdminOpts::default(),
        }
    }
}

impl Settings {
    pub fn remote_enabled(&self) -> bool {
        !self.server_url.trim().is_empty()
    }
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    config_home().join("config.toml")
}

/// Loads settings from a config file and environment variables.
///
/// An explicitly given file must exist and parse. The default file is
/// optional and ignored when unreadable.
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) => read_config_file(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                read_config_file(&path).unwrap_or_else(|e| {
                    debug!("Ignoring unreadable config {:?}: {}", path, e);
                    Settings::default()
                })
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings)?;

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    trace!("Loading config from: {:?}", path);
    let text = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Other(format!("Cannot read config {}: {}", path.display(), e)))?;
    toml::from_str::<Settings>(&text)
        .map_err(|e| DomainError::Other(format!("Invalid config {}: {}", path.display(), e)))
}

fn apply_env_overrides(settings: &mut Settings) -> DomainResult<()> {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        trace!("Using {} from environment: {}", ENV_DATA_DIR, dir);
        settings.data_dir = PathBuf::from(dir);
    }

    if let Ok(dir) = std::env::var(ENV_EXPORT_DIR) {
        trace!("Using {} from environment: {}", ENV_EXPORT_DIR, dir);
        settings.export_dir = PathBuf::from(dir);
    }

    if let Ok(url) = std::env::var(ENV_SERVER_URL) {
        trace!("Using {} from environment: {}", ENV_SERVER_URL, url);
        settings.server_url = url;
    }

    if let Ok(password) = std::env::var(ENV_ADMIN_PASSWORD) {
        trace!("Using {} from environment", ENV_ADMIN_PASSWORD);
        settings.admin.password = password;
    }

    if let Ok(port) = std::env::var(ENV_PORT) {
        settings.server.port = port
            .trim()
            .parse()
            .map_err(|_| DomainError::Other(format!("{} is not a valid port: {}", ENV_PORT, port)))?;
    }

    Ok(())
}

pub fn generate_default_config() -> String {
    let default_settings = Settings::default();
    toml::to_string_pretty(&default_settings)
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
