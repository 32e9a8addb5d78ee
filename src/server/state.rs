// src/server/state.rs
use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::config::ServerOpts;

/// Files the server reads and overwrites
#[derive(Debug)]
pub struct ServerState {
    pub team_tags_file: PathBuf,
    pub available_tags_file: PathBuf,
    /// Serializes writes so two saves never interleave on disk
    pub write_lock: Mutex<()>,
}

impl ServerState {
    pub fn new(team_tags_file: impl Into<PathBuf>, available_tags_file: impl Into<PathBuf>) -> Self {
        Self {
            team_tags_file: team_tags_file.into(),
            available_tags_file: available_tags_file.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_opts(opts: &ServerOpts) -> Self {
        Self::new(&opts.team_tags_file, &opts.available_tags_file)
    }
}
