// src/infrastructure/json.rs
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::error::DomainResult;
use crate::domain::logo::ManifestEntry;
use crate::domain::team_info::TeamsDocument;
use crate::infrastructure::error::InfrastructureError;

fn read_json<T: DeserializeOwned>(path: &Path) -> DomainResult<T> {
    let text = fs::read_to_string(path).map_err(|e| {
        InfrastructureError::FileSystem(format!("Cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        InfrastructureError::Serialization(format!("{}: {}", path.display(), e)).into()
    })
}

/// Pretty-prints `value` to `path`, creating parent directories
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> DomainResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            InfrastructureError::FileSystem(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| {
        InfrastructureError::FileSystem(format!("Cannot write {}: {}", path.display(), e))
    })?;
    Ok(())
}

#[instrument(level = "debug")]
pub fn read_manifest(path: &Path) -> DomainResult<Vec<ManifestEntry>> {
    let entries: Vec<ManifestEntry> = read_json(path)?;
    debug!("Manifest lists {} logos", entries.len());
    Ok(entries)
}

#[instrument(level = "debug")]
pub fn read_teams_document(path: &Path) -> DomainResult<TeamsDocument> {
    let document: TeamsDocument = read_json(path)?;
    debug!("Teams document describes {} teams", document.teams.len());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use tempfile::tempdir;

    #[test]
    fn given_manifest_file_when_read_then_entries_with_optional_league() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("logos-manifest.json");
        fs::write(
            &path,
            r#"[
                {"name": "ΠΑΟΚ", "path": "assets/logos/SUPERLEAGUE/paok.png", "league": "SUPERLEAGUE"},
                {"name": "Loose", "path": "assets/logos/loose.png"}
            ]"#,
        )
        .unwrap();

        let entries = read_manifest(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].league.as_deref(), Some("SUPERLEAGUE"));
        assert_eq!(entries[1].league, None);
    }

    #[test]
    fn given_missing_or_malformed_file_when_read_then_error() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            read_manifest(&temp.path().join("absent.json")),
            Err(DomainError::Storage(_))
        ));

        let path = temp.path().join("teams.json");
        fs::write(&path, "{\"teams\": 3}").unwrap();
        assert!(matches!(
            read_teams_document(&path),
            Err(DomainError::Serialization(_))
        ));
    }

    #[test]
    fn given_nested_target_when_write_pretty_then_parents_created() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a/b/out.json");
        write_json_pretty(&path, &vec!["Red", "Blue"]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[\n  \"Red\",\n  \"Blue\"\n]"
        );
    }
}
