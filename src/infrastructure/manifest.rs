// src/infrastructure/manifest.rs
use std::path::Path;

use ignore::WalkBuilder;
use tracing::{debug, instrument, warn};

use crate::domain::error::DomainResult;
use crate::domain::logo::ManifestEntry;
use crate::infrastructure::error::InfrastructureError;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "svg", "webp"];

/// League of logos lying directly in the scanned root
pub const ROOT_LEAGUE: &str = "Other";

fn is_logo_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// File stem to display name: dashes become spaces, word-initial ASCII
/// letters are upper-cased
pub fn display_name(stem: &str) -> String {
    let mut name = String::with_capacity(stem.len());
    let mut prev_is_word = false;
    for c in stem.chars().map(|c| if c == '-' { ' ' } else { c }) {
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            name.push(c.to_ascii_uppercase());
        } else {
            name.push(c);
        }
        prev_is_word = is_word;
    }
    name
}

/// Recursively collects logo images under `logos_dir`, sorted by path
#[instrument(level = "debug")]
pub fn scan_logo_dir(logos_dir: &Path) -> DomainResult<Vec<ManifestEntry>> {
    if !logos_dir.is_dir() {
        return Err(InfrastructureError::FileSystem(format!(
            "Not a directory: {}",
            logos_dir.display()
        ))
        .into());
    }

    let walker = WalkBuilder::new(logos_dir)
        .git_ignore(false)
        .git_exclude(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || !is_logo_file(path) {
            continue;
        }
        let Ok(relative) = path.strip_prefix(logos_dir) else {
            continue;
        };
        let Some(file_name) = relative.file_name().and_then(|f| f.to_str()) else {
            continue;
        };
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);

        let league = relative
            .parent()
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();

        let (asset_path, league) = if league.is_empty() {
            (format!("assets/logos/{}", file_name), ROOT_LEAGUE.to_string())
        } else {
            (format!("assets/logos/{}/{}", league, file_name), league)
        };

        debug!("Found logo {}", asset_path);
        entries.push(ManifestEntry {
            name: display_name(stem),
            path: asset_path,
            league: Some(league),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn given_stem_when_display_name_then_words_capitalized() {
        assert_eq!(display_name("aris-thessalonikis"), "Aris Thessalonikis");
        assert_eq!(display_name("ofi_crete-fc"), "Ofi_crete Fc");
        assert_eq!(display_name("ΠΑΟΚ"), "ΠΑΟΚ");
    }

    #[test]
    fn given_nested_logo_dir_when_scan_then_leagues_from_directories() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("SUPERLEAGUE")).unwrap();
        fs::create_dir_all(root.join("ΕΠΣ ΑΘΗΝΩΝ/Α ΚΑΤΗΓΟΡΙΑ")).unwrap();
        fs::write(root.join("SUPERLEAGUE/paok.png"), b"x").unwrap();
        fs::write(root.join("SUPERLEAGUE/notes.txt"), b"x").unwrap();
        fs::write(root.join("ΕΠΣ ΑΘΗΝΩΝ/Α ΚΑΤΗΓΟΡΙΑ/ilisiakos.SVG"), b"x").unwrap();
        fs::write(root.join("generic-crest.webp"), b"x").unwrap();

        let entries = scan_logo_dir(root).unwrap();
        assert_eq!(entries.len(), 3);

        let paok = entries.iter().find(|e| e.name == "Paok").unwrap();
        assert_eq!(paok.path, "assets/logos/SUPERLEAGUE/paok.png");
        assert_eq!(paok.league.as_deref(), Some("SUPERLEAGUE"));

        let nested = entries.iter().find(|e| e.name == "Ilisiakos").unwrap();
        assert_eq!(nested.league.as_deref(), Some("ΕΠΣ ΑΘΗΝΩΝ/Α ΚΑΤΗΓΟΡΙΑ"));

        let root_logo = entries.iter().find(|e| e.name == "Generic Crest").unwrap();
        assert_eq!(root_logo.path, "assets/logos/generic-crest.webp");
        assert_eq!(root_logo.league.as_deref(), Some(ROOT_LEAGUE));
    }

    #[test]
    fn given_missing_dir_when_scan_then_error() {
        assert!(scan_logo_dir(Path::new("/nonexistent/logos")).is_err());
    }
}
