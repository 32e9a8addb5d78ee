// src/cli/catalog_commands.rs
use std::io::Write;
use std::path::Path;

use crossterm::style::Stylize;
use tracing::{info, instrument};

use crate::application::error::ApplicationError;
use crate::cli::display::{
    write_collection_detail, write_collections, write_logos, write_team_info,
};
use crate::cli::error::CliResult;
use crate::domain::collection::Collection;
use crate::domain::logo::league_logo_path;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::json::write_json_pretty;
use crate::infrastructure::manifest::scan_logo_dir;

#[instrument(skip(out, services))]
pub fn logos<W: Write>(
    out: &mut W,
    services: &ServiceContainer,
    league: Option<&str>,
    search: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let logos = services.logo_catalog.logos(league, search);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&logos)?)?;
        return Ok(());
    }
    if logos.is_empty() {
        eprintln!("No logos found");
        return Ok(());
    }
    write_logos(out, &logos)?;
    eprintln!("{} logos", logos.len());
    Ok(())
}

pub fn leagues<W: Write>(out: &mut W, services: &ServiceContainer) -> CliResult<()> {
    for league in services.logo_catalog.leagues() {
        let count = services.logo_catalog.logos(Some(&league), None).len();
        writeln!(
            out,
            "{:<32} {:>4}  {}",
            league,
            count,
            league_logo_path(&league).dark_grey()
        )?;
    }
    Ok(())
}

pub fn team_info<W: Write>(out: &mut W, services: &ServiceContainer, team: &str) -> CliResult<()> {
    let info = services.team_directory.team_info(team)?;
    write_team_info(out, info)?;
    Ok(())
}

/// Scans `dir` and writes the manifest, returning the number of entries
#[instrument(skip(services))]
pub fn generate_manifest(
    services: &ServiceContainer,
    dir: &Path,
    output: &Path,
) -> CliResult<usize> {
    let entries = scan_logo_dir(dir)?;
    write_json_pretty(output, &entries)?;
    info!("Manifest written to {}", output.display());
    eprintln!(
        "Generated manifest with {} logos: {}",
        entries.len(),
        output.display().to_string().green()
    );
    if entries.len() != services.logo_catalog.len() {
        eprintln!("Restart to pick up the new manifest");
    }
    Ok(entries.len())
}

/// Filters applied by the `collections` listing
#[derive(Debug, Default)]
pub struct CollectionFilter<'a> {
    pub public: bool,
    pub featured: bool,
    pub search: Option<&'a str>,
    pub tag: Option<&'a str>,
}

pub fn filter_collections(services: &ServiceContainer, filter: &CollectionFilter) -> Vec<Collection> {
    let catalog = &services.collection_catalog;
    let base = if filter.featured {
        catalog.featured_collections()
    } else if filter.public {
        catalog.public_collections()
    } else {
        catalog.collections()
    };

    base.into_iter()
        .filter(|c| filter.search.map_or(true, |term| c.matches(term)))
        .filter(|c| filter.tag.map_or(true, |tag| c.has_tag(tag)))
        .collect()
}

#[instrument(skip(out, services))]
pub fn collections<W: Write>(
    out: &mut W,
    services: &ServiceContainer,
    filter: &CollectionFilter,
    json: bool,
) -> CliResult<()> {
    let found = filter_collections(services, filter);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&found)?)?;
        return Ok(());
    }
    if found.is_empty() {
        eprintln!("No collections found");
        return Ok(());
    }
    write_collections(out, &found)?;
    Ok(())
}

pub fn collection<W: Write>(out: &mut W, services: &ServiceContainer, id: &str) -> CliResult<()> {
    let detail = services
        .collection_catalog
        .collection_with_logos(id, &services.logo_catalog)
        .ok_or_else(|| ApplicationError::CollectionNotFound(id.to_string()))?;
    write_collection_detail(out, &detail)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::error::CliError;
    use crate::domain::logo::ManifestEntry;
    use crate::util::testing::{offline_container, offline_settings};
    use std::fs;
    use tempfile::tempdir;

    fn output_of<F: FnOnce(&mut Vec<u8>) -> CliResult<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn given_league_filter_when_listing_json_then_only_that_league() {
        let temp = tempdir().unwrap();
        let services = offline_container(&offline_settings(temp.path()));

        let text = output_of(|out| logos(out, &services, Some("superleague 2"), None, true));
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|v| v["league"] == "SUPERLEAGUE 2"));
    }

    #[test]
    fn given_catalog_when_listing_leagues_then_priority_order() {
        let temp = tempdir().unwrap();
        let services = offline_container(&offline_settings(temp.path()));

        let text = output_of(|out| leagues(out, &services));
        let names: Vec<&str> = text
            .lines()
            .map(|line| line.split("  ").next().unwrap().trim_end())
            .collect();
        assert_eq!(names[0], "SUPERLEAGUE");
        assert_eq!(names[1], "SUPERLEAGUE 2");
        assert_eq!(names[2], "Γ ΕΘΝΙΚΗ");
        assert_eq!(names[3], "ΕΠΣ ΑΘΗΝΩΝ");
    }

    #[test]
    fn given_missing_team_info_when_requested_then_not_found() {
        let temp = tempdir().unwrap();
        let services = offline_container(&offline_settings(temp.path()));

        let err = team_info(&mut Vec::new(), &services, "aek").unwrap_err();
        assert!(matches!(err, CliError::Application(ApplicationError::TeamNotFound(_))));
    }

    #[test]
    fn given_logo_dir_when_generating_then_manifest_written() {
        let temp = tempdir().unwrap();
        let services = offline_container(&offline_settings(temp.path()));
        let logos_dir = temp.path().join("logos");
        fs::create_dir_all(logos_dir.join("SUPERLEAGUE")).unwrap();
        fs::write(logos_dir.join("SUPERLEAGUE/aris-fc.png"), b"png").unwrap();
        fs::write(logos_dir.join("root.svg"), b"svg").unwrap();
        fs::write(logos_dir.join("notes.txt"), b"txt").unwrap();

        let output = temp.path().join("out/manifest.json");
        let count = generate_manifest(&services, &logos_dir, &output).unwrap();
        assert_eq!(count, 2);

        let written: Vec<ManifestEntry> =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert!(written.iter().any(|e| e.name == "Aris Fc"));
    }

    #[test]
    fn given_featured_filter_when_listing_then_only_public_featured() {
        let temp = tempdir().unwrap();
        let services = offline_container(&offline_settings(temp.path()));

        let featured = filter_collections(
            &services,
            &CollectionFilter {
                featured: true,
                ..Default::default()
            },
        );
        assert!(!featured.is_empty());
        assert!(featured.iter().all(|c| c.is_featured() && c.is_public));
    }

    #[test]
    fn given_unknown_collection_when_shown_then_not_found() {
        let temp = tempdir().unwrap();
        let services = offline_container(&offline_settings(temp.path()));
        let err = collection(&mut Vec::new(), &services, "nope").unwrap_err();
        assert!(matches!(
            err,
            CliError::Application(ApplicationError::CollectionNotFound(_))
        ));
    }
}
