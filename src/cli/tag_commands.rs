// src/cli/tag_commands.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use crossterm::style::Stylize;
use tracing::{debug, instrument};

use crate::application::error::ApplicationError;
use crate::application::services::tag_transfer::{export_file, ExportFormat};
use crate::cli::display::{write_logos, write_tag_table, write_team_tags, write_vocabulary};
use crate::cli::error::{CliError, CliResult};
use crate::domain::tag::Tag;
use crate::infrastructure::di::ServiceContainer;

/// One team's tags, or the whole team map followed by the vocabulary
#[instrument(skip(out, services))]
pub fn show_tags<W: Write>(
    out: &mut W,
    services: &ServiceContainer,
    team: Option<&str>,
) -> CliResult<()> {
    let source = services.tag_store.load();
    debug!("Tag data loaded from {}", source);

    match team {
        Some(team_id) => {
            let tags = services.tag_query.tags_for_team(team_id);
            write_team_tags(out, team_id, &tags)?;
        }
        None => {
            let team_tags = services.tag_query.all_team_tags();
            if team_tags.is_empty() {
                eprintln!("No team has tags yet");
            } else {
                write_tag_table(out, &team_tags)?;
                writeln!(out)?;
            }
            write_vocabulary(out, &services.tag_query.all_available_tags())?;
        }
    }
    Ok(())
}

/// Logos whose team carries at least one of `tags`
#[instrument(skip(out, services))]
pub fn teams_with_tags<W: Write>(
    out: &mut W,
    services: &ServiceContainer,
    tags: &[String],
) -> CliResult<()> {
    let tags = tags
        .iter()
        .map(Tag::new)
        .collect::<Result<Vec<_>, _>>()?;
    services.tag_store.load();

    let teams = services
        .tag_query
        .teams_with_any_tag(&tags, services.logo_catalog.all());
    if teams.is_empty() {
        eprintln!("No teams match {}", Tag::format_tags(&tags).yellow());
        return Ok(());
    }
    write_logos(out, &teams)?;
    Ok(())
}

/// Writes the committed snapshot to `output`, or into the export directory
#[instrument(skip(services))]
pub fn export(
    services: &ServiceContainer,
    output: Option<&Path>,
    format: ExportFormat,
) -> CliResult<PathBuf> {
    services.tag_store.load();
    write_export(services, output, format)
}

/// Writes the committed snapshot as it currently is in memory
pub fn write_export(
    services: &ServiceContainer,
    output: Option<&Path>,
    format: ExportFormat,
) -> CliResult<PathBuf> {
    let file = export_file(&services.tag_store.current(), format, Utc::now())?;

    let path = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &file.content)?;
            path.to_path_buf()
        }
        None => services
            .downloads
            .save_download(&file.file_name, &file.content)?,
    };
    eprintln!("Exported tag data to {}", path.display().to_string().green());
    Ok(path)
}

/// Replaces the committed snapshot with the contents of `file`
#[instrument(skip(services, password))]
pub fn import(services: &ServiceContainer, file: &Path, password: &str) -> CliResult<()> {
    if !services.admin_gate.login(password) {
        return Err(ApplicationError::Unauthorized.into());
    }
    let json = fs::read_to_string(file)
        .map_err(|e| CliError::InvalidInput(format!("Cannot read {}: {}", file.display(), e)))?;

    services.tag_store.load();
    if !services.tag_editor.import_data(&json) {
        return Err(CliError::InvalidInput(format!(
            "{} is not a valid tag export",
            file.display()
        )));
    }
    eprintln!("{}", "Tag data imported".green());
    Ok(())
}
