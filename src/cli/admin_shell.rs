// src/cli/admin_shell.rs
//! Interactive admin surface: tag editing with an explicit save step, and
//! collection curation.
//!
//! Edits accumulate as pending changes until `save`; `discard` drops them.
//! Every command that changes state requires an admin login.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::style::Stylize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info, instrument};

use crate::application::error::ApplicationError;
use crate::application::services::tag_transfer::ExportFormat;
use crate::cli::catalog_commands;
use crate::cli::display::{
    write_collections, write_logos, write_publish_report, write_tag_table, write_team_tags,
    write_vocabulary,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::tag_commands::write_export;
use crate::config::Settings;
use crate::domain::collection::{CollectionUpdate, NewCollection};
use crate::domain::tag::Tag;
use crate::infrastructure::di::ServiceContainer;

const HELP: &str = "\
Reading
  tags [TEAM]                 team tags, including pending edits
  vocab                       available tags
  teams TAG[,TAG...]          logos whose team has any of the tags
  logos [SEARCH]              logos matching a name
  pending                     uncommitted edits
  status                      server and session status
  collections                 all collections
  collection ID               one collection with its logos

Tagging (admin)
  add TEAM TAG                assign a tag to a team
  remove TEAM TAG             unassign a tag
  new-tag TAG                 add a tag to the vocabulary
  drop-tag TAG                remove a tag everywhere
  clear-all                   remove every team's tags
  save                        commit pending edits
  discard                     drop pending edits
  export [plain|envelope|backup]
  import FILE                 replace all tag data

Collections (admin)
  col-new NAME                create a public collection
  col-delete ID
  col-add ID LOGO_ID
  col-remove ID LOGO_ID
  col-describe ID TEXT
  col-public ID on|off
  col-feature ID on|off
  col-export [FILE]           write all collections
  col-load [FILE]             replace all collections

Session
  login PASSWORD | logout | help | quit (quit! drops pending edits)";

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellOutcome {
    Continue,
    Quit,
}

pub struct AdminShell<'a> {
    services: &'a ServiceContainer,
    settings: &'a Settings,
}

fn split_first(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (input, ""),
    }
}

fn require_arg<'s>(value: &'s str, usage: &str) -> CliResult<&'s str> {
    if value.is_empty() {
        Err(CliError::InvalidInput(format!("usage: {}", usage)))
    } else {
        Ok(value)
    }
}

fn parse_switch(value: &str) -> CliResult<bool> {
    match value {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        other => Err(CliError::InvalidInput(format!(
            "expected on or off, got '{}'",
            other
        ))),
    }
}

impl<'a> AdminShell<'a> {
    pub fn new(services: &'a ServiceContainer, settings: &'a Settings) -> Self {
        Self { services, settings }
    }

    fn admin(&self) -> CliResult<()> {
        self.services.admin_gate.require_admin()?;
        Ok(())
    }

    fn prompt(&self) -> String {
        let pending = self.services.tag_editor.pending_change_count();
        if pending > 0 {
            format!("gflogos [{} pending]> ", pending)
        } else {
            "gflogos> ".to_string()
        }
    }

    /// Runs one command line
    #[instrument(skip(self, out), level = "debug")]
    pub fn execute<W: Write>(&self, line: &str, out: &mut W) -> CliResult<ShellOutcome> {
        let (command, rest) = split_first(line.trim());
        let editor = &self.services.tag_editor;
        let query = &self.services.tag_query;
        let collections = &self.services.collection_catalog;

        match command {
            "" => {}
            "help" | "?" => writeln!(out, "{}", HELP)?,
            "login" => {
                if self.services.admin_gate.login(rest) {
                    writeln!(out, "{}", "Logged in".green())?;
                } else {
                    writeln!(out, "{}", "Wrong password, try again".red())?;
                }
            }
            "logout" => {
                self.services.admin_gate.logout();
                writeln!(out, "Logged out")?;
            }
            "status" => self.write_status(out)?,

            "tags" if rest.is_empty() => write_tag_table(out, &query.all_team_tags())?,
            "tags" => write_team_tags(out, rest, &query.tags_for_team(rest))?,
            "vocab" => write_vocabulary(out, &query.all_available_tags())?,
            "teams" => {
                let tags = Tag::parse_tags(require_arg(rest, "teams TAG[,TAG...]")?)?;
                let teams = query.teams_with_any_tag(&tags, self.services.logo_catalog.all());
                write_logos(out, &teams)?;
            }
            "logos" => {
                let search = (!rest.is_empty()).then_some(rest);
                write_logos(out, &self.services.logo_catalog.logos(None, search))?;
            }
            "pending" => self.write_pending(out)?,

            "add" | "remove" => {
                self.admin()?;
                let usage = format!("{} TEAM TAG", command);
                let (team, tag) = split_first(require_arg(rest, &usage)?);
                let tag = Tag::new(require_arg(tag, &usage)?)?;
                let changed = if command == "add" {
                    editor.add_tag(team, &tag)
                } else {
                    editor.remove_tag(team, &tag)
                };
                self.write_edit(out, changed)?;
            }
            "new-tag" => {
                self.admin()?;
                let tag = Tag::new(require_arg(rest, "new-tag TAG")?)?;
                let changed = editor.add_available_tag(&tag);
                self.write_edit(out, changed)?;
            }
            "drop-tag" => {
                self.admin()?;
                let tag = Tag::new(require_arg(rest, "drop-tag TAG")?)?;
                let changed = editor.remove_available_tag(&tag);
                self.write_edit(out, changed)?;
            }
            "clear-all" => {
                self.admin()?;
                let changed = editor.clear_all_team_tags();
                self.write_edit(out, changed)?;
            }
            "save" => {
                self.admin()?;
                match editor.commit()? {
                    Some(report) => write_publish_report(out, &report)?,
                    None => writeln!(out, "Nothing to save")?,
                }
            }
            "discard" => {
                self.admin()?;
                let count = editor.pending_change_count();
                editor.discard();
                writeln!(out, "Discarded {} pending changes", count)?;
            }
            "export" => {
                self.admin()?;
                let format = if rest.is_empty() {
                    ExportFormat::Envelope
                } else {
                    rest.parse().map_err(CliError::InvalidInput)?
                };
                let path = write_export(self.services, None, format)?;
                writeln!(out, "Exported to {}", path.display())?;
            }
            "import" => {
                self.admin()?;
                let path = Path::new(require_arg(rest, "import FILE")?);
                let json = std::fs::read_to_string(path).map_err(|e| {
                    CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
                })?;
                if editor.import_data(&json) {
                    writeln!(out, "{}", "Tag data imported".green())?;
                } else {
                    writeln!(out, "{}", "Not a valid tag export, nothing changed".red())?;
                }
            }

            "collections" => write_collections(out, &collections.collections())?,
            "collection" => {
                catalog_commands::collection(out, self.services, require_arg(rest, "collection ID")?)?
            }
            "col-new" => {
                self.admin()?;
                let created = collections.create(NewCollection {
                    name: require_arg(rest, "col-new NAME")?.to_string(),
                    is_public: true,
                    ..Default::default()
                })?;
                writeln!(out, "Created {}", created.id.as_str().blue())?;
            }
            "col-delete" => {
                self.admin()?;
                let id = require_arg(rest, "col-delete ID")?;
                if !collections.delete(id)? {
                    return Err(ApplicationError::CollectionNotFound(id.to_string()).into());
                }
                writeln!(out, "Deleted {}", id)?;
            }
            "col-add" | "col-remove" => {
                self.admin()?;
                let usage = format!("{} ID LOGO_ID", command);
                let (id, logo_id) = split_first(require_arg(rest, &usage)?);
                let logo_id = require_arg(logo_id, &usage)?;
                let changed = if command == "col-add" {
                    collections.add_logo(id, logo_id)?
                } else {
                    collections.remove_logo(id, logo_id)?
                };
                self.write_edit(out, changed)?;
            }
            "col-describe" => {
                self.admin()?;
                let (id, text) = split_first(require_arg(rest, "col-describe ID TEXT")?);
                collections.update(
                    id,
                    CollectionUpdate {
                        description: Some(text.to_string()),
                        ..Default::default()
                    },
                )?;
                writeln!(out, "Updated {}", id)?;
            }
            "col-public" | "col-feature" => {
                self.admin()?;
                let usage = format!("{} ID on|off", command);
                let (id, switch) = split_first(require_arg(rest, &usage)?);
                let on = parse_switch(require_arg(switch, &usage)?)?;
                let changes = if command == "col-public" {
                    CollectionUpdate {
                        is_public: Some(on),
                        ..Default::default()
                    }
                } else {
                    CollectionUpdate {
                        featured: Some(on),
                        ..Default::default()
                    }
                };
                collections.update(id, changes)?;
                writeln!(out, "Updated {}", id)?;
            }
            "col-export" => {
                self.admin()?;
                let path = self.collections_path(rest);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, collections.export_file()?)?;
                writeln!(out, "Collections written to {}", path.display())?;
            }
            "col-load" => {
                self.admin()?;
                let path = self.collections_path(rest);
                let count = collections.load_file(&path)?;
                writeln!(out, "Loaded {} collections from {}", count, path.display())?;
            }

            "quit" | "exit" if editor.has_pending_changes() => {
                writeln!(
                    out,
                    "{}",
                    format!(
                        "{} unsaved changes: `save` or `discard` them, or `quit!` to leave anyway",
                        editor.pending_change_count()
                    )
                    .yellow()
                )?;
            }
            "quit" | "exit" | "quit!" => return Ok(ShellOutcome::Quit),
            other => {
                return Err(CliError::InvalidInput(format!(
                    "unknown command '{}', type help",
                    other
                )))
            }
        }
        Ok(ShellOutcome::Continue)
    }

    fn collections_path(&self, arg: &str) -> PathBuf {
        if arg.is_empty() {
            self.settings.catalog.collections_file.clone()
        } else {
            PathBuf::from(arg)
        }
    }

    fn write_edit<W: Write>(&self, out: &mut W, changed: bool) -> io::Result<()> {
        if changed {
            writeln!(
                out,
                "ok ({} pending)",
                self.services.tag_editor.pending_change_count()
            )
        } else {
            writeln!(out, "{}", "no change".dark_grey())
        }
    }

    fn write_pending<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let editor = &self.services.tag_editor;
        if !editor.has_pending_changes() {
            return writeln!(out, "No pending changes");
        }
        let team_edits = editor.pending_team_edits();
        if !team_edits.is_empty() {
            writeln!(out, "{}", "Team edits".bold())?;
            write_tag_table(out, &team_edits)?;
        }
        if let Some(vocabulary) = editor.pending_available_tags() {
            write_vocabulary(out, &vocabulary)?;
        }
        Ok(())
    }

    fn write_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let server = if self.services.remote.is_none() {
            "disabled".dark_grey()
        } else if self.services.server_status.is_online() {
            "online".green()
        } else {
            "offline".red()
        };
        writeln!(out, "Server:  {}", server)?;
        writeln!(
            out,
            "Admin:   {}",
            if self.services.admin_gate.is_admin() { "yes" } else { "no" }
        )?;
        writeln!(
            out,
            "Pending: {}",
            self.services.tag_editor.pending_change_count()
        )
    }

    fn login_prompt(&self, rl: &mut DefaultEditor) -> CliResult<()> {
        while !self.services.admin_gate.is_admin() {
            let password = rl.readline("Admin password: ")?;
            if self.services.admin_gate.login(password.trim()) {
                info!("Admin logged in");
            } else {
                eprintln!("{}", "Wrong password, try again".red());
            }
        }
        Ok(())
    }

    /// Line-editing loop until `quit` or end of input
    pub fn run(&self) -> CliResult<()> {
        let mut rl = DefaultEditor::new()?;
        let source = self.services.tag_store.load();
        eprintln!("Tag data loaded from {}", source);

        self.login_prompt(&mut rl)?;
        let _poller = self.services.remote.as_ref().map(|_| {
            self.services
                .server_status
                .start(Duration::from_secs(self.settings.health_interval_secs))
        });
        eprintln!("Type {} for commands", "help".bold());

        let mut stdout = io::stdout();
        loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    match self.execute(&line, &mut stdout) {
                        Ok(ShellOutcome::Quit) => break,
                        Ok(ShellOutcome::Continue) => {}
                        Err(e) => eprintln!("{}", e.to_string().red()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    eprintln!("Type quit to leave");
                }
                Err(ReadlineError::Eof) => {
                    if self.services.tag_editor.has_pending_changes() {
                        eprintln!(
                            "{}",
                            "Leaving with unsaved changes; they are discarded".yellow()
                        );
                    }
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        debug!("Admin shell closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{offline_container, offline_settings, tag};
    use tempfile::tempdir;

    struct Session {
        _temp: tempfile::TempDir,
        settings: Settings,
        services: ServiceContainer,
    }

    fn session() -> Session {
        let temp = tempdir().unwrap();
        let settings = offline_settings(temp.path());
        let services = offline_container(&settings);
        Session {
            _temp: temp,
            settings,
            services,
        }
    }

    fn run(shell: &AdminShell, line: &str) -> (CliResult<ShellOutcome>, String) {
        let mut buf = Vec::new();
        let result = shell.execute(line, &mut buf);
        (result, String::from_utf8(buf).unwrap())
    }

    fn admin_shell(s: &Session) -> AdminShell<'_> {
        let shell = AdminShell::new(&s.services, &s.settings);
        let (result, _) = run(&shell, &format!("login {}", s.settings.admin.password));
        result.unwrap();
        assert!(s.services.admin_gate.is_admin());
        shell
    }

    #[test]
    fn given_no_login_when_editing_then_unauthorized() {
        let s = session();
        let shell = AdminShell::new(&s.services, &s.settings);

        let (result, _) = run(&shell, "add paok Derby");
        assert!(matches!(
            result,
            Err(CliError::Application(ApplicationError::Unauthorized))
        ));
        assert!(!s.services.tag_editor.has_pending_changes());

        let (result, text) = run(&shell, "login wrong");
        assert!(result.is_ok());
        assert!(text.contains("Wrong password"));
    }

    #[test]
    fn given_add_then_discard_when_run_then_committed_untouched() {
        let s = session();
        let shell = admin_shell(&s);
        let before = s.services.tag_store.current();

        let (_, text) = run(&shell, "add paok Derby");
        assert!(text.contains("1 pending"));
        assert!(s.services.tag_query.tags_for_team("paok").contains(&tag("Derby")));

        run(&shell, "discard").0.unwrap();
        assert!(!s.services.tag_query.tags_for_team("paok").contains(&tag("Derby")));
        assert_eq!(s.services.tag_store.current(), before);
    }

    #[test]
    fn given_multiword_tag_when_added_and_saved_then_committed() {
        let s = session();
        let shell = admin_shell(&s);

        run(&shell, "add ofi Greek Letters").0.unwrap();
        let (_, text) = run(&shell, "save");
        assert!(text.contains("Changes committed locally."));
        assert!(s
            .services
            .tag_store
            .current()
            .tags_for_team("ofi")
            .contains(&tag("Greek Letters")));
        assert!(!s.services.tag_editor.has_pending_changes());

        let (_, text) = run(&shell, "save");
        assert!(text.contains("Nothing to save"));
    }

    #[test]
    fn given_pending_edits_when_quitting_then_warned_until_forced() {
        let s = session();
        let shell = admin_shell(&s);
        run(&shell, "new-tag Retro").0.unwrap();

        let (result, text) = run(&shell, "quit");
        assert_eq!(result.unwrap(), ShellOutcome::Continue);
        assert!(text.contains("unsaved changes"));

        assert_eq!(run(&shell, "quit!").0.unwrap(), ShellOutcome::Quit);
    }

    #[test]
    fn given_drop_tag_when_saved_then_no_team_keeps_it() {
        let s = session();
        let shell = admin_shell(&s);

        run(&shell, "drop-tag White").0.unwrap();
        run(&shell, "save").0.unwrap();

        let data = s.services.tag_store.current();
        assert!(!data.available_tags.contains(&tag("White")));
        assert!(data.team_tags.values().all(|tags| !tags.contains(&tag("White"))));
    }

    #[test]
    fn given_collection_commands_when_run_then_catalog_updated() {
        let s = session();
        let shell = admin_shell(&s);

        run(&shell, "col-new Island Clubs").0.unwrap();
        let id = s
            .services
            .collection_catalog
            .search("island clubs")
            .pop()
            .unwrap()
            .id;
        assert!(id.starts_with("collection_"));

        run(&shell, &format!("col-add {} ofi", id)).0.unwrap();
        run(&shell, &format!("col-feature {} on", id)).0.unwrap();

        let created = s.services.collection_catalog.collection(&id).unwrap();
        assert_eq!(created.logo_ids, vec!["ofi".to_string()]);
        assert!(created.is_featured());

        let (_, text) = run(&shell, &format!("col-add {} ofi", id));
        assert!(text.contains("no change"));

        let (result, _) = run(&shell, "col-public missing off");
        assert!(matches!(
            result,
            Err(CliError::Application(ApplicationError::CollectionNotFound(_)))
        ));
    }

    #[test]
    fn given_collections_exported_when_loaded_then_round_trip() {
        let s = session();
        let shell = admin_shell(&s);

        run(&shell, "col-export").0.unwrap();
        assert!(s.settings.catalog.collections_file.exists());

        run(&shell, "col-delete big-4-teams").0.unwrap();
        assert!(s.services.collection_catalog.collection("big-4-teams").is_none());

        let (_, text) = run(&shell, "col-load");
        assert!(text.contains("Loaded 5 collections"));
        assert!(s.services.collection_catalog.collection("big-4-teams").is_some());
    }

    #[test]
    fn given_unknown_command_when_run_then_invalid_input() {
        let s = session();
        let shell = AdminShell::new(&s.services, &s.settings);
        assert!(matches!(
            run(&shell, "frobnicate").0,
            Err(CliError::InvalidInput(_))
        ));
        assert!(matches!(run(&shell, "add").0, Err(CliError::Application(_))));
    }

    #[test]
    fn given_export_when_run_then_file_in_export_dir() {
        let s = session();
        let shell = admin_shell(&s);

        let (_, text) = run(&shell, "export plain");
        assert!(text.contains("Exported to"));
        let files: Vec<_> = std::fs::read_dir(&s.settings.export_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("tags-"));

        assert!(matches!(
            run(&shell, "export zip").0,
            Err(CliError::InvalidInput(_))
        ));
    }
}
