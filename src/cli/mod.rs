// src/cli/mod.rs
use std::io;

use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::config::Settings;
use crate::domain::quiz::QuizSettings;
use crate::infrastructure::di::ServiceContainer;

pub mod admin_shell;
pub mod args;
pub mod catalog_commands;
pub mod completion;
pub mod display;
pub mod error;
pub mod quiz_commands;
pub mod server_commands;
pub mod tag_commands;

pub fn execute_command(cli: Cli, services: &ServiceContainer, settings: &Settings) -> CliResult<()> {
    if cli.generate_config {
        println!("{}", crate::config::generate_default_config());
        return Ok(());
    }
    let mut stdout = io::stdout();

    match cli.command {
        Some(Commands::Serve { port }) => server_commands::serve(settings, port),
        Some(Commands::Status) => server_commands::status(services, settings).map(|_| ()),
        Some(Commands::Tags { team }) => {
            tag_commands::show_tags(&mut stdout, services, team.as_deref())
        }
        Some(Commands::Teams { tags }) => tag_commands::teams_with_tags(&mut stdout, services, &tags),
        Some(Commands::Logos {
            league,
            search,
            json,
        }) => catalog_commands::logos(
            &mut stdout,
            services,
            league.as_deref(),
            search.as_deref(),
            json,
        ),
        Some(Commands::Leagues) => catalog_commands::leagues(&mut stdout, services),
        Some(Commands::Info { team }) => catalog_commands::team_info(&mut stdout, services, &team),
        Some(Commands::Manifest { dir, output }) => {
            let output = output.unwrap_or_else(|| settings.catalog.manifest_path.clone());
            catalog_commands::generate_manifest(services, &dir, &output).map(|_| ())
        }
        Some(Commands::Collections {
            public,
            featured,
            search,
            tag,
            json,
        }) => {
            let filter = catalog_commands::CollectionFilter {
                public,
                featured,
                search: search.as_deref(),
                tag: tag.as_deref(),
            };
            catalog_commands::collections(&mut stdout, services, &filter, json)
        }
        Some(Commands::Collection { id }) => catalog_commands::collection(&mut stdout, services, &id),
        Some(Commands::Export { output, format }) => {
            tag_commands::export(services, output.as_deref(), format).map(|_| ())
        }
        Some(Commands::Import { file, password }) => tag_commands::import(services, &file, &password),
        Some(Commands::Admin) => admin_shell::AdminShell::new(services, settings).run(),
        Some(Commands::Quiz {
            mode,
            difficulty,
            count,
            stats,
        }) => {
            if stats {
                return quiz_commands::show_stats(&mut stdout, services);
            }
            let quiz_settings = QuizSettings {
                mode,
                difficulty,
                question_count: count,
                time_limit: None,
            };
            quiz_commands::play_interactive(services, &quiz_settings)
        }
        Some(Commands::Completion { shell }) => handle_completion(shell),
        None => Ok(()),
    }
}

fn handle_completion(shell: String) -> CliResult<()> {
    // Write a brief comment to stderr about what's being output
    match shell.to_lowercase().as_str() {
        "bash" => {
            eprintln!("# Outputting bash completion script for gflogos");
            eprintln!("# To use, run one of:");
            eprintln!("# - eval \"$(gflogos completion bash)\"                      # one-time use");
            eprintln!("# - gflogos completion bash >> ~/.bashrc                     # add to bashrc");
            eprintln!(
                "# - gflogos completion bash > /etc/bash_completion.d/gflogos # system-wide install"
            );
            eprintln!("#");
        }
        "zsh" => {
            eprintln!("# Outputting zsh completion script for gflogos");
            eprintln!("# To use, run one of:");
            eprintln!("# - eval \"$(gflogos completion zsh)\"                 # one-time use");
            eprintln!("# - gflogos completion zsh > ~/.zfunc/_gflogos         # save to fpath directory");
            eprintln!("# - echo 'autoload -U compinit && compinit' >> ~/.zshrc # load completions");
            eprintln!("#");
        }
        "fish" => {
            eprintln!("# Outputting fish completion script for gflogos");
            eprintln!("# To use, run one of:");
            eprintln!("# - gflogos completion fish | source                                  # one-time use");
            eprintln!("# - gflogos completion fish > ~/.config/fish/completions/gflogos.fish # permanent install");
            eprintln!("#");
        }
        _ => {}
    }

    match completion::generate_completion(&shell) {
        Ok(_) => Ok(()),
        Err(e) => Err(error::CliError::CommandFailed(format!(
            "Failed to generate completion script: {}",
            e
        ))),
    }
}
