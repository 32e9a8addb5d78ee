// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::services::tag_transfer::ExportFormat;
use crate::domain::quiz::{DifficultySetting, QuizMode};

#[derive(Parser, Debug)]
#[command(name = "gflogos", author, version, about, long_about = None)]
/// Catalog and tag Greek football club logos
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print the default configuration and exit
    #[arg(long = "generate-config")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the local file-save server
    Serve {
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Probe the file-save server
    Status,
    /// Show the tags of a team, or every team's tags
    Tags {
        /// Team id, e.g. paok
        team: Option<String>,
    },
    /// List teams carrying any of the given tags
    Teams {
        #[arg(short = 't', long = "tag", help = "tag to match, repeatable (OR)")]
        tags: Vec<String>,
    },
    /// List logos from the manifest
    Logos {
        #[arg(short, long, help = "only this league")]
        league: Option<String>,

        #[arg(short, long, help = "substring of the team name")]
        search: Option<String>,

        #[arg(long = "json", help = "output as json")]
        json: bool,
    },
    /// List leagues in display order
    Leagues,
    /// Show the descriptive record of a team
    Info {
        /// Team id, e.g. aek
        team: String,
    },
    /// Scan a logo directory and write the manifest
    Manifest {
        /// Directory holding league subdirectories of logos
        dir: PathBuf,

        #[arg(short, long, help = "output file (default from config)")]
        output: Option<PathBuf>,
    },
    /// List collections
    Collections {
        #[arg(long, conflicts_with = "featured", help = "only public collections")]
        public: bool,

        #[arg(long, help = "only featured collections")]
        featured: bool,

        #[arg(short, long, help = "match name, description or tags")]
        search: Option<String>,

        #[arg(short, long, help = "exact collection tag")]
        tag: Option<String>,

        #[arg(long = "json", help = "output as json")]
        json: bool,
    },
    /// Show one collection with its logos
    Collection {
        id: String,
    },
    /// Export the committed tag data
    Export {
        #[arg(short, long, help = "output file (default: export dir)")]
        output: Option<PathBuf>,

        #[arg(short, long, default_value_t = ExportFormat::Envelope)]
        format: ExportFormat,
    },
    /// Replace the committed tag data from a file
    Import {
        file: PathBuf,

        #[arg(short, long, help = "admin password")]
        password: String,
    },
    /// Interactive admin shell for tagging and collections
    Admin,
    /// Play the logo quiz
    Quiz {
        #[arg(short, long, default_value_t = QuizMode::GuessTeam)]
        mode: QuizMode,

        #[arg(short, long, default_value_t = DifficultySetting::Medium)]
        difficulty: DifficultySetting,

        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        #[arg(long, help = "show statistics and exit")]
        stats: bool,
    },
    /// Generate shell completions
    Completion {
        /// Shell: bash, zsh, fish
        shell: String,
    },
}
