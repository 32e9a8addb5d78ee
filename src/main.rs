// src/main.rs
use gflogos::cli::args::{Cli, Commands};
use gflogos::cli::error::CliError;
use gflogos::config::{load_settings, Settings};
use gflogos::exitcode;
use gflogos::infrastructure::di::ServiceContainer;
use clap::Parser;
use crossterm::style::Stylize;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

#[instrument]
fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        crossterm::style::force_color_output(false);
    }
    let honour_rust_log = matches!(cli.command, Some(Commands::Serve { .. }));
    setup_logging(cli.debug, cli.no_color, honour_rust_log);

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) if cli.config.is_some() => {
            eprintln!("{}: {}", "Failed to load configuration".red(), e);
            std::process::exit(exitcode::USAGE);
        }
        Err(e) => {
            debug!("Failed to load settings: {}. Using defaults.", e);
            Settings::default()
        }
    };

    // Create service container (single composition root)
    let service_container = match ServiceContainer::new(&settings) {
        Ok(container) => container,
        Err(e) => {
            eprintln!("{}: {}", "Failed to create service container".red(), e);
            std::process::exit(exitcode::USAGE);
        }
    };

    match gflogos::cli::execute_command(cli, &service_container, &settings) {
        Ok(()) => {}
        Err(CliError::OperationAborted) => {
            eprintln!("{}", "Aborted".yellow());
            std::process::exit(exitcode::CANCEL);
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(exitcode::USAGE);
        }
    }
}

fn setup_logging(verbosity: u8, no_color: bool, honour_rust_log: bool) {
    debug!("INIT: Attempting logger init from main.rs");

    let env_filter = (honour_rust_log && std::env::var_os("RUST_LOG").is_some())
        .then(EnvFilter::from_default_env);

    let filter = match verbosity {
        _ if env_filter.is_some() => LevelFilter::TRACE,
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Create a noisy module filter
    let noisy_modules = ["reqwest", "hyper_util", "mio", "want", "rustyline"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(filtered_layer)
        .init();

    match filter {
        LevelFilter::INFO => info!("Debug mode: info"),
        LevelFilter::DEBUG => debug!("Debug mode: debug"),
        LevelFilter::TRACE => debug!("Debug mode: trace"),
        _ => {}
    }
}
