// src/cli/server_commands.rs
use std::net::{Ipv4Addr, SocketAddr};

use crossterm::style::Stylize;
use tracing::instrument;

use crate::cli::error::CliResult;
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::server::{self, state::ServerState};

/// Loopback address the file-save server binds to
pub fn bind_address(settings: &Settings, port: Option<u16>) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, port.unwrap_or(settings.server.port)))
}

/// Runs the file-save server in the foreground until interrupted
#[instrument(skip(settings))]
pub fn serve(settings: &Settings, port: Option<u16>) -> CliResult<()> {
    let address = bind_address(settings, port);
    eprintln!(
        "Team tags server on {} (Ctrl+C to stop)",
        format!("http://{}", address).green()
    );
    server::run(address, ServerState::from_opts(&settings.server))?;
    Ok(())
}

/// Probes the configured server once
pub fn status(services: &ServiceContainer, settings: &Settings) -> CliResult<bool> {
    if services.remote.is_none() {
        eprintln!("{}", "Remote persistence disabled (empty server_url)".yellow());
        return Ok(false);
    }
    let online = services.server_status.check();
    if online {
        println!("{} {}", settings.server_url, "online".green());
    } else {
        println!("{} {}", settings.server_url, "offline".red());
    }
    Ok(online)
}
