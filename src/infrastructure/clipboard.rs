// src/infrastructure/clipboard.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::services::clipboard::ClipboardService;
#[cfg(target_os = "linux")]
use tracing::debug;
use tracing::instrument;

#[cfg(not(target_os = "linux"))]
use arboard::Clipboard;

/// System clipboard, used to hand fallback tag files to the user.
///
/// On Linux the copying process owns the selection, so a CLI that exits right
/// away would lose it. There the text is piped into `wl-copy` (Wayland) or
/// `xclip`/`xsel` (X11), which fork and keep ownership. Elsewhere `arboard`
/// is used directly.
#[derive(Debug, Default)]
pub struct ClipboardServiceImpl;

impl ClipboardServiceImpl {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardService for ClipboardServiceImpl {
    #[instrument(skip(self, text), level = "debug")]
    fn copy_to_clipboard(&self, text: &str) -> DomainResult<()> {
        #[cfg(target_os = "linux")]
        {
            copy_linux(text)
        }

        #[cfg(not(target_os = "linux"))]
        {
            let mut clipboard = Clipboard::new()
                .map_err(|e| DomainError::Other(format!("Failed to initialize clipboard: {}", e)))?;
            clipboard
                .set_text(text)
                .map_err(|e| DomainError::Other(format!("Failed to set clipboard text: {}", e)))
        }
    }
}

#[cfg(target_os = "linux")]
fn copy_linux(text: &str) -> DomainResult<()> {
    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        debug!("Wayland detected, using wl-copy");
        return pipe_into("wl-copy", &[], text).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DomainError::Other(
                    "wl-copy not found. Install wl-clipboard for clipboard support on Wayland."
                        .to_string(),
                )
            } else {
                DomainError::Other(format!("wl-copy failed: {}", e))
            }
        });
    }

    debug!("X11 detected, trying xclip then xsel");
    match pipe_into("xclip", &["-selection", "clipboard"], text) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            match pipe_into("xsel", &["--clipboard", "--input"], text) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DomainError::Other(
                    "No X11 clipboard tool found. Install xclip or xsel.".to_string(),
                )),
                Err(e) => Err(DomainError::Other(format!("xsel failed: {}", e))),
            }
        }
        Err(e) => Err(DomainError::Other(format!("xclip failed: {}", e))),
    }
}

/// Feeds `text` to the stdin of `program`; `NotFound` when it is not installed
#[cfg(target_os = "linux")]
fn pipe_into(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, format!("No stdin pipe for {}", program))
    })?;
    stdin.write_all(text.as_bytes())?;
    drop(stdin); // EOF

    let status = child.wait()?;
    if status.success() {
        debug!("{} accepted {} bytes", program, text.len());
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{} exited with status: {}", program, status),
        ))
    }
}
