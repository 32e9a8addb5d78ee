// src/cli/completion.rs
use crate::cli::args::Cli;
use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Fish, Zsh},
};
use std::io::{self, Write};
use tracing::{debug, instrument};

/// Writes the completion script for `shell` ("bash", "zsh" or "fish") to `out`.
///
/// ```bash
/// eval "$(gflogos completion bash)"
/// ```
#[instrument(level = "debug", skip(out))]
pub fn write_completion<W: Write>(shell: &str, out: &mut W) -> io::Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    match shell.to_lowercase().as_str() {
        "bash" => {
            debug!("Generating bash completion");
            generate(Bash, &mut cmd, bin_name, out);
            Ok(())
        }
        "zsh" => {
            debug!("Generating zsh completion");
            generate(Zsh, &mut cmd, bin_name, out);
            Ok(())
        }
        "fish" => {
            debug!("Generating fish completion");
            generate(Fish, &mut cmd, bin_name, out);
            Ok(())
        }
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Unsupported shell: {}. Supported shells: bash, zsh, fish",
                shell
            ),
        )),
    }
}

pub fn generate_completion(shell: &str) -> io::Result<()> {
    write_completion(shell, &mut io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(shell: &str) -> String {
        let mut buffer = Vec::new();
        write_completion(shell, &mut buffer).unwrap();
        String::from_utf8_lossy(&buffer).into_owned()
    }

    #[test]
    fn given_bash_when_generated_then_complete_script() {
        let content = completion("bash");
        assert!(content.contains("complete") || content.contains("COMPREPLY"));
        assert!(content.contains("gflogos"));
    }

    #[test]
    fn given_zsh_when_generated_then_compdef_script() {
        let content = completion("ZSH");
        assert!(content.contains("#compdef") || content.contains("_arguments"));
    }

    #[test]
    fn given_fish_when_generated_then_subcommands_listed() {
        let content = completion("fish");
        assert!(content.contains("-c gflogos"));
        assert!(content.contains("collections"));
    }

    #[test]
    fn given_unknown_shell_when_generated_then_invalid_input() {
        let err = write_completion("powershell", &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("Unsupported shell"));
    }
}
