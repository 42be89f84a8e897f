//! External process delegation.
//!
//! Shell override commands, the generic installer and the document processor
//! are all run through [`CommandRunner`], so tests can substitute a mock.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::process::Stdio;

use crate::error::PmError;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Locate an executable on `PATH`.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run a program to completion and capture its output.
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

pub struct RealCommandRunner;

#[async_trait]
impl CommandRunner for RealCommandRunner {
    #[tracing::instrument(skip(self))]
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    #[tracing::instrument(skip(self))]
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!("Running {} {:?}", program, args);
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PmError::ExternalCommand {
                command: display_command(program, args),
                status: "launch failure".to_string(),
                stderr: e.to_string(),
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn display_command(program: &str, args: &[String]) -> String {
    shell_words::join(std::iter::once(program).chain(args.iter().map(String::as_str)))
}

/// Run a program and turn a non-zero exit into [`PmError::ExternalCommand`].
pub async fn run_checked<C: CommandRunner + ?Sized>(
    runner: &C,
    program: &str,
    args: &[String],
) -> Result<CommandOutput> {
    let output = runner.run(program, args).await?;
    if !output.success() {
        return Err(PmError::ExternalCommand {
            command: display_command(program, args),
            status: output.status_text(),
            stderr: output.stderr.trim_end().to_string(),
        }
        .into());
    }
    Ok(output)
}

/// Split a shell command line and run it, failing on a non-zero exit.
#[tracing::instrument(skip(runner))]
pub async fn shell<C: CommandRunner + ?Sized>(runner: &C, command_line: &str) -> Result<CommandOutput> {
    let mut words = shell_words::split(command_line)
        .with_context(|| format!("Failed to parse command '{}'", command_line))?
        .into_iter();
    let program = words
        .next()
        .ok_or_else(|| anyhow::anyhow!("Empty command cannot be run"))?;
    let args: Vec<String> = words.collect();
    run_checked(runner, &program, &args).await
}
