use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;

use crate::error::PmError;
use crate::process::{CommandRunner, run_checked};

use super::RootProvider;

/// Line prefixes under which `pandoc --version` reports its data directory.
/// Older releases print the first form, newer ones the second.
pub const DATA_DIR_PREFIXES: [&str; 2] = ["Default user data directory: ", "User data directory: "];

/// Default root taken from the document processor's own report.
pub struct PandocRootProvider<C: CommandRunner> {
    runner: C,
    program: String,
}

impl<C: CommandRunner> PandocRootProvider<C> {
    pub fn new(runner: C, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }
}

#[async_trait]
impl<C: CommandRunner> RootProvider for PandocRootProvider<C> {
    #[tracing::instrument(skip(self))]
    async fn default_root(&self) -> Result<PathBuf> {
        let executable = self.runner.locate(&self.program).ok_or_else(|| {
            PmError::Resolution(format!("Path to {} executable does not exist", self.program))
        })?;
        debug!("Querying {:?} for its data directory", executable);

        let output = run_checked(
            &self.runner,
            &executable.to_string_lossy(),
            &["--version".to_string()],
        )
        .await?;

        parse_data_dir(&output.stdout)
    }
}

/// Extract the data directory from `--version` output. Exactly one line may
/// carry it.
pub fn parse_data_dir(version_output: &str) -> Result<PathBuf> {
    let matches: Vec<&str> = version_output
        .lines()
        .filter_map(|line| {
            DATA_DIR_PREFIXES
                .iter()
                .find_map(|prefix| line.strip_prefix(prefix))
        })
        .collect();

    match matches.as_slice() {
        [dir] if !dir.trim().is_empty() => Ok(PathBuf::from(dir.trim())),
        [] | [_] => Err(PmError::Resolution("no data directory reported".to_string()).into()),
        many => Err(PmError::Resolution(format!(
            "{} data directory lines reported, expected one",
            many.len()
        ))
        .into()),
    }
}
