//! Uninstall use case.

use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::error::PmError;
use crate::package::Category;
use crate::paths::{InstallLocation, RootProvider};
use crate::process::{CommandRunner, shell};
use crate::runtime::Runtime;

use super::Installer;

impl<R: Runtime, C: CommandRunner, P: RootProvider> Installer<R, C, P> {
    /// Remove an installed package.
    #[tracing::instrument(skip(self))]
    pub async fn uninstall(
        &self,
        name: &str,
        category: &Category,
        target: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let location = self.locate(target, category).await?;
        self.uninstall_at(name, category, &location).await?;

        if verbose {
            println!("(pandocpm) {} {} uninstalled successfully", category, name);
        }
        Ok(())
    }

    pub(crate) async fn uninstall_at(
        &self,
        name: &str,
        category: &Category,
        location: &InstallLocation,
    ) -> Result<()> {
        let repo = self.repository(location);
        if !repo.is_installed(name) {
            return Err(PmError::NotInstalled {
                category: category.to_string(),
                name: name.to_string(),
            }
            .into());
        }

        let meta = repo.load_metadata(name)?;
        match meta.uninstall_command() {
            Some(command) => {
                // May need elevated privileges; that is up to the command itself
                info!("Running uninstall command of {}: {}", name, command);
                shell(&self.runner, command).await?;
            }
            None => repo.remove_files(name)?,
        }

        info!("{} {} uninstalled", category, name);
        Ok(())
    }
}
