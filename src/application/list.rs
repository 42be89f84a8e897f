//! Listing of installed packages and of catalog entries.

use std::path::PathBuf;

use anyhow::Result;
use log::{debug, warn};

use crate::index::Index;
use crate::package::{Category, Version};
use crate::paths::RootProvider;
use crate::process::CommandRunner;
use crate::runtime::Runtime;

use super::Installer;

/// An installed package as recorded by its sidecar descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: Version,
}

impl<R: Runtime, C: CommandRunner, P: RootProvider> Installer<R, C, P> {
    /// Installed packages of a category, sorted by name.
    #[tracing::instrument(skip(self))]
    pub async fn installed(&self, category: &Category, target: Option<PathBuf>) -> Result<Vec<InstalledPackage>> {
        let location = self.locate(target, category).await?;
        let repo = self.repository(&location);

        let names = repo.installed_names()?;
        debug!("Found {} installed {}(s)", names.len(), category);

        Ok(names
            .into_iter()
            .map(|name| {
                let version = match repo.load_metadata(&name) {
                    Ok(meta) => meta.version,
                    Err(e) => {
                        warn!("Failed to read descriptor of {}: {:#}", name, e);
                        Version::default()
                    }
                };
                InstalledPackage { name, version }
            })
            .collect())
    }

    /// Everything the catalog of a category offers.
    pub async fn available(&self, category: &Category) -> Result<Index> {
        self.fetch_index(category).await
    }
}
