//! Catalog lookup of a single package without installing it.

use anyhow::Result;

use crate::error::PmError;
use crate::index::{DEFAULT_BRANCH, Descriptor};
use crate::package::{Category, LocalMetadata, fetch_remote_metadata};
use crate::paths::RootProvider;
use crate::process::CommandRunner;
use crate::runtime::Runtime;

use super::Installer;

#[derive(Debug, Clone)]
pub struct PackageInfo {
    pub name: String,
    pub branch: String,
    pub descriptor: Descriptor,
    pub remote: LocalMetadata,
}

impl<R: Runtime, C: CommandRunner, P: RootProvider> Installer<R, C, P> {
    #[tracing::instrument(skip(self))]
    pub async fn info(&self, name: &str, category: &Category, branch: Option<&str>) -> Result<PackageInfo> {
        let branch = branch.unwrap_or(DEFAULT_BRANCH);
        let index = self.fetch_index(category).await?;

        let descriptor = index
            .get(name, branch)
            .cloned()
            .ok_or_else(|| PmError::NotAvailable {
                category: category.to_string(),
                name: name.to_string(),
                branch: branch.to_string(),
                known: index.describe_keys(),
            })?;

        let remote = fetch_remote_metadata(&self.http, name, descriptor.url()).await?;

        Ok(PackageInfo {
            name: name.to_string(),
            branch: branch.to_string(),
            descriptor,
            remote,
        })
    }
}
