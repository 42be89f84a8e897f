//! Install use case - resolves a (name, branch) against the catalog and
//! installs it into the category directory.
//!
//! Order of operations:
//! - availability in the catalog
//! - conflict with an existing installation (unless replacing)
//! - removal of any existing installation
//! - the strategy selected by the descriptor's `url-type`

use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info};

use crate::config::Config;
use crate::download::download_file;
use crate::error::PmError;
use crate::http::HttpClient;
use crate::index::{DEFAULT_BRANCH, Descriptor, Index, UrlType, get_index};
use crate::package::{Category, DESCRIPTOR_SUFFIX, PAYLOAD_SUFFIX, PackageRepository};
use crate::paths::{InstallLocation, RootProvider, resolve};
use crate::process::{CommandRunner, run_checked, shell};
use crate::runtime::Runtime;

/// Options for the install use case
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Catalog branch, `default` when unset
    pub branch: Option<String>,
    /// Replace an existing installation instead of failing
    pub replace: bool,
    /// Data directory root, asked from the document processor when unset
    pub target: Option<PathBuf>,
    /// Print a confirmation when done
    pub verbose: bool,
}

/// Installation and uninstallation engine.
pub struct Installer<R: Runtime, C: CommandRunner, P: RootProvider> {
    pub runtime: R,
    pub http: HttpClient,
    pub runner: C,
    pub root_provider: P,
    pub index_url: Option<String>,
    pub installer: String,
}

impl<R: Runtime, C: CommandRunner, P: RootProvider> Installer<R, C, P> {
    pub fn new(config: Config<R, C, P>) -> Self {
        Self {
            runtime: config.runtime,
            http: config.http,
            runner: config.runner,
            root_provider: config.root_provider,
            index_url: config.index_url,
            installer: config.installer,
        }
    }

    pub(crate) fn repository(&self, location: &InstallLocation) -> PackageRepository<'_, R> {
        PackageRepository::new(&self.runtime, location.dir.clone())
    }

    pub(crate) async fn locate(&self, target: Option<PathBuf>, category: &Category) -> Result<InstallLocation> {
        resolve(&self.runtime, &self.root_provider, target, category).await
    }

    /// Fetch the catalog of a category from the configured location.
    pub async fn fetch_index(&self, category: &Category) -> Result<Index> {
        get_index(&self.http, category, self.index_url.as_deref()).await
    }

    /// Install `name` from the catalog of `category`.
    ///
    /// `index` lets callers supply an already resolved catalog; when `None`
    /// the catalog is fetched.
    #[tracing::instrument(skip(self, options, index))]
    pub async fn install(
        &self,
        name: &str,
        category: &Category,
        options: &InstallOptions,
        index: Option<&Index>,
    ) -> Result<()> {
        let branch = options.branch.as_deref().unwrap_or(DEFAULT_BRANCH);

        let fetched;
        let index = match index {
            Some(index) => index,
            None => {
                fetched = self.fetch_index(category).await?;
                &fetched
            }
        };

        let location = self.locate(options.target.clone(), category).await?;
        let repo = self.repository(&location);

        let descriptor = index.get(name, branch).ok_or_else(|| PmError::NotAvailable {
            category: category.to_string(),
            name: name.to_string(),
            branch: branch.to_string(),
            known: index.describe_keys(),
        })?;

        if !options.replace && repo.is_installed(name) {
            return Err(PmError::AlreadyInstalled {
                category: category.to_string(),
                name: name.to_string(),
            }
            .into());
        }

        // Replacing is uninstall-then-install so no stale payload survives
        if repo.is_installed(name) {
            info!("Removing existing {} {} before installing", category, name);
            self.uninstall_at(name, category, &location).await?;
        }

        self.apply_strategy(name, descriptor, &repo).await?;

        info!("{} {} installed ({} branch)", category, name, branch);
        if options.verbose {
            println!(
                "(pandocpm) {} {} installed successfully ({} branch)",
                category, name, branch
            );
        }
        Ok(())
    }

    async fn apply_strategy(
        &self,
        name: &str,
        descriptor: &Descriptor,
        repo: &PackageRepository<'_, R>,
    ) -> Result<()> {
        let url = descriptor.url();
        match descriptor.url_type() {
            UrlType::Simple => self.install_simple(name, url, repo).await,
            UrlType::PackageManager if url.is_empty() => {
                debug!("Delegating {} to {}", name, self.installer);
                run_checked(&self.runner, &self.installer, &["install".to_string(), name.to_string()])
                    .await?;
                Ok(())
            }
            UrlType::PackageManager => {
                // The URL must use a scheme the installer understands (git://, https://...)
                debug!("Delegating {} to {} from {}", name, self.installer, url);
                run_checked(
                    &self.runner,
                    &self.installer,
                    &["install".to_string(), format!("git+{}", url)],
                )
                .await?;
                Ok(())
            }
            UrlType::Other(kind) => Err(PmError::UnsupportedStrategy(kind).into()),
        }
    }

    async fn install_simple(&self, name: &str, url: &str, repo: &PackageRepository<'_, R>) -> Result<()> {
        let base = url.strip_suffix(DESCRIPTOR_SUFFIX).ok_or_else(|| {
            PmError::InvalidCatalog(format!(
                "simple entry '{}' must point at a {} descriptor, got '{}'",
                name, DESCRIPTOR_SUFFIX, url
            ))
        })?;
        let script_url = format!("{}{}", base, PAYLOAD_SUFFIX);

        download_file(&self.runtime, url, &repo.descriptor_path(name), &self.http).await?;

        let meta = repo.load_metadata(name)?;
        match meta.install_command() {
            Some(command) => {
                info!("Running install command of {}: {}", name, command);
                shell(&self.runner, command).await?;
            }
            None => {
                download_file(&self.runtime, &script_url, &repo.payload_path(name), &self.http).await?;
            }
        }
        Ok(())
    }
}
