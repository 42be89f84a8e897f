//! Installation path resolution.
//!
//! A package of category `filter` installs into `<root>/filters`. The root is
//! either supplied by the caller or asked from a [`RootProvider`].

mod pandoc;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use std::path::PathBuf;

use crate::error::PmError;
use crate::package::Category;
use crate::runtime::Runtime;

pub use pandoc::{DATA_DIR_PREFIXES, PandocRootProvider, parse_data_dir};

/// Supplies the default installation root when none is given.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RootProvider: Send + Sync {
    async fn default_root(&self) -> Result<PathBuf>;
}

/// A resolved installation location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLocation {
    /// Data directory root (e.g. `~/.local/share/pandoc`).
    pub root: PathBuf,
    /// Category directory under the root (e.g. `<root>/filters`).
    pub dir: PathBuf,
}

/// Resolve the installation directory for a category, creating it if needed.
#[tracing::instrument(skip(runtime, provider))]
pub async fn resolve<R: Runtime + ?Sized, P: RootProvider + ?Sized>(
    runtime: &R,
    provider: &P,
    target: Option<PathBuf>,
    category: &Category,
) -> Result<InstallLocation> {
    let root = match target {
        Some(path) => path,
        None => provider.default_root().await?,
    };

    let dir = root.join(category.plural());

    if !runtime.is_dir(&dir) {
        info!("Folder {:?} does not exist, creating it", dir);
        runtime
            .create_dir_all(&dir)
            .map_err(|e| PmError::filesystem(&dir, &e))?;
    }

    debug!("Data directory: {:?}", dir);
    Ok(InstallLocation { root, dir })
}
