//! Installed packages within one category directory.
//!
//! Layout: `<root>/<category>s/<name>.yaml` (sidecar descriptor) and
//! `<root>/<category>s/<name>.py` (payload). A package is installed exactly
//! when its sidecar descriptor exists.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::error::PmError;
use crate::runtime::Runtime;

use super::LocalMetadata;

pub const DESCRIPTOR_EXT: &str = "yaml";
pub const PAYLOAD_EXT: &str = "py";
pub(crate) const DESCRIPTOR_SUFFIX: &str = ".yaml";
pub(crate) const PAYLOAD_SUFFIX: &str = ".py";

pub struct PackageRepository<'a, R: Runtime + ?Sized> {
    runtime: &'a R,
    dir: PathBuf,
}

impl<'a, R: Runtime + ?Sized> PackageRepository<'a, R> {
    /// Create a repository over an already resolved category directory.
    pub fn new(runtime: &'a R, dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns: `<dir>/<name>.yaml`
    pub fn descriptor_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, DESCRIPTOR_EXT))
    }

    /// Returns: `<dir>/<name>.py`
    pub fn payload_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, PAYLOAD_EXT))
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.runtime.is_file(&self.descriptor_path(name))
    }

    /// Read and normalize the sidecar descriptor of an installed package.
    pub fn load_metadata(&self, name: &str) -> Result<LocalMetadata> {
        let path = self.descriptor_path(name);
        if !self.runtime.is_file(&path) {
            return Err(PmError::NotFound(path).into());
        }
        let raw = self
            .runtime
            .read_to_string(&path)
            .map_err(|e| PmError::filesystem(&path, &e))?;
        LocalMetadata::parse(&raw).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Remove the descriptor and payload of a package.
    ///
    /// Both removals must succeed; a missing payload is an error rather than
    /// a half-removed installation reported as success.
    pub fn remove_files(&self, name: &str) -> Result<()> {
        for path in [self.descriptor_path(name), self.payload_path(name)] {
            debug!("Removing {:?}", path);
            self.runtime
                .remove_file(&path)
                .map_err(|e| PmError::filesystem(&path, &e))?;
        }
        Ok(())
    }

    /// Names of all installed packages, sorted.
    pub fn installed_names(&self) -> Result<Vec<String>> {
        if !self.runtime.is_dir(&self.dir) {
            return Ok(vec![]);
        }

        let mut names: Vec<String> = self
            .runtime
            .read_dir(&self.dir)
            .map_err(|e| PmError::filesystem(&self.dir, &e))?
            .into_iter()
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(DESCRIPTOR_EXT))
            .filter(|path| self.runtime.is_file(path))
            .filter_map(|path| match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => Some(stem.to_string()),
                None => {
                    warn!("Skipping descriptor with non UTF-8 name: {:?}", path);
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }
}
