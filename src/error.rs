//! Error kinds raised by the resolution and installation engine.
//!
//! Engine functions return `anyhow::Result`; the failures below are the
//! domain errors at the root of those chains, so callers can recover the
//! kind with `err.downcast_ref::<PmError>()`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PmError {
    /// Non-2xx response or transport failure while downloading.
    #[error("Cannot download {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The installation root could not be determined.
    #[error("Cannot determine installation root: {0}")]
    Resolution(String),

    /// The requested (name, branch) pair is missing from the catalog.
    #[error("{category} <{name}> with branch <{branch}> not found on index:\n{known}")]
    NotAvailable {
        category: String,
        name: String,
        branch: String,
        known: String,
    },

    #[error("{category} {name} already installed; uninstall or use the '--replace' flag")]
    AlreadyInstalled { category: String, name: String },

    #[error("{category} {name} not installed")]
    NotInstalled { category: String, name: String },

    /// A sidecar descriptor was expected on disk but is absent.
    #[error("Descriptor not found at {0:?}")]
    NotFound(PathBuf),

    #[error("Unknown url-type '{0}', don't know how to install")]
    UnsupportedStrategy(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Filesystem error at {path:?}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// A delegated shell, installer or VCS command exited unsuccessfully.
    #[error("Command '{command}' failed with {status}: {stderr}")]
    ExternalCommand {
        command: String,
        status: String,
        stderr: String,
    },
}

impl PmError {
    pub(crate) fn fetch(url: &str, reason: impl ToString) -> Self {
        PmError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, error: &anyhow::Error) -> Self {
        PmError::Filesystem {
            path: path.into(),
            reason: format!("{:#}", error),
        }
    }
}

/// Find the `PmError` at the root of an `anyhow` chain, if any.
pub fn kind_of(error: &anyhow::Error) -> Option<&PmError> {
    error.downcast_ref::<PmError>()
}
