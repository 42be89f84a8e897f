//! Application layer - use cases driven by the CLI.
//!
//! [`Installer`] owns the injected collaborators (file system, HTTP client,
//! process runner, root provider) and implements install, uninstall and the
//! read-only listings on top of them.

mod info;
mod install;
mod list;
mod uninstall;

pub use info::PackageInfo;
pub use install::{InstallOptions, Installer};
pub use list::InstalledPackage;
