//! Package management module
//!
//! This module provides the local side of package management: categories,
//! sidecar descriptors and the files of installed packages.

mod category;
mod meta;
mod repository;

pub use category::Category;
pub use meta::{LocalMetadata, Version, fetch_remote_metadata};
pub use repository::{DESCRIPTOR_EXT, PAYLOAD_EXT, PackageRepository};
pub(crate) use repository::{DESCRIPTOR_SUFFIX, PAYLOAD_SUFFIX};
