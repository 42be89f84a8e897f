//! Downloads into the installation directory.
//!
//! Remote failures stay [`PmError::Fetch`]; anything that goes wrong on the
//! local side (creating, writing or flushing `dest`) is reported as
//! [`PmError::Filesystem`] for `dest`.

use crate::error::{PmError, kind_of};
use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::Result;
use log::info;
use std::path::Path;

/// Downloads the contents of `url` to `dest`.
#[tracing::instrument(skip(runtime, dest, http_client))]
pub async fn download_file<R: Runtime + ?Sized>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<()> {
    info!("Downloading {} to {:?}...", url, dest);

    let bytes = http_client
        .download_file(url, || runtime.create_file(dest))
        .await
        .map_err(|e| {
            if matches!(kind_of(&e), Some(PmError::Fetch { .. })) {
                e
            } else {
                PmError::filesystem(dest, &e).into()
            }
        })?;

    info!("Downloaded {} bytes to {:?}", bytes, dest);
    Ok(())
}
