//! HTTP client with error classification.
//!
//! Requests are attempted exactly once: a transient failure is reported to
//! the caller as a terminal [`PmError::Fetch`].

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::io::Write;

use crate::error::PmError;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and returns the body as text.
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PmError::fetch(url, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| PmError::fetch(url, e))?;

        let text = response.text().await.map_err(|e| PmError::fetch(url, e))?;
        Ok(text)
    }

    /// Downloads a file from a URL, streaming the body into the writer
    /// returned by `create_writer`. The writer is only created once the
    /// server has answered with a success status.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PmError::fetch(url, e))?;

        let mut response = response
            .error_for_status()
            .map_err(|e| PmError::fetch(url, e))?;

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PmError::fetch(url, e))?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!("Downloaded {} bytes", downloaded_bytes);

        Ok(downloaded_bytes)
    }
}
