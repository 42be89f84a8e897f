use anyhow::Result;
use log::debug;
use reqwest::Client;

use crate::{
    http::HttpClient,
    paths::{PandocRootProvider, RootProvider},
    process::{CommandRunner, RealCommandRunner},
    runtime::{RealRuntime, Runtime},
};

/// Document processor queried for its default data directory.
pub const DOCUMENT_PROCESSOR: &str = "pandoc";

/// Generic installer used by `packageManager` catalog entries.
pub const DEFAULT_INSTALLER: &str = "pip";

pub struct Config<R: Runtime, C: CommandRunner, P: RootProvider> {
    pub runtime: R,
    pub http: HttpClient,
    pub runner: C,
    pub root_provider: P,
    /// Catalog URL template, `None` for the public catalog.
    pub index_url: Option<String>,
    pub installer: String,
}

impl Config<RealRuntime, RealCommandRunner, PandocRootProvider<RealCommandRunner>> {
    pub fn new(index_url: Option<String>, installer: Option<String>) -> Result<Self> {
        let client = Client::builder().user_agent("pandocpm-cli").build()?;

        let installer = installer.unwrap_or_else(|| DEFAULT_INSTALLER.to_string());
        debug!("Using index {:?} and installer {}", index_url, installer);

        Ok(Self {
            runtime: RealRuntime,
            http: HttpClient::new(client),
            runner: RealCommandRunner,
            root_provider: PandocRootProvider::new(RealCommandRunner, DOCUMENT_PROCESSOR),
            index_url,
            installer,
        })
    }
}
