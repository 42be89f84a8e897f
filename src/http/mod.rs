//! HTTP client module for catalog and descriptor downloads.

mod client;

pub use client::HttpClient;
