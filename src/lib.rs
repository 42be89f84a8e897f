pub mod application;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod index;
pub mod package;
pub mod paths;
pub mod process;
pub mod runtime;
