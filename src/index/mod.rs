//! Remote package catalog.
//!
//! The catalog for a category is a YAML sequence of package records. Each
//! record expands into one [`Descriptor`] per branch, keyed by
//! `(name, branch)`.

mod descriptor;
mod fetch;
mod parse;

use std::collections::BTreeMap;

pub use descriptor::{Descriptor, URL_KEY, URL_TYPE_KEY, UrlType};
pub use fetch::{DEFAULT_INDEX_URL, get_index, index_url_for};
pub use parse::{DEFAULT_BRANCH, parse_index};

/// Catalog lookup table, built once per invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    entries: BTreeMap<(String, String), Descriptor>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, returning the one it replaced.
    pub fn insert(&mut self, name: String, branch: String, descriptor: Descriptor) -> Option<Descriptor> {
        self.entries.insert((name, branch), descriptor)
    }

    pub fn get(&self, name: &str, branch: &str) -> Option<&Descriptor> {
        self.entries.get(&(name.to_string(), branch.to_string()))
    }

    pub fn contains(&self, name: &str, branch: &str) -> bool {
        self.get(name, branch).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .keys()
            .map(|(name, branch)| (name.as_str(), branch.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = ((&str, &str), &Descriptor)> {
        self.entries
            .iter()
            .map(|((name, branch), d)| ((name.as_str(), branch.as_str()), d))
    }

    /// One `name (branch)` per line, for error reports.
    pub fn describe_keys(&self) -> String {
        self.keys()
            .map(|(name, branch)| format!("  {} ({})", name, branch))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
