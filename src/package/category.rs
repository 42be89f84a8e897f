use std::fmt;
use std::str::FromStr;

/// A package bucket such as `filter` or `template`.
///
/// Categories only namespace packages on disk and in the catalog: the
/// category `filter` lives in `<root>/filters` and its catalog is
/// `filters.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pluralized name used for the installation subdirectory and the
    /// catalog file.
    pub fn plural(&self) -> String {
        format!("{}s", self.0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.contains(['/', '\\']) || s == "." || s == ".." {
            anyhow::bail!("Invalid category '{}'. Expected a name such as 'filter'.", s)
        }
        Ok(Category(s.to_string()))
    }
}
