use serde_yaml::{Mapping, Value};
use std::fmt;

pub const URL_KEY: &str = "url";
pub const URL_TYPE_KEY: &str = "url-type";

/// Installation strategy of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlType {
    /// Download a sidecar descriptor and its companion script.
    Simple,
    /// Delegate to the generic package installer.
    PackageManager,
    /// Unrecognized value, kept so the failure names it at install time.
    Other(String),
}

impl UrlType {
    pub fn as_str(&self) -> &str {
        match self {
            UrlType::Simple => "simple",
            UrlType::PackageManager => "packageManager",
            UrlType::Other(s) => s,
        }
    }
}

impl From<&str> for UrlType {
    fn from(s: &str) -> Self {
        match s {
            "simple" => UrlType::Simple,
            // `pip` is the spelling used by early catalogs
            "packageManager" | "pip" => UrlType::PackageManager,
            other => UrlType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for UrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merged catalog entry for one (package, branch) pair.
///
/// Keys keep catalog order; branch-level keys replace package-level keys of
/// the same name in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    fields: Mapping,
}

impl Descriptor {
    /// Merge branch overrides onto a copy of the package-level fields and
    /// default the strategy to `simple`.
    pub fn merge(package: &Mapping, branch: Mapping) -> Self {
        let mut fields = package.clone();
        for (key, value) in branch {
            fields.insert(key, value);
        }
        if !fields.contains_key(URL_TYPE_KEY) {
            fields.insert(URL_TYPE_KEY.into(), UrlType::Simple.as_str().into());
        }
        Self { fields }
    }

    pub fn fields(&self) -> &Mapping {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Source location; empty when the catalog gives none.
    pub fn url(&self) -> &str {
        self.get(URL_KEY).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn url_type(&self) -> UrlType {
        match self.get(URL_TYPE_KEY) {
            Some(Value::String(s)) => UrlType::from(s.as_str()),
            Some(other) => UrlType::Other(
                serde_yaml::to_string(other)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
            ),
            None => UrlType::Simple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_merge_branch_wins() {
        let package = mapping("url: https://x/a.yaml\nurl-type: simple\nauthor: me\n");
        let branch = mapping("url: git://x/a.git\nurl-type: packageManager\n");

        let descriptor = Descriptor::merge(&package, branch);
        assert_eq!(descriptor.url(), "git://x/a.git");
        assert_eq!(descriptor.url_type(), UrlType::PackageManager);
        assert_eq!(descriptor.get("author").and_then(Value::as_str), Some("me"));

        // Overridden keys stay where the package level put them
        let keys: Vec<&str> = descriptor.fields().keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["url", "url-type", "author"]);
    }

    #[test]
    fn test_merge_does_not_touch_package_fields() {
        let package = mapping("url: https://x/a.yaml\n");
        let _ = Descriptor::merge(&package, mapping("url: https://x/dev.yaml\n"));
        assert_eq!(package.get("url").and_then(Value::as_str), Some("https://x/a.yaml"));
        assert!(!package.contains_key(URL_TYPE_KEY));
    }

    #[test]
    fn test_default_url_type_and_empty_url() {
        let descriptor = Descriptor::merge(&Mapping::new(), Mapping::new());
        assert_eq!(descriptor.url_type(), UrlType::Simple);
        assert_eq!(descriptor.get(URL_TYPE_KEY).and_then(Value::as_str), Some("simple"));
        assert_eq!(descriptor.url(), "");
    }

    #[test]
    fn test_url_type_names() {
        assert_eq!(UrlType::from("pip"), UrlType::PackageManager);
        assert_eq!(UrlType::from("ftp"), UrlType::Other("ftp".into()));
        assert_eq!(UrlType::Other("ftp".into()).to_string(), "ftp");

        let descriptor = Descriptor::merge(&mapping("url-type: 3\n"), Mapping::new());
        assert_eq!(descriptor.url_type(), UrlType::Other("3".into()));
    }
}
