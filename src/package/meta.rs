use anyhow::Result;
use serde_yaml::{Mapping, Value};
use std::fmt;

use crate::error::PmError;
use crate::http::HttpClient;

use super::repository::DESCRIPTOR_SUFFIX;

/// Version of an installed package, normalized from a dotted string.
///
/// Anything that is not exactly three dot-separated non-negative integers
/// normalizes to `0.0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub u64, pub u64, pub u64);

impl Version {
    pub fn parse(raw: &str) -> Option<Version> {
        let parts = raw
            .trim()
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [major, minor, patch] => Some(Version(*major, *minor, *patch)),
            _ => None,
        }
    }

    /// Normalize the `version` value of a descriptor.
    pub fn normalize(value: Option<&Value>) -> Version {
        value
            .and_then(Value::as_str)
            .and_then(Version::parse)
            .unwrap_or_default()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}

/// Sidecar descriptor of an installed package.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMetadata {
    pub fields: Mapping,
    pub version: Version,
}

impl LocalMetadata {
    pub const INSTALL_KEY: &'static str = "install";
    pub const UNINSTALL_KEY: &'static str = "uninstall";

    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(raw)
            .map_err(|e| PmError::InvalidCatalog(format!("descriptor is not valid YAML: {}", e)))?;
        let fields = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(
                    PmError::InvalidCatalog("descriptor must be a mapping".to_string()).into(),
                );
            }
        };
        let version = Version::normalize(fields.get("version"));
        Ok(Self { fields, version })
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Command that replaces the default payload download.
    pub fn install_command(&self) -> Option<&str> {
        self.get_str(Self::INSTALL_KEY)
    }

    /// Command that replaces the default file removal.
    pub fn uninstall_command(&self) -> Option<&str> {
        self.get_str(Self::UNINSTALL_KEY)
    }
}

/// Look up the metadata a catalog URL points at without installing it.
///
/// Descriptor URLs are downloaded and parsed; any other URL (a VCS
/// reference, or none at all) yields a synthetic `0.0.0` record.
#[tracing::instrument(skip(http))]
pub async fn fetch_remote_metadata(http: &HttpClient, name: &str, url: &str) -> Result<LocalMetadata> {
    if url.ends_with(DESCRIPTOR_SUFFIX) {
        let raw = http.get_text(url).await?;
        return LocalMetadata::parse(&raw);
    }

    let mut fields = Mapping::new();
    fields.insert("name".into(), name.into());
    fields.insert("url".into(), url.into());
    fields.insert("version".into(), "0.0.0".into());
    Ok(LocalMetadata {
        fields,
        version: Version::default(),
    })
}
