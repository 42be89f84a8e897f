use anyhow::Result;
use log::{debug, warn};
use serde_yaml::{Mapping, Value};

use crate::error::PmError;

use super::{Descriptor, Index};

pub const DEFAULT_BRANCH: &str = "default";

const NAME_KEY: &str = "name";
const BRANCHES_KEY: &str = "branches";
const BRANCH_KEY: &str = "branch";

/// Parse raw catalog YAML into an [`Index`].
///
/// A record without `branches` behaves exactly like one with
/// `branches: [{branch: default}]`.
#[tracing::instrument(skip(raw))]
pub fn parse_index(raw: &str) -> Result<Index> {
    let document: Value = serde_yaml::from_str(raw)
        .map_err(|e| PmError::InvalidCatalog(format!("not valid YAML: {}", e)))?;

    let records = match document {
        Value::Sequence(records) => records,
        Value::Null => Vec::new(),
        _ => return Err(invalid("the catalog must be a sequence of records").into()),
    };

    let mut index = Index::new();
    for (position, record) in records.into_iter().enumerate() {
        let Value::Mapping(mut fields) = record else {
            return Err(invalid(format!("record #{} is not a mapping", position + 1)).into());
        };

        let name = fields
            .shift_remove(NAME_KEY)
            .as_ref()
            .and_then(scalar_string)
            .ok_or_else(|| invalid(format!("record #{} has no name", position + 1)))?;

        for branch in take_branches(&mut fields, &name)? {
            let Value::Mapping(mut overrides) = branch else {
                return Err(invalid(format!("a branch of '{}' is not a mapping", name)).into());
            };
            let branch_name = overrides
                .shift_remove(BRANCH_KEY)
                .as_ref()
                .and_then(scalar_string)
                .ok_or_else(|| invalid(format!("a branch of '{}' has no branch name", name)))?;

            let descriptor = Descriptor::merge(&fields, overrides);
            debug!("Indexed {} ({}) as {}", name, branch_name, descriptor.url_type());
            if index.insert(name.clone(), branch_name.clone(), descriptor).is_some() {
                warn!("Duplicate catalog entry {} ({}), keeping the last one", name, branch_name);
            }
        }
    }

    Ok(index)
}

fn take_branches(fields: &mut Mapping, name: &str) -> Result<Vec<Value>> {
    match fields.shift_remove(BRANCHES_KEY) {
        None | Some(Value::Null) => {
            let mut default = Mapping::new();
            default.insert(BRANCH_KEY.into(), DEFAULT_BRANCH.into());
            Ok(vec![Value::Mapping(default)])
        }
        Some(Value::Sequence(branches)) => Ok(branches),
        Some(_) => Err(invalid(format!("branches of '{}' must be a sequence", name)).into()),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn invalid(message: impl Into<String>) -> PmError {
    PmError::InvalidCatalog(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind_of;
    use crate::index::UrlType;

    #[test]
    fn test_implicit_default_branch_is_equivalent() {
        let implicit = parse_index("- name: X\n  url: U\n").unwrap();
        let explicit = parse_index("- name: X\n  url: U\n  branches:\n    - branch: default\n").unwrap();

        assert_eq!(implicit, explicit);
        assert_eq!(implicit.len(), 1);
        let descriptor = implicit.get("X", DEFAULT_BRANCH).unwrap();
        assert_eq!(descriptor.url(), "U");
        assert_eq!(descriptor.url_type(), UrlType::Simple);
    }

    #[test]
    fn test_branches_override_package_fields() {
        let raw = "\
- name: pandoc-eqnos
  url: https://x/eqnos.yaml
  branches:
    - branch: default
      url-type: pip
      url: ''
    - branch: dev
      url: git://github.com/tomduck/pandoc-eqnos.git
      url-type: packageManager
";
        let index = parse_index(raw).unwrap();
        assert_eq!(index.len(), 2);

        let default = index.get("pandoc-eqnos", "default").unwrap();
        assert_eq!(default.url_type(), UrlType::PackageManager);
        assert_eq!(default.url(), "");

        let dev = index.get("pandoc-eqnos", "dev").unwrap();
        assert_eq!(dev.url(), "git://github.com/tomduck/pandoc-eqnos.git");
        assert_eq!(dev.url_type(), UrlType::PackageManager);
    }

    #[test]
    fn test_branch_overrides_do_not_leak_between_branches() {
        let raw = "\
- name: crossref
  branches:
    - branch: dev
      url: https://x/dev/crossref.yaml
      url-type: simple
    - branch: stable
";
        let index = parse_index(raw).unwrap();
        let stable = index.get("crossref", "stable").unwrap();
        assert_eq!(stable.url(), "");
        assert_eq!(stable.url_type(), UrlType::Simple);
        assert!(stable.get("branch").is_none());
        assert!(stable.get("name").is_none());
    }

    #[test]
    fn test_keys_and_unknown_strategy_preserved() {
        let raw = "\
- name: b
  url-type: ftp
- name: a
  url: https://x/a.yaml
";
        let index = parse_index(raw).unwrap();
        let keys: Vec<_> = index.keys().collect();
        assert_eq!(keys, vec![("a", "default"), ("b", "default")]);
        assert_eq!(index.get("b", "default").unwrap().url_type(), UrlType::Other("ftp".into()));
        assert!(!index.contains("a", "dev"));
    }

    #[test]
    fn test_empty_catalog() {
        assert!(parse_index("").unwrap().is_empty());
        assert!(parse_index("[]").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_catalogs() {
        for raw in [
            "name: not-a-list\n",
            "- just a string\n",
            "- url: https://x/a.yaml\n",
            "- name: a\n  branches: dev\n",
            "- name: a\n  branches:\n    - url: x\n",
            "- name: [unclosed\n",
        ] {
            let err = parse_index(raw).unwrap_err();
            assert!(
                matches!(kind_of(&err), Some(PmError::InvalidCatalog(_))),
                "expected invalid catalog for {:?}, got {:?}",
                raw,
                err
            );
        }
    }
}
