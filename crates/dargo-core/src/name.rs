use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A package name in the ecosystem registry.
///
/// Names are opaque identifiers (e.g. `bind.registry.eth`). Ordering is
/// lexicographic and gives every name-keyed map a deterministic iteration
/// order, which the resolver relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for PackageName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn lookup_by_str() {
        let mut map: BTreeMap<PackageName, u32> = BTreeMap::new();
        map.insert(PackageName::from("core.registry.eth"), 1);
        assert_eq!(map.get("core.registry.eth"), Some(&1));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = PackageName::from("a");
        let b = PackageName::from("b");
        assert!(a < b);
    }
}
