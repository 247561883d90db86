//! Module identifiers and link metadata
//!
//! Module ids are canonicalized exactly once, at construction: uppercase
//! ASCII, so content can write `"damage_boost"` or `"DAMAGE_BOOST"` and
//! lookups never re-fold case.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier of an upgrade module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Topology tag on a module link. Descriptive metadata for guide/UI
/// surfaces; no engine algorithm consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkTag {
    #[default]
    Plain,
    Triangle,
    Chain,
    Ring,
    Gear,
    Symmetric,
}

/// An edge between two required modules of a synergy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLink {
    pub from: ModuleId,
    pub to: ModuleId,
    pub tag: LinkTag,
}

impl ModuleLink {
    pub fn new(from: impl AsRef<str>, to: impl AsRef<str>, tag: LinkTag) -> Self {
        Self {
            from: ModuleId::new(from),
            to: ModuleId::new(to),
            tag,
        }
    }
}

impl fmt::Display for ModuleLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{:?}]-> {}", self.from, self.tag, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_canonicalized_once() {
        assert_eq!(ModuleId::new("damage_boost").as_str(), "DAMAGE_BOOST");
        assert_eq!(ModuleId::new("Damage_Boost"), ModuleId::new("DAMAGE_BOOST"));
    }

    #[test]
    fn test_link_folds_endpoints() {
        let link = ModuleLink::new("parry", "reflex", LinkTag::Triangle);
        assert_eq!(link.from.as_str(), "PARRY");
        assert_eq!(link.to.as_str(), "REFLEX");
    }
}
