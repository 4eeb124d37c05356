//! Plant Model

use serde::{Deserialize, Serialize};

/// Production line identifier (e.g. `NPK1`)
///
/// Serialized as the bare tag string. Tags are compared exactly; the tag is
/// also the partition suffix, so it is never case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plant(String);

impl Plant {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Plant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Plant {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Plant {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl AsRef<str> for Plant {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
