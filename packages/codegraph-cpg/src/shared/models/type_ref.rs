//! Opaque type values
//!
//! Type inference lives outside this crate. Inside the graph a type is only
//! a comparison key: two nodes have the same type iff their `TypeRef`s are equal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// Not known (yet), or invalidated by a patch
    #[default]
    Unknown,
    /// A named type as reported by a frontend or a resolution pass
    Named(String),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeRef::Unknown)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Unknown => None,
            TypeRef::Named(name) => Some(name),
        }
    }

    /// Compatibility used for call signatures: an unknown type matches anything.
    pub fn accepts(&self, other: &TypeRef) -> bool {
        self.is_unknown() || other.is_unknown() || self == other
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Unknown => write!(f, "<unknown>"),
            TypeRef::Named(name) => write!(f, "{}", name),
        }
    }
}
