//! Declared orderings for benchmark identifiers.
//!
//! Result tables must sort identically across runs even though records are
//! appended in discovery order. The sort key is the identifier's position in
//! a declared catalog, never the identifier's lexicographic order.

use std::collections::BTreeMap;

/// An ordered, duplicate-free list of identifiers with ordinal lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    names: Vec<String>,
    ordinals: BTreeMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from the declared name order. Later duplicates are
    /// dropped so every name has exactly one ordinal.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept = Vec::new();
        let mut ordinals = BTreeMap::new();
        for name in names {
            let name = name.into();
            if !ordinals.contains_key(&name) {
                ordinals.insert(name.clone(), kept.len());
                kept.push(name);
            }
        }
        Self {
            names: kept,
            ordinals,
        }
    }

    /// Returns the declared position of `name`, or `None` for unknown names.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.ordinals.get(name).copied()
    }

    /// Sort rank for `name`: declared ordinal, with unknown names ranked
    /// after every declared one so they sort last but deterministically.
    pub fn rank(&self, name: &str) -> usize {
        self.ordinal(name).unwrap_or(self.names.len())
    }

    /// Returns the declared names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True when `name` is declared in this catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.ordinals.contains_key(name)
    }

    /// Number of declared names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no names are declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
