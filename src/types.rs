// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! # Particle types
//!
//! Type labels are resolved once to dense integer ids so that per-step lookups
//! index into flat matrices rather than hashing strings.

use crate::{Error, Result};
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Dense index of a particle type
pub type TypeId = usize;

/// Unordered pair of particle types
///
/// The pair is stored canonically with the smaller id first,
/// so `(a, b)` and `(b, a)` compare and hash equal.
///
/// ~~~
/// use dipolar::types::TypePair;
/// assert_eq!(TypePair::new(3, 1), TypePair::new(1, 3));
/// assert_eq!(TypePair::new(3, 1).ids(), (1, 3));
/// ~~~
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TypePair(TypeId, TypeId);

impl TypePair {
    pub fn new(a: TypeId, b: TypeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
    /// Canonical ids, smallest first
    pub const fn ids(&self) -> (TypeId, TypeId) {
        (self.0, self.1)
    }
    /// Index into an upper triangular matrix of `n` types, including the diagonal
    pub(crate) const fn triangular_index(&self, n: usize) -> usize {
        let (i, j) = (self.0, self.1);
        i * n - i * (i + 1) / 2 + j
    }
}

impl Display for TypePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Number of unordered type pairs, including self pairs, for `n` types
pub(crate) const fn num_pairs(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Registry of particle type labels
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TypeRegistry {
    labels: Vec<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an ordered list of unique labels
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for label in labels {
            registry.register(label);
        }
        registry
    }

    /// Register a label and return its id; an existing label returns the existing id
    pub fn register(&mut self, label: impl Into<String>) -> TypeId {
        let label = label.into();
        self.find(&label).unwrap_or_else(|| {
            self.labels.push(label);
            self.labels.len() - 1
        })
    }

    /// Look up the id of a label
    pub fn find(&self, label: &str) -> Option<TypeId> {
        self.labels.iter().position(|l| l == label)
    }

    /// Look up the id of a label or fail with [`Error::UnknownType`]
    pub fn id(&self, label: &str) -> Result<TypeId> {
        self.find(label)
            .ok_or_else(|| Error::UnknownType(label.to_string()))
    }

    /// Label of a type id
    pub fn label(&self, id: TypeId) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Canonical pair from two labels
    pub fn pair(&self, a: &str, b: &str) -> Result<TypePair> {
        Ok(TypePair::new(self.id(a)?, self.id(b)?))
    }

    /// Labels in id order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All canonical type pairs, including self pairs, in ascending id order
    pub fn pairs(&self) -> impl Iterator<Item = TypePair> + '_ {
        (0..self.len())
            .combinations_with_replacement(2)
            .map(|ids| TypePair::new(ids[0], ids[1]))
    }

    /// Labels of both types in a pair
    pub(crate) fn pair_labels(&self, pair: TypePair) -> (String, String) {
        let (a, b) = pair.ids();
        let name = |id| self.label(id).map_or_else(|| id.to_string(), str::to_string);
        (name(a), name(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut types = TypeRegistry::new();
        assert_eq!(types.register("A"), 0);
        assert_eq!(types.register("B"), 1);
        assert_eq!(types.register("A"), 0);
        assert_eq!(types.len(), 2);
        assert_eq!(types.label(1), Some("B"));
        assert!(matches!(types.id("C"), Err(Error::UnknownType(_))));
    }

    #[test]
    fn test_pairs_cover_upper_triangle() {
        let types = TypeRegistry::from_labels(["A", "B", "C"]);
        let pairs: Vec<_> = types.pairs().collect();
        assert_eq!(pairs.len(), num_pairs(3));
        assert_eq!(pairs.first(), Some(&TypePair::new(0, 0)));
        assert_eq!(pairs.last(), Some(&TypePair::new(2, 2)));
        // triangular indices are dense and unique
        let indices: Vec<_> = pairs.iter().map(|p| p.triangular_index(3)).collect();
        assert_eq!(indices, (0..num_pairs(3)).collect::<Vec<_>>());
    }

    #[test]
    fn test_pair_is_unordered() {
        let types = TypeRegistry::from_labels(["A", "B"]);
        assert_eq!(types.pair("A", "B").unwrap(), types.pair("B", "A").unwrap());
        assert_eq!(
            types.pair_labels(TypePair::new(1, 0)),
            ("A".to_string(), "B".to_string())
        );
    }
}
