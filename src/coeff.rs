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

//! # Pair coefficients
//!
//! Per type pair storage of the dipole coefficients.
//! Entries may be set partially and in any order; completeness is checked
//! only by [`PairCoeff::validate_all`], which the potential calls on commit.

use crate::types::{num_pairs, TypePair, TypeRegistry};
use crate::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coefficients to merge into a pair entry
///
/// Fields left as `None` keep the value already stored in the table.
///
/// ~~~
/// use dipolar::PairCoefficients;
/// let coeffs = PairCoefficients::new().mu(1.0).kappa(0.5);
/// assert_eq!(coeffs.mu, Some(1.0));
/// assert_eq!(coeffs.a, None);
/// ~~~
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct PairCoefficients {
    /// Dipole moment magnitude
    #[cfg_attr(feature = "serde", serde(default, alias = "μ"))]
    pub mu: Option<f64>,
    /// Dipole-dipole coupling strength
    #[cfg_attr(feature = "serde", serde(default, rename = "A"))]
    pub a: Option<f64>,
    /// Charge-dipole coupling strength
    #[cfg_attr(feature = "serde", serde(default, alias = "κ"))]
    pub kappa: Option<f64>,
    /// Cutoff override for this pair
    #[cfg_attr(feature = "serde", serde(default))]
    pub r_cut: Option<f64>,
}

impl PairCoefficients {
    pub fn new() -> Self {
        Self::default()
    }
    pub const fn mu(mut self, mu: f64) -> Self {
        self.mu = Some(mu);
        self
    }
    pub const fn a(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }
    pub const fn kappa(mut self, kappa: f64) -> Self {
        self.kappa = Some(kappa);
        self
    }
    pub const fn r_cut(mut self, r_cut: f64) -> Self {
        self.r_cut = Some(r_cut);
        self
    }
}

/// Stored coefficients of a single type pair
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PairParameters {
    pub mu: Option<f64>,
    pub a: Option<f64>,
    pub kappa: Option<f64>,
    pub r_cut: Option<f64>,
}

impl PairParameters {
    fn merge(&mut self, update: &PairCoefficients) {
        self.mu = update.mu.or(self.mu);
        self.a = update.a.or(self.a);
        self.kappa = update.kappa.or(self.kappa);
        self.r_cut = update.r_cut.or(self.r_cut);
    }

    /// Both `mu` and `kappa` are set
    pub const fn is_complete(&self) -> bool {
        self.mu.is_some() && self.kappa.is_some()
    }

    /// Dipole-dipole strength; zero when unset
    pub fn a_or_default(&self) -> f64 {
        self.a.unwrap_or(0.0)
    }

    /// Per-pair cutoff if overridden, otherwise `default_cutoff`
    pub fn effective_cutoff(&self, default_cutoff: f64) -> f64 {
        self.r_cut.unwrap_or(default_cutoff)
    }

    /// Name and value of the first coefficient outside its domain
    fn first_invalid(&self) -> Option<(&'static str, f64)> {
        let negative = |v: Option<f64>| v.filter(|x| !x.is_finite() || *x < 0.0);
        if let Some(mu) = negative(self.mu) {
            return Some(("mu", mu));
        }
        if let Some(kappa) = negative(self.kappa) {
            return Some(("kappa", kappa));
        }
        if let Some(a) = self.a.filter(|a| !a.is_finite()) {
            return Some(("A", a));
        }
        self.r_cut
            .filter(|r| !r.is_finite() || *r <= 0.0)
            .map(|r| ("r_cut", r))
    }
}

/// Coefficients of a type pair that passed validation
///
/// Produced by [`PairCoeff::validated`]; `A` is resolved to zero when unset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidParameters {
    pub mu: f64,
    pub a: f64,
    pub kappa: f64,
    pub r_cut: Option<f64>,
}

impl ValidParameters {
    /// Per-pair cutoff if overridden, otherwise `default_cutoff`
    pub fn effective_cutoff(&self, default_cutoff: f64) -> f64 {
        self.r_cut.unwrap_or(default_cutoff)
    }
}

/// Table of coefficients for every unordered pair of registered types
///
/// Storage is a dense upper triangular matrix indexed by type ids.
#[derive(Clone, Debug, PartialEq)]
pub struct PairCoeff {
    types: TypeRegistry,
    entries: Vec<PairParameters>,
}

impl PairCoeff {
    /// Create a table where every entry is unset
    pub fn new(types: &TypeRegistry) -> Self {
        Self {
            types: types.clone(),
            entries: vec![PairParameters::default(); num_pairs(types.len())],
        }
    }

    /// Registered types covered by the table
    pub const fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Merge coefficients into the entry of `type_a` and `type_b`.
    ///
    /// Partial entries are accepted; only the type labels are checked.
    pub fn set(&mut self, type_a: &str, type_b: &str, coefficients: PairCoefficients) -> Result<()> {
        let pair = self.types.pair(type_a, type_b)?;
        self.set_pair(pair, coefficients);
        Ok(())
    }

    /// Merge coefficients into the entry of a type pair given by ids
    pub fn set_pair(&mut self, pair: TypePair, coefficients: PairCoefficients) {
        let index = pair.triangular_index(self.types.len());
        self.entries[index].merge(&coefficients);
    }

    /// Stored entry of `type_a` and `type_b`; never-set entries are all unset
    pub fn resolve(&self, type_a: &str, type_b: &str) -> Result<PairParameters> {
        Ok(self.get(self.types.pair(type_a, type_b)?))
    }

    /// Stored entry of a type pair
    pub fn get(&self, pair: TypePair) -> PairParameters {
        self.entries[pair.triangular_index(self.types.len())]
    }

    /// Iterate over all pairs and their entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (TypePair, PairParameters)> + '_ {
        self.types.pairs().map(|pair| (pair, self.get(pair)))
    }

    /// Check that every type pair has `mu` and `kappa`, and that all set values are valid.
    ///
    /// Fails on the first offending pair, visiting pairs in ascending id order.
    pub fn validate_all(&self) -> Result<()> {
        self.validated().map(drop)
    }

    /// Validated coefficients of every type pair in ascending id order,
    /// failing like [`PairCoeff::validate_all`]
    pub fn validated(&self) -> Result<Vec<ValidParameters>> {
        self.iter()
            .map(|(pair, params)| self.validate(pair, &params))
            .collect()
    }

    fn validate(&self, pair: TypePair, params: &PairParameters) -> Result<ValidParameters> {
        let (Some(mu), Some(kappa)) = (params.mu, params.kappa) else {
            let (type_a, type_b) = self.types.pair_labels(pair);
            return Err(Error::MissingCoefficient {
                type_a,
                type_b,
                field: if params.mu.is_none() { "mu" } else { "kappa" },
            });
        };
        if let Some((field, value)) = params.first_invalid() {
            let (type_a, type_b) = self.types.pair_labels(pair);
            return Err(Error::InvalidCoefficient {
                type_a,
                type_b,
                field,
                value,
            });
        }
        Ok(ValidParameters {
            mu,
            a: params.a_or_default(),
            kappa,
            r_cut: params.r_cut,
        })
    }
}
