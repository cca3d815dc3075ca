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

//! # (De)serializable setup of a dipole potential

use crate::{EnergyMode, PairCoefficients, PairDipole, Result, Vector3};
use crate::types::TypeRegistry;
use serde::{Deserialize, Serialize};

/// Coefficients for one pair of type labels.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PairEntry {
    pub a: String,
    pub b: String,
    pub coefficients: PairCoefficients,
}

/// Structure used for (de)serializing a [`PairDipole`].
///
/// Entries are applied in order, so later entries for the same pair
/// override fields set by earlier ones.
///
/// ~~~
/// # use dipolar::{config::DipoleConfig, types::TypeRegistry, EnergyMode};
/// let json = r#"{
///     "r_cut": 3.0,
///     "mode": "shift",
///     "pairs": [{"a": "A", "b": "A", "coefficients": {"mu": 1.0, "A": 1.0, "kappa": 0.5}}]
/// }"#;
/// let config: DipoleConfig = serde_json::from_str(json).unwrap();
/// let dipole = config.build(&TypeRegistry::from_labels(["A"])).unwrap();
/// assert_eq!(dipole.mode(), EnergyMode::Shift);
/// ~~~
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DipoleConfig {
    /// Default cutoff for pairs without an override
    pub r_cut: f64,
    #[serde(default)]
    pub mode: EnergyMode,
    /// Body frame dipole direction; x if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_axis: Option<Vector3>,
    /// Applied to every type pair before `pairs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<PairCoefficients>,
    #[serde(default)]
    pub pairs: Vec<PairEntry>,
}

impl DipoleConfig {
    pub fn new(r_cut: f64) -> Self {
        Self {
            r_cut,
            mode: EnergyMode::default(),
            body_axis: None,
            default: None,
            pairs: Vec::new(),
        }
    }

    /// Build an uncommitted potential for the given types.
    ///
    /// Unknown labels and invalid cutoffs fail here; missing coefficients
    /// surface on the first commit.
    pub fn build(&self, types: &TypeRegistry) -> Result<PairDipole> {
        let mut dipole = PairDipole::new(self.r_cut, types)?;
        if let Some(axis) = self.body_axis {
            dipole = dipole.with_body_axis(axis);
        }
        dipole.set_params(self.mode);
        if let Some(default) = self.default {
            for pair in types.pairs() {
                dipole.pair_coeff_mut().set_pair(pair, default);
            }
        }
        for entry in &self.pairs {
            dipole.set_pair(&entry.a, &entry.b, entry.coefficients)?;
        }
        Ok(dipole)
    }
}
