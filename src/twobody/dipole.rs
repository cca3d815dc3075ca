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

use super::{
    AnisotropicTwobodyEnergy, DipolarPair, DipoleDipole, DipoleDipoleIonDipole, IonDipole,
    PairInteraction,
};
use crate::{Cutoff, EnergyMode, ValidParameters, Vector3};

/// Dipole pair potential for one pair of particle types
///
/// Combines [`DipoleDipole`] and [`IonDipole`] for particles carrying a dipole of
/// magnitude `mu` along their body axis, truncated at a spherical cutoff and
/// optionally shifted so that the energy vanishes at the cutoff.
///
/// The shift is evaluated at the cutoff along the current pair direction,
/// keeping both orientations and charges fixed. It changes only the energy.
///
/// # Examples
/// ~~~
/// use dipolar::{twobody::*, EnergyMode};
/// let dipole = Dipole::new(1.0, 1.0, 1.0, 2.5, EnergyMode::Shift);
/// let axis = Vector3::z();
/// let at_cutoff = dipole.interaction(&(2.5 * axis), &axis, &axis, 0.0, 0.0).unwrap();
/// assert!(at_cutoff.energy.abs() < 1e-12);
/// assert!(dipole.interaction(&(2.6 * axis), &axis, &axis, 0.0, 0.0).is_none());
/// ~~~
#[derive(Clone, Debug, PartialEq)]
pub struct Dipole {
    /// Dipole moment magnitude
    mu: f64,
    kernel: DipoleDipoleIonDipole,
    cutoff: f64,
    mode: EnergyMode,
}

impl Dipole {
    /// Separations below this are treated as overlapping and skipped.
    ///
    /// Point dipole interactions diverge as r⁻³ and have no finite value at contact.
    pub const MIN_DISTANCE_SQUARED: f64 = 1e-12;

    pub fn new(mu: f64, a: f64, kappa: f64, cutoff: f64, mode: EnergyMode) -> Self {
        Self {
            mu,
            kernel: DipoleDipoleIonDipole::new(DipoleDipole::new(a), IonDipole::new(kappa)),
            cutoff,
            mode,
        }
    }

    /// Build from validated pair parameters
    pub fn from_parameters(params: &ValidParameters, default_cutoff: f64, mode: EnergyMode) -> Self {
        Self::new(
            params.mu,
            params.a,
            params.kappa,
            params.effective_cutoff(default_cutoff),
            mode,
        )
    }

    pub const fn mu(&self) -> f64 {
        self.mu
    }

    pub const fn mode(&self) -> EnergyMode {
        self.mode
    }

    pub const fn kernel(&self) -> &DipoleDipoleIonDipole {
        &self.kernel
    }

    /// Interaction between two particles.
    ///
    /// - `distance`: separation, r_i - r_j
    /// - `axis_i`, `axis_j`: unit dipole directions in the lab frame
    /// - `charge_i`, `charge_j`: particle charges
    ///
    /// Returns `None` beyond the cutoff and for overlapping particles.
    #[inline]
    pub fn interaction(
        &self,
        distance: &Vector3,
        axis_i: &Vector3,
        axis_j: &Vector3,
        charge_i: f64,
        charge_j: f64,
    ) -> Option<PairInteraction> {
        let r2 = distance.norm_squared();
        if r2 > self.cutoff_squared() || r2 < Self::MIN_DISTANCE_SQUARED {
            return None;
        }
        let pair = DipolarPair::new(*distance, self.mu * axis_i, self.mu * axis_j)
            .with_charges(charge_i, charge_j);
        let mut interaction = self.kernel.anisotropic_twobody_interaction(&pair);
        if self.mode.is_shifted() {
            interaction.energy -= self.energy_at_cutoff(&pair);
        }
        Some(interaction)
    }

    /// Unshifted energy with the pair moved out to the cutoff along its current direction
    fn energy_at_cutoff(&self, pair: &DipolarPair) -> f64 {
        let at_cutoff = pair.with_distance(pair.distance.normalize() * self.cutoff);
        self.kernel.anisotropic_twobody_energy(&at_cutoff)
    }
}

impl Cutoff for Dipole {
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}
