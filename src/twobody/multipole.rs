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

//! # Electric multipole interactions
//!
//! Unscreened, untruncated interactions between point charges and point dipoles.
//! Truncation and shifting at a cutoff are handled by [`super::Dipole`].

use super::{AnisotropicTwobodyEnergy, DipolarPair, PairInteraction};
use crate::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Electric field from a point charge at displacement `r` from the charge.
///
/// The field from a charge is described by the formula:
/// E(z, r) = z * r / |r|^3
#[inline]
pub fn ion_field(charge: f64, r: &Vector3) -> Vector3 {
    let r2 = r.norm_squared();
    charge * r / (r2 * r2.sqrt())
}

/// Electric field from a point dipole at displacement `r` from the dipole.
///
/// The field from a point dipole is described by the formula:
/// E(mu, r) = (3 * (mu.dot(r) * r / r2) - mu) / r3
#[inline]
pub fn dipole_field(dipole: &Vector3, r: &Vector3) -> Vector3 {
    let r2 = r.norm_squared();
    let r3 = r2 * r2.sqrt();
    (3.0 * dipole.dot(r) * r / r2 - dipole) / r3
}

/// Dipole-dipole interaction
///
/// $$ u = A \left[ \frac{\boldsymbol{p}_i \cdot \boldsymbol{p}_j}{r^3}
///      - \frac{3 (\boldsymbol{p}_i \cdot \boldsymbol{r})(\boldsymbol{p}_j \cdot \boldsymbol{r})}{r^5} \right] $$
///
/// # Examples
/// Two unit dipoles aligned head to tail along their separation:
/// ~~~
/// use dipolar::twobody::*;
/// let pair = DipolarPair::new(Vector3::z(), Vector3::z(), Vector3::z());
/// let energy = DipoleDipole::new(1.0).anisotropic_twobody_energy(&pair);
/// assert_eq!(energy, -2.0);
/// ~~~
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DipoleDipole {
    /// Coupling strength, A
    #[cfg_attr(feature = "serde", serde(rename = "A"))]
    strength: f64,
}

impl DipoleDipole {
    pub const fn new(strength: f64) -> Self {
        Self { strength }
    }
    pub const fn strength(&self) -> f64 {
        self.strength
    }
}

impl AnisotropicTwobodyEnergy for DipoleDipole {
    /// The interaction energy is u(p_i, p_j, r) = -p_i.dot(E(p_j, r))
    #[inline]
    fn anisotropic_twobody_energy(&self, pair: &DipolarPair) -> f64 {
        -self.strength * pair.dipole_i.dot(&dipole_field(&pair.dipole_j, &pair.distance))
    }

    #[inline]
    fn anisotropic_twobody_force(&self, pair: &DipolarPair) -> Vector3 {
        let r = &pair.distance;
        let (p_i, p_j) = (&pair.dipole_i, &pair.dipole_j);
        let r2 = r.norm_squared();
        let r5 = r2 * r2 * r2.sqrt();
        let pi_dot_r = p_i.dot(r);
        let pj_dot_r = p_j.dot(r);
        let force = (3.0 * p_i.dot(p_j) - 15.0 * pi_dot_r * pj_dot_r / r2) * r
            + 3.0 * (pj_dot_r * p_i + pi_dot_r * p_j);
        self.strength * force / r5
    }

    /// The field is even in r, so each dipole feels the other's field at the same r
    #[inline]
    fn anisotropic_twobody_torques(&self, pair: &DipolarPair) -> (Vector3, Vector3) {
        let field_j = dipole_field(&pair.dipole_j, &pair.distance);
        let field_i = dipole_field(&pair.dipole_i, &pair.distance);
        (
            self.strength * pair.dipole_i.cross(&field_j),
            self.strength * pair.dipole_j.cross(&field_i),
        )
    }

    fn anisotropic_twobody_interaction(&self, pair: &DipolarPair) -> PairInteraction {
        if self.strength == 0.0 {
            return PairInteraction::default();
        }
        let field_j = dipole_field(&pair.dipole_j, &pair.distance);
        let field_i = dipole_field(&pair.dipole_i, &pair.distance);
        PairInteraction {
            energy: -self.strength * pair.dipole_i.dot(&field_j),
            force: self.anisotropic_twobody_force(pair),
            torque_i: self.strength * pair.dipole_i.cross(&field_j),
            torque_j: self.strength * pair.dipole_j.cross(&field_i),
        }
    }
}

/// Charge-dipole interaction in both directions
///
/// $$ u = \kappa \frac{q_i (\boldsymbol{p}_j \cdot \boldsymbol{r}) - q_j (\boldsymbol{p}_i \cdot \boldsymbol{r})}{r^3} $$
///
/// The first term is charge _i_ in the potential of dipole _j_;
/// the second is dipole _i_ in the field of charge _j_.
/// There is no charge-charge term.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IonDipole {
    /// Coupling strength, κ
    #[cfg_attr(feature = "serde", serde(rename = "kappa"))]
    strength: f64,
}

impl IonDipole {
    pub const fn new(strength: f64) -> Self {
        Self { strength }
    }
    pub const fn strength(&self) -> f64 {
        self.strength
    }
    /// Effective dipole, qᵢ𝒑ⱼ - qⱼ𝒑ᵢ, such that u = κ 𝒘·𝒓 / r³
    #[inline]
    fn effective_dipole(pair: &DipolarPair) -> Vector3 {
        pair.charge_i * pair.dipole_j - pair.charge_j * pair.dipole_i
    }
}

impl AnisotropicTwobodyEnergy for IonDipole {
    #[inline]
    fn anisotropic_twobody_energy(&self, pair: &DipolarPair) -> f64 {
        let r = &pair.distance;
        let r2 = r.norm_squared();
        self.strength * Self::effective_dipole(pair).dot(r) / (r2 * r2.sqrt())
    }

    /// The force is -κ ∇(𝒘·𝒓/r³) = κ 𝑬(𝒘, 𝒓)
    #[inline]
    fn anisotropic_twobody_force(&self, pair: &DipolarPair) -> Vector3 {
        self.strength * dipole_field(&Self::effective_dipole(pair), &pair.distance)
    }

    #[inline]
    fn anisotropic_twobody_torques(&self, pair: &DipolarPair) -> (Vector3, Vector3) {
        let r = &pair.distance;
        // field of charge j at i, and of charge i at j
        let field_at_i = ion_field(pair.charge_j, r);
        let field_at_j = ion_field(pair.charge_i, &(-r));
        (
            self.strength * pair.dipole_i.cross(&field_at_i),
            self.strength * pair.dipole_j.cross(&field_at_j),
        )
    }

    fn anisotropic_twobody_interaction(&self, pair: &DipolarPair) -> PairInteraction {
        if self.strength == 0.0 || (pair.charge_i == 0.0 && pair.charge_j == 0.0) {
            return PairInteraction::default();
        }
        let (torque_i, torque_j) = self.anisotropic_twobody_torques(pair);
        PairInteraction {
            energy: self.anisotropic_twobody_energy(pair),
            force: self.anisotropic_twobody_force(pair),
            torque_i,
            torque_j,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dipole_field_on_axis_and_equator() {
        let p = Vector3::new(0.0, 0.0, 2.0);
        // on axis: 2p/r³
        assert_relative_eq!(
            dipole_field(&p, &Vector3::new(0.0, 0.0, 2.0)),
            Vector3::new(0.0, 0.0, 0.5)
        );
        // equator: -p/r³
        assert_relative_eq!(
            dipole_field(&p, &Vector3::new(2.0, 0.0, 0.0)),
            Vector3::new(0.0, 0.0, -0.25)
        );
        assert_relative_eq!(
            ion_field(2.0, &Vector3::new(0.0, 2.0, 0.0)),
            Vector3::new(0.0, 0.5, 0.0)
        );
    }

    #[test]
    fn test_dipole_dipole_closed_forms() {
        let dd = DipoleDipole::new(1.0);
        let r = 1.5_f64;
        // head to tail: -2p²/r³
        let axial = DipolarPair::new(r * Vector3::x(), Vector3::x(), Vector3::x());
        assert_relative_eq!(dd.anisotropic_twobody_energy(&axial), -2.0 / r.powi(3));
        // side by side, parallel: +p²/r³
        let parallel = DipolarPair::new(r * Vector3::x(), Vector3::z(), Vector3::z());
        assert_relative_eq!(dd.anisotropic_twobody_energy(&parallel), 1.0 / r.powi(3));
        // side by side, antiparallel: -p²/r³
        let antiparallel = DipolarPair::new(r * Vector3::x(), Vector3::z(), -Vector3::z());
        assert_relative_eq!(dd.anisotropic_twobody_energy(&antiparallel), -1.0 / r.powi(3));
        // head to tail attracts: force on i points towards j
        let force = dd.anisotropic_twobody_force(&axial);
        assert_relative_eq!(force, Vector3::new(-6.0 / r.powi(4), 0.0, 0.0), epsilon = 1e-12);
        // aligned dipoles feel no torque
        let (t_i, t_j) = dd.anisotropic_twobody_torques(&axial);
        assert_relative_eq!(t_i.norm() + t_j.norm(), 0.0);
    }

    #[test]
    fn test_dipole_dipole_finite_differences() {
        let dd = DipoleDipole::new(0.7);
        let pair = DipolarPair::new(
            Vector3::new(-0.4, 1.3, 0.9),
            Vector3::new(1.0, -0.3, 0.5),
            Vector3::new(0.2, 0.6, -1.1),
        );
        let interaction = dd.anisotropic_twobody_interaction(&pair);
        assert_relative_eq!(interaction.force, numerical_force(&dd, &pair), epsilon = 1e-6);
        assert_relative_eq!(
            interaction.torque_i,
            numerical_torque(&dd, &pair, true),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            interaction.torque_j,
            numerical_torque(&dd, &pair, false),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_ion_dipole() {
        let id = IonDipole::new(2.0);
        // charge i on the axis of dipole j: u = κ q p / r²
        let pair = DipolarPair::new(2.0 * Vector3::z(), Vector3::zeros(), Vector3::z())
            .with_charges(1.0, 0.0);
        assert_relative_eq!(id.anisotropic_twobody_energy(&pair), 0.5);
        // dipole i pointing away from charge j: u = -κ q p / r²
        let pair = DipolarPair::new(2.0 * Vector3::z(), Vector3::z(), Vector3::zeros())
            .with_charges(0.0, 1.0);
        assert_relative_eq!(id.anisotropic_twobody_energy(&pair), -0.5);

        let pair = DipolarPair::new(
            Vector3::new(0.8, 0.3, -1.2),
            Vector3::new(0.4, -0.9, 0.1),
            Vector3::new(-0.6, 0.2, 0.7),
        )
        .with_charges(-1.3, 0.9);
        let interaction = id.anisotropic_twobody_interaction(&pair);
        assert_relative_eq!(interaction.force, numerical_force(&id, &pair), epsilon = 1e-6);
        assert_relative_eq!(
            interaction.torque_i,
            numerical_torque(&id, &pair, true),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            interaction.torque_j,
            numerical_torque(&id, &pair, false),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_zero_strength_is_inert() {
        let pair = DipolarPair::new(Vector3::x(), Vector3::y(), Vector3::z()).with_charges(1.0, 1.0);
        assert_eq!(
            DipoleDipole::new(0.0).anisotropic_twobody_interaction(&pair),
            PairInteraction::default()
        );
        assert_eq!(
            IonDipole::new(1.0).anisotropic_twobody_interaction(&pair.clone().with_charges(0.0, 0.0)),
            PairInteraction::default()
        );
    }
}
