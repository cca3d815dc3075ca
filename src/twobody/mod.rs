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

//! ## Twobody interactions
//!
//! Module for describing exactly two orientable particles interacting with each other.
//!
//! ### Conventions
//!
//! - The separation vector is $\boldsymbol{r} = \boldsymbol{r}_i - \boldsymbol{r}_j$,
//!   pointing from particle _j_ to particle _i_.
//! - Forces are reported for particle _i_,
//!   $\boldsymbol{F}_i = -\partial U / \partial \boldsymbol{r}$; particle _j_ receives
//!   $-\boldsymbol{F}_i$.
//! - Torques are in the lab frame and reported for both particles,
//!   $\boldsymbol{\tau}_k = \boldsymbol{p}_k \times (-\partial U / \partial \boldsymbol{p}_k)$.
//!   They do not sum to zero; the missing angular momentum is carried by
//!   $\boldsymbol{r} \times \boldsymbol{F}_i$.

pub use crate::Vector3;
use std::fmt::Debug;
use std::ops::{Add, AddAssign};

mod dipole;
mod multipole;
pub use self::dipole::Dipole;
pub use self::multipole::{dipole_field, ion_field, DipoleDipole, IonDipole};

/// Relative configuration of a pair of charged point dipoles
#[derive(Clone, Debug, PartialEq)]
pub struct DipolarPair {
    /// Separation, r_i - r_j
    pub distance: Vector3,
    /// Dipole moment of particle i in the lab frame
    pub dipole_i: Vector3,
    /// Dipole moment of particle j in the lab frame
    pub dipole_j: Vector3,
    pub charge_i: f64,
    pub charge_j: f64,
}

impl DipolarPair {
    /// Uncharged pair of dipoles
    pub const fn new(distance: Vector3, dipole_i: Vector3, dipole_j: Vector3) -> Self {
        Self {
            distance,
            dipole_i,
            dipole_j,
            charge_i: 0.0,
            charge_j: 0.0,
        }
    }
    pub const fn with_charges(mut self, charge_i: f64, charge_j: f64) -> Self {
        self.charge_i = charge_i;
        self.charge_j = charge_j;
        self
    }
    /// Same dipoles and charges at a different separation
    pub fn with_distance(&self, distance: Vector3) -> Self {
        Self {
            distance,
            ..self.clone()
        }
    }
}

/// Energy, force and torques of a single pair
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PairInteraction {
    pub energy: f64,
    /// Force on particle i
    pub force: Vector3,
    pub torque_i: Vector3,
    pub torque_j: Vector3,
}

impl Add for PairInteraction {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            energy: self.energy + other.energy,
            force: self.force + other.force,
            torque_i: self.torque_i + other.torque_i,
            torque_j: self.torque_j + other.torque_j,
        }
    }
}

impl AddAssign for PairInteraction {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Potential energy between a pair of anisotropic particles
pub trait AnisotropicTwobodyEnergy: Debug + Send + Sync {
    /// Interaction energy between a pair of anisotropic particles, 𝑈(𝒓, 𝒑ᵢ, 𝒑ⱼ).
    fn anisotropic_twobody_energy(&self, pair: &DipolarPair) -> f64;

    /// Force on particle i, 𝑭ᵢ = -∂𝑈/∂𝒓
    fn anisotropic_twobody_force(&self, pair: &DipolarPair) -> Vector3;

    /// Lab frame torques on particle i and j, 𝝉ₖ = 𝒑ₖ × (-∂𝑈/∂𝒑ₖ)
    fn anisotropic_twobody_torques(&self, pair: &DipolarPair) -> (Vector3, Vector3);

    /// Energy, force and torques in one go.
    ///
    /// Implementations sharing intermediates between the three quantities
    /// should override this.
    fn anisotropic_twobody_interaction(&self, pair: &DipolarPair) -> PairInteraction {
        let (torque_i, torque_j) = self.anisotropic_twobody_torques(pair);
        PairInteraction {
            energy: self.anisotropic_twobody_energy(pair),
            force: self.anisotropic_twobody_force(pair),
            torque_i,
            torque_j,
        }
    }
}

/// Combine two twobody energy schemes
#[derive(Clone, Debug, PartialEq)]
pub struct Combined<T, U>(T, U);

impl<T: AnisotropicTwobodyEnergy, U: AnisotropicTwobodyEnergy> Combined<T, U> {
    pub const fn new(t: T, u: U) -> Self {
        Self(t, u)
    }
    pub const fn first(&self) -> &T {
        &self.0
    }
    pub const fn second(&self) -> &U {
        &self.1
    }
}

impl<T: AnisotropicTwobodyEnergy, U: AnisotropicTwobodyEnergy> AnisotropicTwobodyEnergy
    for Combined<T, U>
{
    #[inline]
    fn anisotropic_twobody_energy(&self, pair: &DipolarPair) -> f64 {
        self.0.anisotropic_twobody_energy(pair) + self.1.anisotropic_twobody_energy(pair)
    }
    #[inline]
    fn anisotropic_twobody_force(&self, pair: &DipolarPair) -> Vector3 {
        self.0.anisotropic_twobody_force(pair) + self.1.anisotropic_twobody_force(pair)
    }
    #[inline]
    fn anisotropic_twobody_torques(&self, pair: &DipolarPair) -> (Vector3, Vector3) {
        let (t0_i, t0_j) = self.0.anisotropic_twobody_torques(pair);
        let (t1_i, t1_j) = self.1.anisotropic_twobody_torques(pair);
        (t0_i + t1_i, t0_j + t1_j)
    }
    #[inline]
    fn anisotropic_twobody_interaction(&self, pair: &DipolarPair) -> PairInteraction {
        self.0.anisotropic_twobody_interaction(pair) + self.1.anisotropic_twobody_interaction(pair)
    }
}

/// Dipole-dipole coupling combined with charge-dipole coupling
pub type DipoleDipoleIonDipole = Combined<DipoleDipole, IonDipole>;

#[cfg(test)]
pub(crate) mod testing {
    //! Finite difference references for forces and torques
    use super::*;
    use crate::UnitQuaternion;

    const EPS: f64 = 1e-6;

    /// Central difference of -∂U/∂r
    pub fn numerical_force<T: AnisotropicTwobodyEnergy>(pot: &T, pair: &DipolarPair) -> Vector3 {
        Vector3::from_fn(|k, _| {
            let mut dr = Vector3::zeros();
            dr[k] = EPS;
            let u_plus = pot.anisotropic_twobody_energy(&pair.with_distance(pair.distance + dr));
            let u_minus = pot.anisotropic_twobody_energy(&pair.with_distance(pair.distance - dr));
            -(u_plus - u_minus) / (2.0 * EPS)
        })
    }

    /// Torque on particle i (or j) from rotating its dipole by a small angle:
    /// τ·n = -dU/dθ for rotation about n
    pub fn numerical_torque<T: AnisotropicTwobodyEnergy>(
        pot: &T,
        pair: &DipolarPair,
        on_i: bool,
    ) -> Vector3 {
        Vector3::from_fn(|k, _| {
            let axis = nalgebra::Unit::new_normalize(Vector3::ith(k, 1.0));
            let energy = |angle: f64| {
                let rotation = UnitQuaternion::from_axis_angle(&axis, angle);
                let mut rotated = pair.clone();
                if on_i {
                    rotated.dipole_i = rotation * pair.dipole_i;
                } else {
                    rotated.dipole_j = rotation * pair.dipole_j;
                }
                pot.anisotropic_twobody_energy(&rotated)
            };
            -(energy(EPS) - energy(-EPS)) / (2.0 * EPS)
        })
    }
}
