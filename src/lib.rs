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

//! # Dipolar
//!
//! A library for evaluating anisotropic dipole pair interactions:
//! energies, forces and torques from dipole-dipole and charge-dipole coupling
//! between orientable particles, with per-type-pair parameters,
//! neighbor list subscription and energy shifting at the cutoff.
//!
//! ## Examples
//! ~~~
//! use dipolar::{nlist::*, particle::*, types::TypeRegistry, PairCoefficients, PairDipole};
//!
//! let types = TypeRegistry::from_labels(["A"]);
//! let mut system = System::new(SimulationBox::cube(10.0), types);
//! system.push(Particle::new(Vector3::new(1.0, 1.0, 1.0), 0).with_charge(1.0));
//! system.push(Particle::new(Vector3::new(2.0, 1.0, 1.0), 0));
//!
//! let mut nlist = CellList::new();
//! let mut dipole = PairDipole::new(3.0, system.types()).unwrap();
//! dipole
//!     .set_pair("A", "A", PairCoefficients::new().mu(1.0).a(1.0).kappa(1.0))
//!     .unwrap();
//! dipole.update_coeffs(&mut nlist).unwrap();
//!
//! let mut out = Accumulators::new(system.len());
//! let energy = dipole.compute(&system, &mut nlist, &mut out).unwrap();
//! assert!(energy.is_finite());
//! ~~~

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Vector3 = nalgebra::Vector3<f64>;
/// A stack-allocated 3x3 square matrix
pub type Matrix3 = nalgebra::Matrix3<f64>;
/// Rotation of a particle from its body frame into the lab frame
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

pub mod coeff;
#[cfg(feature = "serde")]
pub mod config;
mod error;
pub mod mode;
pub mod nlist;
pub mod particle;
pub mod potential;
pub mod twobody;
pub mod types;

pub use coeff::{PairCoeff, PairCoefficients, PairParameters, ValidParameters};
pub use error::{Error, Result};
pub use mode::EnergyMode;
pub use potential::PairDipole;

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;
}
