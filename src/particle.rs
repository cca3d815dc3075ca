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

//! # Particle state and output accumulators
//!
//! [`System`] is the read-only snapshot a potential evaluates;
//! [`Accumulators`] is where the per-particle results go.

pub use crate::{Matrix3, UnitQuaternion, Vector3};
use crate::nlist::SimulationBox;
use crate::twobody::PairInteraction;
use crate::types::{TypeId, TypeRegistry};

/// Orientable point particle
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Position in the lab frame
    pub pos: Vector3,
    /// Rotation from body frame to lab frame
    pub orientation: UnitQuaternion,
    /// Scalar charge
    pub charge: f64,
    /// Type id in the owning [`TypeRegistry`]
    pub type_id: TypeId,
}

impl Particle {
    /// Uncharged particle with identity orientation
    pub fn new(pos: Vector3, type_id: TypeId) -> Self {
        Self {
            pos,
            orientation: UnitQuaternion::identity(),
            charge: 0.0,
            type_id,
        }
    }
    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }
    pub fn with_orientation(mut self, orientation: UnitQuaternion) -> Self {
        self.orientation = orientation;
        self
    }
    /// Lab frame direction of a body frame axis
    #[inline]
    pub fn lab_axis(&self, body_axis: &Vector3) -> Vector3 {
        self.orientation * body_axis
    }
}

/// Snapshot of all particles in a periodic box
#[derive(Clone, Debug)]
pub struct System {
    cell: SimulationBox,
    types: TypeRegistry,
    particles: Vec<Particle>,
}

impl System {
    pub fn new(cell: SimulationBox, types: TypeRegistry) -> Self {
        Self {
            cell,
            types,
            particles: Vec::new(),
        }
    }
    /// Add a particle; its position is wrapped into the box
    pub fn push(&mut self, mut particle: Particle) {
        self.cell.wrap(&mut particle.pos);
        self.particles.push(particle);
    }
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
    /// Mutable access for the integrator; positions are not re-wrapped
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
    pub const fn cell(&self) -> &SimulationBox {
        &self.cell
    }
    pub const fn types(&self) -> &TypeRegistry {
        &self.types
    }
    pub fn len(&self) -> usize {
        self.particles.len()
    }
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
    /// Minimum image separation vector, r_i - r_j
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> Vector3 {
        self.cell
            .distance(&self.particles[i].pos, &self.particles[j].pos)
    }
}

/// Per-particle output of a force computation
///
/// Energies are split evenly between the two particles of a pair, and so is the
/// pair virial, ½ r_ij ⊗ F_i.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Accumulators {
    pub force: Vec<Vector3>,
    pub torque: Vec<Vector3>,
    pub energy: Vec<f64>,
    pub virial: Vec<Matrix3>,
}

impl Accumulators {
    /// Zeroed accumulators for `n` particles
    pub fn new(n: usize) -> Self {
        Self {
            force: vec![Vector3::zeros(); n],
            torque: vec![Vector3::zeros(); n],
            energy: vec![0.0; n],
            virial: vec![Matrix3::zeros(); n],
        }
    }

    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    /// Zero all entries
    pub fn reset(&mut self) {
        self.force.fill(Vector3::zeros());
        self.torque.fill(Vector3::zeros());
        self.energy.fill(0.0);
        self.virial.fill(Matrix3::zeros());
    }

    /// Sum of per-particle energies
    pub fn total_energy(&self) -> f64 {
        self.energy.iter().sum()
    }

    /// Sum of per-particle forces; zero for pair forces obeying Newton's third law
    pub fn net_force(&self) -> Vector3 {
        self.force.iter().sum()
    }

    /// Total virial tensor
    pub fn total_virial(&self) -> Matrix3 {
        self.virial.iter().sum()
    }

    /// Add the contribution of pair (i, j) with separation `r_ij = r_i - r_j`
    pub(crate) fn add_pair(&mut self, i: usize, j: usize, r_ij: &Vector3, pair: &PairInteraction) {
        let half_energy = 0.5 * pair.energy;
        let half_virial = (r_ij * pair.force.transpose()) * 0.5;
        self.force[i] += pair.force;
        self.force[j] -= pair.force;
        self.torque[i] += pair.torque_i;
        self.torque[j] += pair.torque_j;
        self.energy[i] += half_energy;
        self.energy[j] += half_energy;
        self.virial[i] += half_virial;
        self.virial[j] += half_virial;
    }
}
