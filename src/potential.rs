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

//! # Dipole pair potential
//!
//! [`PairDipole`] follows a two-phase protocol: coefficients and the energy mode
//! are mutated freely, then [`PairDipole::update_coeffs`] validates them, resolves
//! one [`Dipole`] per type pair, and declares the cutoff of every type pair to the
//! neighbor list. [`PairDipole::compute`] commits automatically if anything
//! changed since the last commit.

use crate::nlist::NeighborList;
use crate::particle::{Accumulators, System};
use crate::twobody::{Dipole, PairInteraction};
use crate::types::{TypePair, TypeRegistry};
use crate::{EnergyMode, Error, PairCoeff, PairCoefficients, Result, Vector3};

/// Anisotropic dipole pair potential with per type pair coefficients
///
/// Each particle carries a dipole of magnitude `mu` along its body axis,
/// rotated into the lab frame by its orientation. The pair energy is the sum of
/// a dipole-dipole term scaled by `A` and a charge-dipole term scaled by `kappa`,
/// see [`crate::twobody::DipoleDipole`] and [`crate::twobody::IonDipole`].
#[derive(Clone, Debug)]
pub struct PairDipole {
    /// Cutoff used by type pairs without an override
    default_cutoff: f64,
    mode: EnergyMode,
    coeff: PairCoeff,
    /// Dipole direction in the body frame
    body_axis: Vector3,
    enabled: bool,
    /// Resolved interactions, indexed by type pair; `None` until committed
    committed: Option<Vec<Dipole>>,
}

impl PairDipole {
    /// Default dipole direction in the body frame
    pub const DEFAULT_BODY_AXIS: Vector3 = Vector3::new(1.0, 0.0, 0.0);

    /// New potential where every type pair still needs coefficients.
    ///
    /// Fails if `default_cutoff` is not positive and finite.
    pub fn new(default_cutoff: f64, types: &TypeRegistry) -> Result<Self> {
        if !default_cutoff.is_finite() || default_cutoff <= 0.0 {
            return Err(Error::InvalidCutoff(default_cutoff));
        }
        Ok(Self {
            default_cutoff,
            mode: EnergyMode::default(),
            coeff: PairCoeff::new(types),
            body_axis: Self::DEFAULT_BODY_AXIS,
            enabled: true,
            committed: None,
        })
    }

    /// Use a different body frame dipole direction; it is normalized
    pub fn with_body_axis(mut self, axis: Vector3) -> Self {
        self.body_axis = axis.normalize();
        self
    }

    pub const fn body_axis(&self) -> &Vector3 {
        &self.body_axis
    }

    pub const fn default_cutoff(&self) -> f64 {
        self.default_cutoff
    }

    pub const fn mode(&self) -> EnergyMode {
        self.mode
    }

    /// Select how the energy is treated at the cutoff
    pub fn set_params(&mut self, mode: EnergyMode) {
        if mode != self.mode {
            log::info!("dipole energy mode changed from {} to {}", self.mode, mode);
            self.mode = mode;
            self.committed = None;
        }
    }

    /// Select the energy mode by name; on error the current mode is kept.
    ///
    /// ~~~
    /// # use dipolar::{types::TypeRegistry, PairDipole, EnergyMode};
    /// let mut dipole = PairDipole::new(3.0, &TypeRegistry::from_labels(["A"])).unwrap();
    /// dipole.set_params_str("shift").unwrap();
    /// assert!(dipole.set_params_str("xplor").is_err());
    /// assert_eq!(dipole.mode(), EnergyMode::Shift);
    /// ~~~
    pub fn set_params_str(&mut self, mode: &str) -> Result<()> {
        self.set_params(mode.parse()?);
        Ok(())
    }

    /// Coefficient table
    pub const fn pair_coeff(&self) -> &PairCoeff {
        &self.coeff
    }

    /// Mutable coefficient table; the potential must be committed again afterwards
    pub fn pair_coeff_mut(&mut self) -> &mut PairCoeff {
        self.committed = None;
        &mut self.coeff
    }

    /// Merge coefficients for a pair of type labels
    pub fn set_pair(
        &mut self,
        type_a: &str,
        type_b: &str,
        coefficients: PairCoefficients,
    ) -> Result<()> {
        self.pair_coeff_mut().set(type_a, type_b, coefficients)
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Include the potential in [`PairDipole::compute`]
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Exclude the potential from [`PairDipole::compute`]
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// True if coefficients were committed and nothing changed since
    pub const fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// Cutoff of a type pair: the override if set, otherwise the default
    pub fn pair_cutoff(&self, pair: TypePair) -> f64 {
        self.coeff.get(pair).effective_cutoff(self.default_cutoff)
    }

    /// Declare the cutoff of every type pair to the neighbor list.
    ///
    /// Works on incomplete coefficients, as only cutoffs are needed.
    pub fn declare_radii<N: NeighborList>(&self, nlist: &mut N) {
        for pair in self.coeff.types().pairs() {
            nlist.declare_required_radius(pair, self.pair_cutoff(pair));
        }
    }

    /// Validate all coefficients, resolve the per type pair interactions,
    /// and declare all cutoffs to the neighbor list.
    ///
    /// Safe to call repeatedly. Nothing is changed if validation fails.
    pub fn update_coeffs<N: NeighborList>(&mut self, nlist: &mut N) -> Result<()> {
        let dipoles: Vec<_> = self
            .coeff
            .validated()?
            .iter()
            .map(|params| Dipole::from_parameters(params, self.default_cutoff, self.mode))
            .collect();
        self.declare_radii(nlist);
        log::debug!(
            "committed dipole coefficients for {} type pairs, mode {}",
            dipoles.len(),
            self.mode
        );
        self.committed = Some(dipoles);
        Ok(())
    }

    fn dipole<'a>(&self, dipoles: &'a [Dipole], pair: TypePair) -> Option<&'a Dipole> {
        let n = self.coeff.types().len();
        let (a, b) = pair.ids();
        if a.max(b) >= n {
            return None;
        }
        dipoles.get(pair.triangular_index(n))
    }

    /// Check that `system` uses the types the coefficients were set for
    fn check_system(&self, system: &System) -> Result<()> {
        let types = self.coeff.types();
        if system.types() != types {
            return Err(Error::TypeMismatch {
                potential: types.labels().to_vec(),
                system: system.types().labels().to_vec(),
            });
        }
        let unknown = system
            .particles()
            .iter()
            .enumerate()
            .find(|(_, p)| p.type_id >= types.len());
        match unknown {
            Some((particle, p)) => Err(Error::UnknownTypeId {
                particle,
                type_id: p.type_id,
            }),
            None => Ok(()),
        }
    }

    /// Interaction of a single pair of particles, ignoring the neighbor list.
    ///
    /// Requires committed coefficients; `Ok(None)` beyond the cutoff.
    pub fn pair_interaction(
        &self,
        i: usize,
        j: usize,
        system: &System,
    ) -> Result<Option<PairInteraction>> {
        let dipoles = self.committed.as_deref().ok_or(Error::NotCommitted)?;
        self.check_system(system)?;
        if let Some(&index) = [i, j].iter().find(|&&k| k >= system.len()) {
            return Err(Error::ParticleIndex {
                index,
                len: system.len(),
            });
        }
        Ok(self.evaluate(dipoles, system, i, j, &system.distance(i, j)))
    }

    #[inline]
    fn evaluate(
        &self,
        dipoles: &[Dipole],
        system: &System,
        i: usize,
        j: usize,
        distance: &Vector3,
    ) -> Option<PairInteraction> {
        let (p_i, p_j) = (&system.particles()[i], &system.particles()[j]);
        let dipole = self.dipole(dipoles, TypePair::new(p_i.type_id, p_j.type_id))?;
        dipole.interaction(
            distance,
            &p_i.lab_axis(&self.body_axis),
            &p_j.lab_axis(&self.body_axis),
            p_i.charge,
            p_j.charge,
        )
    }

    /// Accumulate forces, torques, energies and virials of all pairs into `out`.
    ///
    /// Commits the coefficients first if needed, declares all cutoffs to `nlist`,
    /// and brings the neighbor list up to date. The system must use the same
    /// type registry as the potential. Any error is raised before `out` is
    /// touched. Returns the total pair energy added.
    pub fn compute<N: NeighborList>(
        &mut self,
        system: &System,
        nlist: &mut N,
        out: &mut Accumulators,
    ) -> Result<f64> {
        if out.len() != system.len() {
            return Err(Error::SizeMismatch {
                accumulators: out.len(),
                particles: system.len(),
            });
        }
        self.check_system(system)?;
        if !self.enabled {
            return Ok(0.0);
        }
        if self.is_committed() {
            // nlist may not be the list the coefficients were committed with
            self.declare_radii(nlist);
        } else {
            self.update_coeffs(nlist)?;
        }
        nlist.update(system)?;
        let Some(dipoles) = self.committed.as_deref() else {
            return Ok(0.0);
        };
        let mut total_energy = 0.0;
        let mut overlaps = 0;
        for pair in nlist.pairs(system) {
            if pair.distance.norm_squared() < Dipole::MIN_DISTANCE_SQUARED {
                overlaps += 1;
                continue;
            }
            if let Some(interaction) = self.evaluate(dipoles, system, pair.i, pair.j, &pair.distance) {
                out.add_pair(pair.i, pair.j, &pair.distance, &interaction);
                total_energy += interaction.energy;
            }
        }
        if overlaps > 0 {
            log::warn!("skipped {overlaps} overlapping particle pairs");
        }
        Ok(total_energy)
    }

    /// Resolved interaction of a type pair, if committed
    pub fn resolved(&self, pair: TypePair) -> Option<Dipole> {
        self.committed
            .as_deref()
            .and_then(|dipoles| self.dipole(dipoles, pair))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlist::{AllPairs, CellList, SimulationBox};
    use crate::particle::Particle;
    use crate::UnitQuaternion;
    use approx::assert_relative_eq;

    fn types() -> TypeRegistry {
        TypeRegistry::from_labels(["A"])
    }

    fn full() -> PairCoefficients {
        PairCoefficients::new().mu(1.0).a(1.0).kappa(1.0)
    }

    /// Two particles with dipoles along the separation axis (body x)
    fn axial_pair(r: f64) -> System {
        let mut system = System::new(SimulationBox::cube(10.0), types());
        system.push(Particle::new(Vector3::new(5.0 + r, 5.0, 5.0), 0));
        system.push(Particle::new(Vector3::new(5.0, 5.0, 5.0), 0));
        system
    }

    #[test]
    fn test_update_coeffs_requires_mu_and_kappa() {
        let mut nlist = AllPairs::new();
        let mut dipole = PairDipole::new(3.0, &types()).unwrap();
        assert!(dipole
            .update_coeffs(&mut nlist)
            .unwrap_err()
            .is_completeness_error());

        dipole
            .set_pair("A", "A", PairCoefficients::new().a(1.0).kappa(1.0))
            .unwrap();
        assert!(matches!(
            dipole.update_coeffs(&mut nlist),
            Err(Error::MissingCoefficient { field: "mu", .. })
        ));

        let mut dipole = PairDipole::new(3.0, &types()).unwrap();
        dipole
            .set_pair("A", "A", PairCoefficients::new().mu(1.0).a(1.0))
            .unwrap();
        assert!(matches!(
            dipole.update_coeffs(&mut nlist),
            Err(Error::MissingCoefficient { field: "kappa", .. })
        ));
        assert!(!dipole.is_committed());

        dipole.set_pair("A", "A", PairCoefficients::new().kappa(1.0)).unwrap();
        dipole.update_coeffs(&mut nlist).unwrap();
        dipole.update_coeffs(&mut nlist).unwrap();
        assert!(dipole.is_committed());
    }

    #[test]
    fn test_set_params() {
        let mut dipole = PairDipole::new(3.0, &types()).unwrap();
        dipole.set_params_str("no_shift").unwrap();
        dipole.set_params_str("shift").unwrap();
        assert!(dipole.set_params_str("blah").unwrap_err().is_mode_error());
        assert_eq!(
            dipole.set_params_str("xplor"),
            Err(Error::UnsupportedMode("xplor".into()))
        );
        assert_eq!(dipole.mode(), EnergyMode::Shift);
    }

    #[test]
    fn test_declared_radius_follows_override() {
        let mut nlist = CellList::new();
        let mut dipole = PairDipole::new(2.5, &types()).unwrap();
        dipole
            .set_pair("A", "A", PairCoefficients::new().mu(1.0).kappa(1.0))
            .unwrap();
        dipole.declare_radii(&mut nlist);
        let pair = TypePair::new(0, 0);
        assert_relative_eq!(nlist.required_radius(pair).unwrap(), 2.5);

        dipole
            .set_pair("A", "A", PairCoefficients::new().r_cut(2.0))
            .unwrap();
        dipole.update_coeffs(&mut nlist).unwrap();
        assert_relative_eq!(nlist.required_radius(pair).unwrap(), 2.0);
    }

    #[test]
    fn test_compute_axial_fixture() {
        let system = axial_pair(1.0);
        let mut nlist = CellList::new();
        let mut dipole = PairDipole::new(3.0, system.types()).unwrap();
        dipole.set_pair("A", "A", full()).unwrap();
        let mut out = Accumulators::new(system.len());
        let energy = dipole.compute(&system, &mut nlist, &mut out).unwrap();
        assert_relative_eq!(energy, -2.0, epsilon = 1e-12);
        assert_relative_eq!(out.energy[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(out.energy[1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(out.force[0], Vector3::new(-6.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(out.force[1], Vector3::new(6.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(out.net_force(), Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_compute_commits_lazily_and_fails_atomically() {
        let system = axial_pair(1.0);
        let mut nlist = AllPairs::new();
        let mut dipole = PairDipole::new(3.0, system.types()).unwrap();
        let mut out = Accumulators::new(system.len());
        assert!(dipole.compute(&system, &mut nlist, &mut out).is_err());
        assert_eq!(out, Accumulators::new(system.len()));

        let mut wrong_size = Accumulators::new(3);
        dipole.set_pair("A", "A", full()).unwrap();
        assert!(matches!(
            dipole.compute(&system, &mut nlist, &mut wrong_size),
            Err(Error::SizeMismatch { .. })
        ));
        dipole.compute(&system, &mut nlist, &mut out).unwrap();
        assert!(dipole.is_committed());
        assert_eq!(nlist.required_radius(TypePair::new(0, 0)), Some(3.0));
    }

    #[test]
    fn test_compute_beyond_cutoff_and_disabled() {
        let system = axial_pair(2.0);
        let mut nlist = AllPairs::new();
        let mut dipole = PairDipole::new(3.0, system.types()).unwrap();
        dipole
            .set_pair("A", "A", full().r_cut(1.5))
            .unwrap();
        let mut out = Accumulators::new(system.len());
        assert_eq!(dipole.compute(&system, &mut nlist, &mut out).unwrap(), 0.0);
        assert_eq!(out, Accumulators::new(system.len()));

        dipole.set_pair("A", "A", full().r_cut(2.5)).unwrap();
        dipole.disable();
        assert_eq!(dipole.compute(&system, &mut nlist, &mut out).unwrap(), 0.0);
        dipole.enable();
        assert!(dipole.compute(&system, &mut nlist, &mut out).unwrap() < 0.0);
    }

    #[test]
    fn test_shift_mode_through_potential() {
        let system = axial_pair(2.0);
        let mut nlist = AllPairs::new();
        let mut dipole = PairDipole::new(2.0, system.types()).unwrap();
        dipole.set_pair("A", "A", full()).unwrap();
        dipole.set_params(EnergyMode::Shift);
        let mut out = Accumulators::new(system.len());
        let energy = dipole.compute(&system, &mut nlist, &mut out).unwrap();
        assert_relative_eq!(energy, 0.0, epsilon = 1e-12);
        // force is not shifted
        assert_relative_eq!(out.force[0].x, -6.0 / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_body_axis_and_orientation() {
        // body z rotated onto lab x gives the same axial fixture
        let mut system = System::new(SimulationBox::cube(10.0), types());
        let rotation = UnitQuaternion::rotation_between(&Vector3::z(), &Vector3::x()).unwrap();
        system.push(Particle::new(Vector3::new(6.0, 5.0, 5.0), 0).with_orientation(rotation));
        system.push(Particle::new(Vector3::new(5.0, 5.0, 5.0), 0).with_orientation(rotation));
        let mut dipole = PairDipole::new(3.0, system.types())
            .unwrap()
            .with_body_axis(Vector3::z());
        dipole.set_pair("A", "A", full()).unwrap();
        dipole.update_coeffs(&mut AllPairs::new()).unwrap();
        let interaction = dipole.pair_interaction(0, 1, &system).unwrap().unwrap();
        assert_relative_eq!(interaction.energy, -2.0, epsilon = 1e-12);
        assert_relative_eq!(
            dipole.resolved(TypePair::new(0, 0)).unwrap().mu(),
            1.0
        );
    }

    #[test]
    fn test_compute_through_another_neighbor_list() {
        let system = axial_pair(1.0);
        let mut dipole = PairDipole::new(3.0, system.types()).unwrap();
        dipole.set_pair("A", "A", full()).unwrap();
        dipole.update_coeffs(&mut CellList::new()).unwrap();

        let mut nlist = CellList::new();
        let mut out = Accumulators::new(system.len());
        let energy = dipole.compute(&system, &mut nlist, &mut out).unwrap();
        assert_relative_eq!(energy, -2.0, epsilon = 1e-12);
        assert_eq!(nlist.required_radius(TypePair::new(0, 0)), Some(3.0));

        let mut out = Accumulators::new(system.len());
        let energy = dipole.compute(&system, &mut AllPairs::new(), &mut out).unwrap();
        assert_relative_eq!(energy, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_system_types_must_match() {
        let types_ab = TypeRegistry::from_labels(["A", "B"]);
        let mut system = System::new(SimulationBox::cube(10.0), types_ab);
        system.push(Particle::new(Vector3::new(5.0, 5.0, 5.0), 1));
        system.push(Particle::new(Vector3::new(6.0, 5.0, 5.0), 1));
        let mut dipole = PairDipole::new(3.0, &types()).unwrap();
        dipole.set_pair("A", "A", full()).unwrap();
        dipole.update_coeffs(&mut AllPairs::new()).unwrap();

        let mut out = Accumulators::new(system.len());
        let err = dipole
            .compute(&system, &mut AllPairs::new(), &mut out)
            .unwrap_err();
        assert!(err.is_completeness_error());
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(out, Accumulators::new(system.len()));
        assert!(matches!(
            dipole.pair_interaction(0, 1, &system),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(dipole.resolved(TypePair::new(0, 1)), None);
    }

    #[test]
    fn test_unregistered_type_id() {
        let mut system = axial_pair(1.0);
        system.particles_mut()[1].type_id = 3;
        let mut dipole = PairDipole::new(3.0, system.types()).unwrap();
        dipole.set_pair("A", "A", full()).unwrap();
        let mut out = Accumulators::new(system.len());
        assert_eq!(
            dipole.compute(&system, &mut AllPairs::new(), &mut out),
            Err(Error::UnknownTypeId {
                particle: 1,
                type_id: 3
            })
        );
    }

    #[test]
    fn test_pair_interaction_errors() {
        let system = axial_pair(1.0);
        let mut dipole = PairDipole::new(3.0, system.types()).unwrap();
        dipole.set_pair("A", "A", full()).unwrap();
        assert_eq!(dipole.pair_interaction(0, 1, &system), Err(Error::NotCommitted));
        dipole.update_coeffs(&mut AllPairs::new()).unwrap();
        assert_eq!(
            dipole.pair_interaction(0, 2, &system),
            Err(Error::ParticleIndex { index: 2, len: 2 })
        );
        let far = axial_pair(4.0);
        assert_eq!(dipole.pair_interaction(0, 1, &far), Ok(None));
    }

    #[test]
    fn test_invalid_cutoff() {
        assert_eq!(
            PairDipole::new(0.0, &types()).unwrap_err(),
            Error::InvalidCutoff(0.0)
        );
        assert!(PairDipole::new(f64::NAN, &types()).is_err());
    }
}
