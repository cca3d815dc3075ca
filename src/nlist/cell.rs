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

//! Buffered neighbor list built from a periodic cell grid.

use super::{NeighborList, NeighborPair, RadiusTable, SimulationBox};
use crate::particle::System;
use crate::types::TypePair;
use crate::{Error, Result, Vector3};
use itertools::iproduct;
use std::collections::HashSet;

/// Verlet list built from a linked cell grid
///
/// Candidate pairs are stored out to the largest declared radius plus a
/// buffer, `r_buff`. The list is rebuilt when a declared radius changes, the
/// particle count or the box changes, or any particle moved more than
/// `r_buff / 2` since the last build.
#[derive(Clone, Debug)]
pub struct CellList {
    radii: RadiusTable,
    /// Skin distance added to the largest declared radius
    r_buff: f64,
    /// Particle index pairs, `i < j`, that never interact
    exclusions: HashSet<(usize, usize)>,
    /// Candidate pairs from the last build, `i < j`
    candidates: Vec<(usize, usize)>,
    /// Positions at the last build
    reference_positions: Vec<Vector3>,
    /// Box at the last build
    reference_box: Option<SimulationBox>,
    stale: bool,
    rebuilds: usize,
}

impl Default for CellList {
    fn default() -> Self {
        Self::new()
    }
}

impl CellList {
    /// Default skin distance
    pub const DEFAULT_BUFFER: f64 = 0.4;

    pub fn new() -> Self {
        Self::with_buffer(Self::DEFAULT_BUFFER)
    }

    pub fn with_buffer(r_buff: f64) -> Self {
        assert!(r_buff >= 0.0, "buffer must be non-negative");
        Self {
            radii: RadiusTable::default(),
            r_buff,
            exclusions: HashSet::new(),
            candidates: Vec::new(),
            reference_positions: Vec::new(),
            reference_box: None,
            stale: true,
            rebuilds: 0,
        }
    }

    pub const fn buffer(&self) -> f64 {
        self.r_buff
    }

    /// Never enumerate the pair (i, j)
    pub fn add_exclusion(&mut self, i: usize, j: usize) {
        self.exclusions.insert((i.min(j), i.max(j)));
        self.stale = true;
    }

    /// Number of times the candidate list was rebuilt
    pub const fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Number of stored candidate pairs
    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    fn needs_rebuild(&self, system: &System) -> bool {
        if self.stale
            || self.reference_positions.len() != system.len()
            || self.reference_box.as_ref() != Some(system.cell())
        {
            return true;
        }
        let max_squared = (0.5 * self.r_buff).powi(2);
        system
            .particles()
            .iter()
            .zip(&self.reference_positions)
            .any(|(p, old)| system.cell().distance(&p.pos, old).norm_squared() > max_squared)
    }

    fn rebuild(&mut self, system: &System, radius: f64) {
        let grid = CellGrid::new(system.cell(), radius);
        let mut members = vec![Vec::new(); grid.len()];
        for (i, particle) in system.particles().iter().enumerate() {
            members[grid.index_of(system.cell(), &particle.pos)].push(i);
        }
        let radius_squared = radius * radius;
        self.candidates.clear();
        for (cell, particles) in members.iter().enumerate() {
            let neighbors = grid.neighbors(cell);
            for &i in particles {
                for &j in neighbors.iter().flat_map(|&n| &members[n]) {
                    if j <= i || self.exclusions.contains(&(i, j)) {
                        continue;
                    }
                    if system.distance(i, j).norm_squared() <= radius_squared {
                        self.candidates.push((i, j));
                    }
                }
            }
        }
        self.candidates.sort_unstable();
        self.reference_positions = system.particles().iter().map(|p| p.pos).collect();
        self.reference_box = Some(*system.cell());
        self.stale = false;
        self.rebuilds += 1;
        log::debug!(
            "neighbor list rebuilt: {} cells, {} candidate pairs within {:.3}",
            grid.len(),
            self.candidates.len(),
            radius
        );
    }
}

impl NeighborList for CellList {
    fn declare_required_radius(&mut self, pair: TypePair, radius: f64) {
        if self.radii.declare(pair, radius) {
            log::trace!("required radius of type pair {pair} set to {radius}");
            self.stale = true;
        }
    }

    fn required_radius(&self, pair: TypePair) -> Option<f64> {
        self.radii.get(pair)
    }

    fn update(&mut self, system: &System) -> Result<()> {
        let Some(max_radius) = self.radii.max() else {
            self.candidates.clear();
            return Ok(());
        };
        let radius = max_radius + self.r_buff;
        let half_box = 0.5 * system.cell().lengths().min();
        if radius > half_box {
            return Err(Error::RadiusTooLarge { radius, half_box });
        }
        if self.needs_rebuild(system) {
            self.rebuild(system, radius);
        }
        Ok(())
    }

    fn pairs<'a>(&'a self, system: &'a System) -> impl Iterator<Item = NeighborPair> + 'a {
        self.candidates
            .iter()
            .map(|&(i, j)| NeighborPair {
                i,
                j,
                distance: system.distance(i, j),
            })
            .filter(|pair| self.radii.accepts(system, pair))
    }
}

/// Regular grid of cells with edges no shorter than the search radius
#[derive(Clone, Debug)]
struct CellGrid {
    dims: [usize; 3],
}

impl CellGrid {
    fn new(cell: &SimulationBox, radius: f64) -> Self {
        let lengths = cell.lengths();
        let dim = |l: f64| ((l / radius).floor() as usize).max(1);
        Self {
            dims: [dim(lengths.x), dim(lengths.y), dim(lengths.z)],
        }
    }

    const fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    const fn flatten(&self, [x, y, z]: [usize; 3]) -> usize {
        x + self.dims[0] * (y + self.dims[1] * z)
    }

    fn index_of(&self, cell: &SimulationBox, pos: &Vector3) -> usize {
        let mut wrapped = *pos;
        cell.wrap(&mut wrapped);
        let mut coord = [0; 3];
        for (k, c) in coord.iter_mut().enumerate() {
            let fraction = wrapped[k] / cell.lengths()[k];
            *c = ((fraction * self.dims[k] as f64) as usize).min(self.dims[k] - 1);
        }
        self.flatten(coord)
    }

    /// Indices of the cell and its periodic neighbors, without duplicates.
    ///
    /// Duplicates occur when a dimension has fewer than three cells.
    fn neighbors(&self, index: usize) -> Vec<usize> {
        let [nx, ny, nz] = self.dims;
        let (x, y, z) = (index % nx, (index / nx) % ny, index / (nx * ny));
        let shift = |c: usize, d: isize, n: usize| (c as isize + d).rem_euclid(n as isize) as usize;
        let mut neighbors: Vec<usize> = iproduct!(-1..=1, -1..=1, -1..=1)
            .map(|(dx, dy, dz)| self.flatten([shift(x, dx, nx), shift(y, dy, ny), shift(z, dz, nz)]))
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }
}
