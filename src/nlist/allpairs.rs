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

use super::{NeighborList, NeighborPair, RadiusTable};
use crate::particle::System;
use crate::types::TypePair;
use crate::{Error, Result};
use itertools::Itertools;

/// Exhaustive O(N²) enumeration of all particle pairs
///
/// Useful for small systems and as a reference for other lists.
#[derive(Clone, Debug, Default)]
pub struct AllPairs {
    radii: RadiusTable,
}

impl AllPairs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NeighborList for AllPairs {
    fn declare_required_radius(&mut self, pair: TypePair, radius: f64) {
        self.radii.declare(pair, radius);
    }

    fn required_radius(&self, pair: TypePair) -> Option<f64> {
        self.radii.get(pair)
    }

    fn update(&mut self, system: &System) -> Result<()> {
        let half_box = 0.5 * system.cell().lengths().min();
        match self.radii.max() {
            Some(radius) if radius > half_box => Err(Error::RadiusTooLarge { radius, half_box }),
            _ => Ok(()),
        }
    }

    fn pairs<'a>(&'a self, system: &'a System) -> impl Iterator<Item = NeighborPair> + 'a {
        (0..system.len())
            .tuple_combinations()
            .map(|(i, j)| NeighborPair {
                i,
                j,
                distance: system.distance(i, j),
            })
            .filter(|pair| self.radii.accepts(system, pair))
    }
}
