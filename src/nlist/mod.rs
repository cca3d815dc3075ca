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

//! # Neighbor lists
//!
//! A pair potential learns nothing about space; it only tells the neighbor list
//! how far it needs to look for each type pair via
//! [`NeighborList::declare_required_radius`], and then consumes the pairs the
//! list enumerates. An undeclared or stale radius silently drops interactions,
//! so potentials re-declare all radii whenever they commit their coefficients.

use crate::particle::System;
use crate::types::TypePair;
use crate::{Result, Vector3};
use std::collections::HashMap;

mod allpairs;
mod cell;
mod simbox;
pub use allpairs::AllPairs;
pub use cell::CellList;
pub use simbox::SimulationBox;

/// Candidate interaction between particles `i < j`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborPair {
    pub i: usize,
    pub j: usize,
    /// Minimum image separation, r_i - r_j
    pub distance: Vector3,
}

/// Spatial pair enumeration as required by pair potentials
pub trait NeighborList {
    /// Declare the interaction radius needed for a type pair; the last declaration wins
    fn declare_required_radius(&mut self, pair: TypePair, radius: f64);

    /// Currently declared radius of a type pair
    fn required_radius(&self, pair: TypePair) -> Option<f64>;

    /// Bring the list up to date with the particle snapshot
    fn update(&mut self, system: &System) -> Result<()>;

    /// Lazily enumerate pairs within the declared radius of their type pair.
    ///
    /// Only valid after [`NeighborList::update`] with the same snapshot.
    fn pairs<'a>(&'a self, system: &'a System) -> impl Iterator<Item = NeighborPair> + 'a;
}

/// Declared radii per type pair
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadiusTable {
    radii: HashMap<TypePair, f64>,
}

impl RadiusTable {
    /// Store a radius and report whether the stored value changed
    pub fn declare(&mut self, pair: TypePair, radius: f64) -> bool {
        self.radii.insert(pair, radius) != Some(radius)
    }

    pub fn get(&self, pair: TypePair) -> Option<f64> {
        self.radii.get(&pair).copied()
    }

    /// Largest declared radius, or `None` if nothing is declared
    pub fn max(&self) -> Option<f64> {
        self.radii.values().copied().reduce(f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Keep a pair if its separation is within the radius declared for its types
    #[inline]
    pub(crate) fn accepts(&self, system: &System, pair: &NeighborPair) -> bool {
        let particles = system.particles();
        let types = TypePair::new(particles[pair.i].type_id, particles[pair.j].type_id);
        self.get(types)
            .is_some_and(|radius| pair.distance.norm_squared() <= radius * radius)
    }
}
