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

use crate::Vector3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Orthorhombic box, periodic in all directions
///
/// The box spans `[0, L)` along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct SimulationBox {
    lengths: Vector3,
}

impl SimulationBox {
    pub fn new(lengths: Vector3) -> Self {
        assert!(
            lengths.iter().all(|l| l.is_finite() && *l > 0.0),
            "box lengths must be positive"
        );
        Self { lengths }
    }

    /// Cubic box with side length `side`
    pub fn cube(side: f64) -> Self {
        Self::new(Vector3::from_element(side))
    }

    pub const fn lengths(&self) -> &Vector3 {
        &self.lengths
    }

    pub fn volume(&self) -> f64 {
        self.lengths.product()
    }

    /// Minimum image separation, `a - b`
    #[inline]
    pub fn distance(&self, a: &Vector3, b: &Vector3) -> Vector3 {
        let mut d = a - b;
        self.minimum_image(&mut d);
        d
    }

    /// Fold a separation vector into `[-L/2, L/2]`
    #[inline]
    pub fn minimum_image(&self, d: &mut Vector3) {
        d.iter_mut()
            .zip(self.lengths.iter())
            .for_each(|(x, l)| *x -= l * (*x / l).round());
    }

    /// Wrap a position into `[0, L)`
    #[inline]
    pub fn wrap(&self, pos: &mut Vector3) {
        pos.iter_mut().zip(self.lengths.iter()).for_each(|(x, l)| {
            *x -= l * (*x / l).floor();
            // floor can leave x == l for tiny negative inputs
            if *x >= *l {
                *x -= l;
            }
        });
    }
}
