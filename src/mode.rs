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

//! Energy modes at the cutoff.

use crate::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Treatment of the pair energy at the cutoff distance
///
/// Smoothing (XPLOR) is not defined for orientation dependent potentials
/// and is rejected when parsed:
///
/// ~~~
/// use dipolar::{EnergyMode, Error};
/// assert_eq!("shift".parse::<EnergyMode>(), Ok(EnergyMode::Shift));
/// assert!(matches!("xplor".parse::<EnergyMode>(), Err(Error::UnsupportedMode(_))));
/// assert!(matches!("blah".parse::<EnergyMode>(), Err(Error::InvalidMode(_))));
/// ~~~
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "snake_case")
)]
pub enum EnergyMode {
    /// Energy is truncated at the cutoff
    #[default]
    NoShift,
    /// Energy at the cutoff is subtracted so that it vanishes at the cutoff
    Shift,
}

impl EnergyMode {
    /// Name of the smoothing mode that anisotropic potentials reject
    const XPLOR: &'static str = "xplor";

    pub const fn name(&self) -> &'static str {
        match self {
            Self::NoShift => "no_shift",
            Self::Shift => "shift",
        }
    }

    /// Whether the energy at the cutoff is subtracted
    pub const fn is_shifted(&self) -> bool {
        matches!(self, Self::Shift)
    }
}

impl Display for EnergyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EnergyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_shift" => Ok(Self::NoShift),
            "shift" => Ok(Self::Shift),
            Self::XPLOR => Err(Error::UnsupportedMode(s.to_string())),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip_names() {
        for mode in [EnergyMode::NoShift, EnergyMode::Shift] {
            assert_eq!(mode.name().parse::<EnergyMode>(), Ok(mode));
        }
        assert_eq!(EnergyMode::default(), EnergyMode::NoShift);
        assert!(EnergyMode::Shift.is_shifted());
        assert!(!EnergyMode::NoShift.is_shifted());
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(
            "xplor".parse::<EnergyMode>(),
            Err(Error::UnsupportedMode("xplor".into()))
        );
        assert_eq!(
            "blah".parse::<EnergyMode>(),
            Err(Error::InvalidMode("blah".into()))
        );
        // names are case sensitive
        assert!("Shift".parse::<EnergyMode>().is_err());
    }
}
