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

//! Error type shared by the parameter table, mode policy and potential.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while configuring or committing a pair potential.
///
/// Coefficient errors are only raised when the potential is committed
/// (see [`crate::PairDipole::update_coeffs`]); setting coefficients never fails
/// on incomplete input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A required coefficient is not set for a type pair
    #[error("type pair {type_a}-{type_b} is missing coefficient '{field}'")]
    MissingCoefficient {
        type_a: String,
        type_b: String,
        field: &'static str,
    },

    /// A coefficient is set to a value outside its domain
    #[error("type pair {type_a}-{type_b} has invalid {field} = {value}")]
    InvalidCoefficient {
        type_a: String,
        type_b: String,
        field: &'static str,
        value: f64,
    },

    /// Unrecognized energy mode name
    #[error("invalid energy mode '{0}', expected 'no_shift' or 'shift'")]
    InvalidMode(String),

    /// Energy mode known to the framework but undefined for anisotropic pairs
    #[error("energy mode '{0}' is not supported for anisotropic pair potentials")]
    UnsupportedMode(String),

    /// Type label not present in the type registry
    #[error("unknown particle type '{0}'")]
    UnknownType(String),

    /// The system was built on a different type registry than the potential
    #[error("system types {system:?} differ from the potential's types {potential:?}")]
    TypeMismatch {
        potential: Vec<String>,
        system: Vec<String>,
    },

    /// A particle refers to a type id outside the registry
    #[error("particle {particle} has unregistered type id {type_id}")]
    UnknownTypeId { particle: usize, type_id: usize },

    /// Particle index outside the system
    #[error("particle index {index} is out of range for {len} particles")]
    ParticleIndex { index: usize, len: usize },

    /// Coefficients must be committed before single pairs can be evaluated
    #[error("coefficients are not committed; call update_coeffs first")]
    NotCommitted,

    /// Default cutoff must be positive and finite
    #[error("invalid cutoff radius {0}")]
    InvalidCutoff(f64),

    /// Neighbor search radius exceeds half the shortest box length
    #[error("neighbor list radius {radius} exceeds half the box length {half_box}")]
    RadiusTooLarge { radius: f64, half_box: f64 },

    /// Output accumulators do not match the number of particles
    #[error("accumulators hold {accumulators} particles but the system has {particles}")]
    SizeMismatch {
        accumulators: usize,
        particles: usize,
    },
}

impl Error {
    /// True if the error signals incomplete or invalid pair coefficients,
    /// including particle types that have no coefficients at all
    pub const fn is_completeness_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCoefficient { .. }
                | Self::InvalidCoefficient { .. }
                | Self::TypeMismatch { .. }
                | Self::UnknownTypeId { .. }
        )
    }

    /// True if the error was raised when selecting an energy mode
    pub const fn is_mode_error(&self) -> bool {
        matches!(self, Self::InvalidMode(_) | Self::UnsupportedMode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let missing = Error::MissingCoefficient {
            type_a: "A".into(),
            type_b: "B".into(),
            field: "mu",
        };
        assert!(missing.is_completeness_error());
        assert!(!missing.is_mode_error());
        assert_eq!(
            missing.to_string(),
            "type pair A-B is missing coefficient 'mu'"
        );
        assert!(Error::UnsupportedMode("xplor".into()).is_mode_error());
        assert!(Error::InvalidMode("blah".into()).is_mode_error());
        assert!(!Error::UnknownType("C".into()).is_completeness_error());
        let mismatch = Error::TypeMismatch {
            potential: vec!["A".into()],
            system: vec!["A".into(), "B".into()],
        };
        assert!(mismatch.is_completeness_error());
        assert_eq!(
            mismatch.to_string(),
            r#"system types ["A", "B"] differ from the potential's types ["A"]"#
        );
        assert!(!Error::NotCommitted.is_completeness_error());
    }
}
