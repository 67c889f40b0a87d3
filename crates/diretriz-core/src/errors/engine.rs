// ABOUTME: Error taxonomy for the guidelines rule engine and its calculators
// ABOUTME: Configuration errors are raised at rule-save time, measurement errors are non-fatal in preview
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Errors produced by the rule engine components
///
/// Only `UnknownTag` and `InvalidRule` ever reach a caller as hard failures,
/// and only when a rule is saved. During preview every other variant is
/// downgraded to a warning string.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// A condition references a tag outside the canonical vocabulary
    #[error("unknown tag '{tag}' is not part of the canonical vocabulary")]
    UnknownTag {
        /// Offending tag
        tag: String,
    },

    /// A rule failed structural validation
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// Anthropometric protocol code is not in the catalog
    #[error("anthropometric protocol '{0}' not found")]
    UnknownProtocol(String),

    /// Required skinfold sites are missing for the chosen protocol
    #[error("missing measurements for protocol {protocol}: {}", missing.join(", "))]
    MissingMeasurement {
        /// Protocol code
        protocol: String,
        /// Missing skinfold site names
        missing: Vec<String>,
    },

    /// A measurement is present but not physically meaningful
    #[error("invalid measurement '{field}': {reason}")]
    InvalidMeasurement {
        /// Measurement name
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// A lookup input lies outside its reference domain
    #[error("{field} = {value} is outside the reference domain [{min}, {max}]")]
    OutOfRange {
        /// Input name
        field: &'static str,
        /// Offending value, as supplied
        value: f64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },

    /// The RIR matrix has no cell for an in-domain pair
    #[error("no %1RM reference available for RIR {rir} with {reps} reps")]
    RirReferenceNotFound {
        /// RIR level
        rir: u8,
        /// Repetitions
        reps: u8,
    },
}

impl EngineError {
    /// Short machine-readable kind, used as the warning prefix in previews
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTag { .. } => "ConfigurationError",
            Self::InvalidRule(_) => "InvalidRule",
            Self::UnknownProtocol(_) => "UnknownProtocol",
            Self::MissingMeasurement { .. } => "MissingMeasurement",
            Self::InvalidMeasurement { .. } => "InvalidMeasurement",
            Self::OutOfRange { .. } => "OutOfRange",
            Self::RirReferenceNotFound { .. } => "NotFound",
        }
    }

    /// Render as a preview warning (`Kind: message`)
    #[must_use]
    pub fn as_warning(&self) -> String {
        format!("{}: {self}", self.kind())
    }
}
