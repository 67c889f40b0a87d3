// ABOUTME: RIR resolver translating reps in reserve and repetitions into a %1RM reference
// ABOUTME: Inputs outside the matrix domain are reported as OutOfRange, never as a panic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use diretriz_core::catalog;
use diretriz_core::constants::rir_domain::{REPS_MAX, REPS_MIN, RIR_MAX, RIR_MIN};
use diretriz_core::errors::EngineError;
use diretriz_core::models::{RirEntry, RirMatrix};

/// Table lookup over a RIR matrix
#[derive(Debug, Clone, Copy)]
pub struct RirResolver<'a> {
    matrix: &'a RirMatrix,
}

impl RirResolver<'static> {
    /// Resolver over the built-in matrix
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(catalog::rir::builtin())
    }
}

impl<'a> RirResolver<'a> {
    /// Resolver over a specific matrix
    #[must_use]
    pub const fn new(matrix: &'a RirMatrix) -> Self {
        Self { matrix }
    }

    /// Look up the %1RM for a RIR level and repetition count
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` when either input lies outside the matrix domain
    /// and `RirReferenceNotFound` when the matrix has no cell for the pair.
    pub fn lookup(&self, rir: i64, reps: i64) -> Result<RirEntry, EngineError> {
        let rir = in_domain("rir", rir, RIR_MIN, RIR_MAX)?;
        let reps = in_domain("reps", reps, REPS_MIN, REPS_MAX)?;
        self.matrix
            .get(rir, reps)
            .ok_or(EngineError::RirReferenceNotFound { rir, reps })
    }
}

fn in_domain(field: &'static str, value: i64, min: u8, max: u8) -> Result<u8, EngineError> {
    u8::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or(EngineError::OutOfRange {
            field,
            value: value as f64,
            min: i64::from(min),
            max: i64::from(max),
        })
}
