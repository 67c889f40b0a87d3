// ABOUTME: Reference matrix mapping reps in reserve and repetitions to a %1RM load
// ABOUTME: Rows are RIR levels, columns repetition counts starting at one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// One cell of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RirEntry {
    /// Reps in reserve
    pub rir: u8,
    /// Repetitions performed
    pub reps: u8,
    /// Load as a percentage of one-repetition maximum
    pub pct_1rm: u8,
}

/// One row of the matrix as served to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RirRow {
    /// Reps in reserve
    pub rir: u8,
    /// `%1RM` for 1, 2, ... repetitions
    pub pct_1rm_by_reps: Vec<u8>,
}

/// Dense `(rir, reps) -> %1RM` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RirMatrix {
    rows: Vec<RirRow>,
}

impl RirMatrix {
    /// Build a matrix from its rows
    #[must_use]
    pub const fn new(rows: Vec<RirRow>) -> Self {
        Self { rows }
    }

    /// Matrix rows in ascending RIR order
    #[must_use]
    pub fn rows(&self) -> &[RirRow] {
        &self.rows
    }

    /// Cell lookup, `None` when the matrix has no value for the pair
    #[must_use]
    pub fn get(&self, rir: u8, reps: u8) -> Option<RirEntry> {
        let row = self.rows.iter().find(|row| row.rir == rir)?;
        let index = usize::from(reps.checked_sub(1)?);
        row.pct_1rm_by_reps.get(index).map(|&pct_1rm| RirEntry {
            rir,
            reps,
            pct_1rm,
        })
    }
}
