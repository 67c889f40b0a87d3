// ABOUTME: Built-in RIR to %1RM reference table
// ABOUTME: Six RIR levels (5 to 10) by twenty repetition counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::rir_domain::RIR_MIN;
use crate::models::rir::{RirMatrix, RirRow};
use std::sync::LazyLock;

const TABLE: [[u8; 20]; 6] = [
    [100, 95, 93, 90, 87, 85, 83, 80, 77, 75, 70, 67, 65, 62, 60, 57, 55, 52, 50, 47],
    [95, 93, 90, 87, 85, 83, 80, 77, 75, 72, 70, 67, 65, 62, 60, 57, 55, 52, 50, 47],
    [93, 90, 87, 85, 83, 80, 77, 75, 72, 70, 67, 65, 62, 60, 57, 55, 52, 50, 47, 45],
    [90, 87, 85, 83, 80, 77, 75, 72, 70, 67, 65, 62, 60, 57, 55, 52, 50, 47, 45, 42],
    [87, 85, 83, 80, 77, 75, 72, 70, 67, 65, 62, 60, 57, 55, 52, 50, 47, 45, 42, 40],
    [85, 83, 80, 77, 75, 72, 70, 67, 65, 62, 60, 57, 55, 52, 50, 47, 45, 42, 40, 37],
];

static BUILTIN: LazyLock<RirMatrix> = LazyLock::new(|| {
    RirMatrix::new(
        (RIR_MIN..)
            .zip(TABLE.iter())
            .map(|(rir, row)| RirRow {
                rir,
                pct_1rm_by_reps: row.to_vec(),
            })
            .collect(),
    )
});

/// The built-in reference matrix
#[must_use]
pub fn builtin() -> &'static RirMatrix {
    &BUILTIN
}
