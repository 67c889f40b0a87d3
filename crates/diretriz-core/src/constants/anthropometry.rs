// ABOUTME: Body composition constants for skinfold protocols
// ABOUTME: Siri and Brozek conversion coefficients plus fallback anthropometric values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Siri (1961): `%G = (4.95 / D - 4.50) * 100`
pub mod siri {
    /// Numerator coefficient
    pub const A: f64 = 4.95;
    /// Subtracted constant
    pub const B: f64 = 4.50;
}

/// Brozek (1963): `%G = (4.57 / D - 4.142) * 100`
pub mod brozek {
    /// Numerator coefficient
    pub const A: f64 = 4.57;
    /// Subtracted constant
    pub const B: f64 = 4.142;
}

/// Age assumed when the student's age is not supplied
pub const DEFAULT_AGE_YEARS: f64 = 40.0;

/// Height assumed when neither metres nor centimetres are supplied
pub const DEFAULT_HEIGHT_M: f64 = 1.75;

/// Rounding precision of the snapshot outputs (decimal places)
pub mod precision {
    /// Body density
    pub const DENSITY: i32 = 3;
    /// Fat percentage
    pub const FAT_PERCENT: i32 = 2;
    /// Fat and lean mass
    pub const MASS: i32 = 1;
}
