// ABOUTME: Skinfold protocol definitions and body composition snapshot types
// ABOUTME: Density models are a closed enum so every protocol is checked at compile time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::anthropometry::{brozek, siri};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Biological sex a protocol was validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Male
    #[serde(rename = "M")]
    Male,
    /// Female
    #[serde(rename = "F")]
    Female,
    /// Any sex
    #[serde(rename = "ANY")]
    Any,
}

impl Sex {
    /// Whether a protocol for `self` applies to a student of sex `other`
    #[must_use]
    pub const fn accepts(&self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Any, _) | (_, Self::Any) | (Self::Male, Self::Male) | (Self::Female, Self::Female)
        )
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("M"),
            Self::Female => f.write_str("F"),
            Self::Any => f.write_str("ANY"),
        }
    }
}

/// Body density regression over the sum of skinfolds `S` (mm) and age `A` (years)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DensityEquation {
    /// `D = intercept - sum * S + sum_sq * S^2 - age * A`
    Quadratic {
        /// Constant term
        intercept: f64,
        /// Linear coefficient of the skinfold sum
        sum: f64,
        /// Quadratic coefficient of the skinfold sum
        sum_sq: f64,
        /// Age coefficient
        age: f64,
    },
    /// `D = intercept - slope * log10(S)`
    Log10 {
        /// Constant term
        intercept: f64,
        /// Slope over `log10(S)`
        slope: f64,
    },
}

impl DensityEquation {
    /// Evaluate the body density for a skinfold sum and age
    #[must_use]
    pub fn density(&self, skinfold_sum: f64, age_years: f64) -> f64 {
        match *self {
            Self::Quadratic {
                intercept,
                sum,
                sum_sq,
                age,
            } => {
                sum_sq.mul_add(
                    skinfold_sum * skinfold_sum,
                    age.mul_add(-age_years, sum.mul_add(-skinfold_sum, intercept)),
                )
            }
            Self::Log10 { intercept, slope } => slope.mul_add(-skinfold_sum.log10(), intercept),
        }
    }

    /// Whether the model uses the student's age
    #[must_use]
    pub const fn uses_age(&self) -> bool {
        matches!(self, Self::Quadratic { .. })
    }
}

/// Density to fat-percentage conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FatFormula {
    /// Siri (1961)
    Siri,
    /// Brozek (1963)
    Brozek,
}

impl FatFormula {
    /// Convert body density (g/ml) to fat percentage
    #[must_use]
    pub fn percent_fat(&self, density: f64) -> f64 {
        let (a, b) = match self {
            Self::Siri => (siri::A, siri::B),
            Self::Brozek => (brozek::A, brozek::B),
        };
        (a / density - b) * 100.0
    }

    /// Human-readable formula
    #[must_use]
    pub const fn equation(&self) -> &'static str {
        match self {
            Self::Siri => "%G = (4.95 / D - 4.50) * 100",
            Self::Brozek => "%G = (4.57 / D - 4.142) * 100",
        }
    }
}

/// Named fat formula with its printable equation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatEquation {
    /// Formula applied to body density
    pub formula: FatFormula,
    /// Printable form of the formula
    pub equation: String,
}

impl From<FatFormula> for FatEquation {
    fn from(formula: FatFormula) -> Self {
        Self {
            formula,
            equation: formula.equation().to_owned(),
        }
    }
}

/// Skinfold protocol used to estimate body composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthroProtocol {
    /// Stable code, e.g. `JP7_H_M`
    pub code: String,
    /// Display name
    pub name: String,
    /// Coefficient set revision
    pub version_tag: String,
    /// Population the equation was validated for
    pub sexo: Sex,
    /// Required skinfold sites
    pub skinfolds: Vec<String>,
    /// Body density model
    pub density_equation: DensityEquation,
    /// Fat percentage formula
    pub fat_equation: FatEquation,
}

impl AnthroProtocol {
    /// Skinfold sites required by the protocol but absent from `measured`
    #[must_use]
    pub fn missing_sites(&self, measured: &BTreeMap<String, f64>) -> Vec<String> {
        self.skinfolds
            .iter()
            .filter(|site| !measured.contains_key(site.as_str()))
            .cloned()
            .collect()
    }
}

/// Anthropometric inputs supplied with a preview
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnthroInput {
    /// Body mass (kg)
    #[serde(default)]
    pub massa_kg: Option<f64>,
    /// Height in metres
    #[serde(default)]
    pub estatura_m: Option<f64>,
    /// Height in centimetres (used when metres are absent)
    #[serde(default)]
    pub estatura_cm: Option<f64>,
    /// Protocol code
    #[serde(default)]
    pub protocolo_code: Option<String>,
    /// Skinfold thicknesses (mm) by site
    #[serde(default)]
    pub skinfolds_mm: BTreeMap<String, f64>,
}

/// Computed body composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthroSnapshot {
    /// Protocol code used
    pub protocolo: String,
    /// Body density (g/ml)
    pub densidade: f64,
    /// Fat percentage
    pub pct_gordura: f64,
    /// Fat mass (kg)
    pub mg_kg: f64,
    /// Lean mass (kg)
    pub mm_kg: f64,
    /// Sum of the protocol's skinfolds (mm)
    pub soma_dobras_mm: f64,
    /// Age used by the density model
    pub idade_usada: f64,
    /// Height used (m)
    pub estatura_m: f64,
}
