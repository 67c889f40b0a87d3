// ABOUTME: Body composition calculator over skinfold protocols
// ABOUTME: Density regression, Siri or Brozek fat percentage, and fat and lean mass
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::AnthropometryConfig;
use diretriz_core::catalog::ProtocolCatalog;
use diretriz_core::constants::anthropometry::precision;
use diretriz_core::errors::EngineError;
use diretriz_core::models::{AnthroInput, AnthroProtocol, AnthroSnapshot, Sex};
use std::collections::BTreeMap;
use tracing::debug;

/// Validated measurements for one computation
#[derive(Debug, Clone, PartialEq)]
pub struct Measurements<'a> {
    /// Body mass (kg)
    pub massa_kg: f64,
    /// Height (m)
    pub estatura_m: f64,
    /// Age (years)
    pub idade: f64,
    /// Skinfold thicknesses (mm) by site
    pub skinfolds_mm: &'a BTreeMap<String, f64>,
}

/// Student attributes that influence the computation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StudentProfile {
    /// Age in years, when known
    pub idade: Option<f64>,
    /// Sex, when known
    pub sexo: Option<Sex>,
}

/// Snapshot plus the non-fatal notes produced while computing it
#[derive(Debug, Clone, PartialEq)]
pub struct AnthropometryOutcome {
    /// Computed body composition
    pub snapshot: AnthroSnapshot,
    /// Fallbacks and mismatches worth surfacing
    pub warnings: Vec<String>,
}

/// Calculator bound to a protocol catalog and fallback settings
#[derive(Debug, Clone)]
pub struct AnthropometryCalculator<'a> {
    catalog: &'a ProtocolCatalog,
    config: &'a AnthropometryConfig,
}

impl<'a> AnthropometryCalculator<'a> {
    /// Create a calculator
    #[must_use]
    pub const fn new(catalog: &'a ProtocolCatalog, config: &'a AnthropometryConfig) -> Self {
        Self { catalog, config }
    }

    /// Compute body composition for a protocol
    ///
    /// Missing sites are reported together and never replaced by zero.
    ///
    /// # Errors
    ///
    /// Returns `MissingMeasurement` when a required site is absent and
    /// `InvalidMeasurement` for non-positive inputs or a degenerate density.
    pub fn compute(
        protocol: &AnthroProtocol,
        measurements: &Measurements<'_>,
    ) -> Result<AnthroSnapshot, EngineError> {
        let missing = protocol.missing_sites(measurements.skinfolds_mm);
        if !missing.is_empty() {
            return Err(EngineError::MissingMeasurement {
                protocol: protocol.code.clone(),
                missing,
            });
        }

        positive("massa_kg", measurements.massa_kg)?;
        let mut sum = 0.0;
        for site in &protocol.skinfolds {
            if let Some(&value) = measurements.skinfolds_mm.get(site) {
                positive(site, value)?;
                sum += value;
            }
        }

        let density = protocol
            .density_equation
            .density(sum, measurements.idade);
        if !density.is_finite() || density <= 0.0 {
            return Err(EngineError::InvalidMeasurement {
                field: "densidade".into(),
                reason: format!("computed density {density} is not physically meaningful"),
            });
        }

        let pct = protocol.fat_equation.formula.percent_fat(density);
        let fat_mass = pct / 100.0 * measurements.massa_kg;
        let lean_mass = measurements.massa_kg - fat_mass;

        debug!(
            protocol = %protocol.code,
            skinfold_sum = sum,
            density,
            pct_fat = pct,
            "Computed body composition"
        );

        Ok(AnthroSnapshot {
            protocolo: protocol.code.clone(),
            densidade: round_to(density, precision::DENSITY),
            pct_gordura: round_to(pct, precision::FAT_PERCENT),
            mg_kg: round_to(fat_mass, precision::MASS),
            mm_kg: round_to(lean_mass, precision::MASS),
            soma_dobras_mm: round_to(sum, precision::MASS),
            idade_usada: measurements.idade,
            estatura_m: measurements.estatura_m,
        })
    }

    /// Resolve the protocol and fallbacks from a preview payload, then compute
    ///
    /// # Errors
    ///
    /// Returns `UnknownProtocol`, `MissingMeasurement`, or `InvalidMeasurement`
    /// when the inputs cannot produce a trustworthy snapshot.
    pub fn compute_from_input(
        &self,
        input: &AnthroInput,
        student: StudentProfile,
    ) -> Result<AnthropometryOutcome, EngineError> {
        let code = input
            .protocolo_code
            .as_deref()
            .ok_or_else(|| EngineError::InvalidMeasurement {
                field: "protocolo_code".into(),
                reason: "a protocol code is required".into(),
            })?;
        let protocol = self.catalog.get(code)?;
        let massa_kg = input
            .massa_kg
            .ok_or_else(|| EngineError::MissingMeasurement {
                protocol: protocol.code.clone(),
                missing: vec!["massa_kg".into()],
            })?;

        let mut warnings = Vec::new();

        let idade = match student.idade {
            Some(idade) => idade,
            None => {
                if protocol.density_equation.uses_age() {
                    warnings.push(format!(
                        "Idade do aluno não informada; usando {} anos no protocolo {}",
                        self.config.default_age_years, protocol.code
                    ));
                }
                self.config.default_age_years
            }
        };

        let estatura_m = input
            .estatura_m
            .or_else(|| input.estatura_cm.map(|cm| cm / 100.0))
            .unwrap_or(self.config.default_height_m);

        if let Some(sexo) = student.sexo {
            if !protocol.sexo.accepts(sexo) {
                warnings.push(format!(
                    "Protocolo {} é validado para sexo {}, aluno informado como {}",
                    protocol.code, protocol.sexo, sexo
                ));
            }
        }

        let snapshot = Self::compute(
            protocol,
            &Measurements {
                massa_kg,
                estatura_m,
                idade,
                skinfolds_mm: &input.skinfolds_mm,
            },
        )?;

        Ok(AnthropometryOutcome { snapshot, warnings })
    }
}

fn positive(field: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidMeasurement {
            field: field.to_owned(),
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

/// Round half away from zero to a number of decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
