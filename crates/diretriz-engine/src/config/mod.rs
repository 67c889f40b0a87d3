// ABOUTME: Engine configuration with environment overrides and validation
// ABOUTME: Anthropometric fallbacks, rule authoring limits, and preview defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Configuration error types
pub mod error;

pub use error::ConfigError;

use diretriz_core::constants::anthropometry::{DEFAULT_AGE_YEARS, DEFAULT_HEIGHT_M};
use diretriz_core::models::{AerobicMethod, RuleLimits};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Fallbacks used by the body composition calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropometryConfig {
    /// Age (years) assumed when the student's age is not supplied
    pub default_age_years: f64,
    /// Height (m) assumed when none is supplied
    pub default_height_m: f64,
}

impl Default for AnthropometryConfig {
    fn default() -> Self {
        Self {
            default_age_years: DEFAULT_AGE_YEARS,
            default_height_m: DEFAULT_HEIGHT_M,
        }
    }
}

/// Preview behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Method used for the default aerobic band when the request names none
    pub default_aerobic_method: AerobicMethod,
    /// Rule count above which selection runs on the rayon pool
    pub parallel_selection_threshold: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            default_aerobic_method: AerobicMethod::Fcr,
            parallel_selection_threshold: 256,
        }
    }
}

/// Main engine configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Body composition fallbacks
    pub anthropometry: AnthropometryConfig,
    /// Rule authoring limits
    pub limits: RuleLimits,
    /// Preview defaults
    pub preview: PreviewConfig,
}

impl EngineConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValueOutOfRange` for values no student could have
    pub fn validate(&self) -> Result<(), ConfigError> {
        let anthro = &self.anthropometry;
        if !(1.0..=120.0).contains(&anthro.default_age_years) {
            return Err(ConfigError::ValueOutOfRange(
                "default age must be between 1 and 120 years",
            ));
        }
        if !(0.5..=2.5).contains(&anthro.default_height_m) {
            return Err(ConfigError::ValueOutOfRange(
                "default height must be between 0.5 and 2.5 metres",
            ));
        }
        if self.limits.max_contraindicacoes == 0 || self.limits.max_observacoes == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "list limits must allow at least one entry",
            ));
        }
        if self.limits.max_text_len == 0 || self.limits.max_focus_len == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "text limits must allow at least one character",
            ));
        }
        if self.preview.parallel_selection_threshold == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "parallel selection threshold must be positive",
            ));
        }
        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        Self::apply_env_var(
            "DIRETRIZ_DEFAULT_AGE_YEARS",
            &mut self.anthropometry.default_age_years,
        )?;
        Self::apply_env_var(
            "DIRETRIZ_DEFAULT_HEIGHT_M",
            &mut self.anthropometry.default_height_m,
        )?;
        Self::apply_env_var(
            "DIRETRIZ_MAX_CONTRAINDICACOES",
            &mut self.limits.max_contraindicacoes,
        )?;
        Self::apply_env_var("DIRETRIZ_MAX_OBSERVACOES", &mut self.limits.max_observacoes)?;
        Self::apply_env_var("DIRETRIZ_MAX_TEXT_LEN", &mut self.limits.max_text_len)?;
        Self::apply_env_var(
            "DIRETRIZ_DEFAULT_AEROBIC_METHOD",
            &mut self.preview.default_aerobic_method,
        )?;
        Self::apply_env_var(
            "DIRETRIZ_PARALLEL_SELECTION_THRESHOLD",
            &mut self.preview.parallel_selection_threshold,
        )?;
        Ok(self)
    }
}
