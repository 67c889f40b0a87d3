// ABOUTME: Built-in skinfold protocol catalog (Jackson & Pollock 3/4/7, Durnin & Womersley)
// ABOUTME: Each protocol names its required sites, density regression, and fat formula
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::EngineError;
use crate::models::anthropometry::{AnthroProtocol, DensityEquation, FatFormula, Sex};
use serde::Serialize;
use std::sync::LazyLock;

const SEVEN_SITES: [&str; 7] = [
    "tricipital",
    "peitoral",
    "subescapular",
    "suprailíaca",
    "axilar_media",
    "abdominal",
    "coxa",
];
const THREE_SITES: [&str; 3] = ["peitoral", "abdominal", "coxa"];
const FOUR_SITES: [&str; 4] = ["peitoral", "abdominal", "coxa", "tricipital"];
const DURNIN_SITES: [&str; 4] = ["tricipital", "bicipital", "subescapular", "suprailíaca"];

const JP3_MALE: DensityEquation = DensityEquation::Quadratic {
    intercept: 1.10938,
    sum: 0.000_826_7,
    sum_sq: 0.000_001_6,
    age: 0.000_257_4,
};
const JP3_FEMALE: DensityEquation = DensityEquation::Quadratic {
    intercept: 1.099_492_1,
    sum: 0.000_992_9,
    sum_sq: 0.000_002_3,
    age: 0.000_139_2,
};

fn protocol(
    code: &str,
    name: &str,
    version_tag: &str,
    sexo: Sex,
    sites: &[&str],
    density_equation: DensityEquation,
) -> AnthroProtocol {
    AnthroProtocol {
        code: code.to_owned(),
        name: name.to_owned(),
        version_tag: version_tag.to_owned(),
        sexo,
        skinfolds: sites.iter().map(|&site| site.to_owned()).collect(),
        density_equation,
        fat_equation: FatFormula::Siri.into(),
    }
}

static BUILTIN: LazyLock<ProtocolCatalog> = LazyLock::new(|| {
    ProtocolCatalog::new(vec![
        protocol(
            "JP7_H_M",
            "Jackson & Pollock 7 dobras - Homem",
            "JP7_2025_09",
            Sex::Male,
            &SEVEN_SITES,
            DensityEquation::Quadratic {
                intercept: 1.112,
                sum: 0.000_434_99,
                sum_sq: 0.000_000_55,
                age: 0.000_288_26,
            },
        ),
        protocol(
            "JP7_M_F",
            "Jackson & Pollock 7 dobras - Mulher",
            "JP7_2025_09",
            Sex::Female,
            &SEVEN_SITES,
            DensityEquation::Quadratic {
                intercept: 1.097,
                sum: 0.000_469_71,
                sum_sq: 0.000_000_56,
                age: 0.000_128_28,
            },
        ),
        protocol(
            "JP3_H_M",
            "Jackson & Pollock 3 dobras - Homem",
            "JP3_2025_09",
            Sex::Male,
            &THREE_SITES,
            JP3_MALE,
        ),
        protocol(
            "JP3_M_F",
            "Jackson & Pollock 3 dobras - Mulher",
            "JP3_2025_09",
            Sex::Female,
            &THREE_SITES,
            JP3_FEMALE,
        ),
        // The 4-site variants reuse the 3-site regressions over a larger sum
        protocol(
            "JP4_H_M",
            "Jackson & Pollock 4 dobras - Homem",
            "JP4_2025_09",
            Sex::Male,
            &FOUR_SITES,
            JP3_MALE,
        ),
        protocol(
            "JP4_M_F",
            "Jackson & Pollock 4 dobras - Mulher",
            "JP4_2025_09",
            Sex::Female,
            &FOUR_SITES,
            JP3_FEMALE,
        ),
        protocol(
            "DURNI_H_M",
            "Durnin & Womersley - Homem",
            "DURNI_2025_09",
            Sex::Male,
            &DURNIN_SITES,
            DensityEquation::Log10 {
                intercept: 1.1610,
                slope: 0.0632,
            },
        ),
        protocol(
            "DURNI_M_F",
            "Durnin & Womersley - Mulher",
            "DURNI_2025_09",
            Sex::Female,
            &DURNIN_SITES,
            DensityEquation::Log10 {
                intercept: 1.1599,
                slope: 0.0717,
            },
        ),
    ])
});

/// Read-only set of anthropometric protocols keyed by code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolCatalog {
    protocols: Vec<AnthroProtocol>,
}

impl ProtocolCatalog {
    /// Build a catalog from protocol definitions
    #[must_use]
    pub const fn new(protocols: Vec<AnthroProtocol>) -> Self {
        Self { protocols }
    }

    /// The built-in protocols
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// All protocols in catalog order
    #[must_use]
    pub fn all(&self) -> &[AnthroProtocol] {
        &self.protocols
    }

    /// Protocol by code
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownProtocol` when no protocol has the code.
    pub fn get(&self, code: &str) -> Result<&AnthroProtocol, EngineError> {
        self.protocols
            .iter()
            .find(|protocol| protocol.code == code)
            .ok_or_else(|| EngineError::UnknownProtocol(code.to_owned()))
    }
}
