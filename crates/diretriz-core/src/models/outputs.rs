// ABOUTME: Fixed-shape prescription record produced by a rule and by the merge of many rules
// ABOUTME: Aerobic, resistance, and flexibility sections plus contraindication and observation lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::range::Range;
use crate::constants::aerobic_defaults;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aerobic intensity prescription method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AerobicMethod {
    /// Heart-rate reserve (Karvonen)
    #[serde(rename = "FCR")]
    Fcr,
    /// Rating of perceived exertion (Borg)
    #[serde(rename = "PSE")]
    Pse,
    /// Velocity at `VO2max`
    #[serde(rename = "vVO2max", alias = "vVO2")]
    VVo2max,
    /// Maximal lactate steady state
    #[serde(rename = "MFEL")]
    Mfel,
}

impl AerobicMethod {
    /// Wire name of the method
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Fcr => "FCR",
            Self::Pse => "PSE",
            Self::VVo2max => "vVO2max",
            Self::Mfel => "MFEL",
        }
    }

    /// Human-readable description shown with the intensity band
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Fcr => "Frequência Cardíaca de Reserva",
            Self::Pse => "Escala de Percepção Subjetiva de Esforço (Borg 11-13)",
            Self::VVo2max => "Velocidade no VO2 máximo",
            Self::Mfel => "MFEL (Limiar)",
        }
    }

    /// Default intensity band for the method
    #[must_use]
    pub const fn default_band(&self) -> Range {
        let (lo, hi) = match self {
            Self::Fcr => aerobic_defaults::FCR_BAND,
            Self::Pse => aerobic_defaults::PSE_BAND,
            Self::VVo2max => aerobic_defaults::VVO2MAX_BAND,
            Self::Mfel => aerobic_defaults::MFEL_BAND,
        };
        Range::new(lo, hi)
    }
}

impl fmt::Display for AerobicMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AerobicMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "FCR" | "fcr" => Ok(Self::Fcr),
            "PSE" | "pse" => Ok(Self::Pse),
            "vVO2max" | "vVO2" | "vvo2max" => Ok(Self::VVo2max),
            "MFEL" | "mfel" => Ok(Self::Mfel),
            other => Err(format!("unknown aerobic method '{other}'")),
        }
    }
}

/// Aerobic intensity: method plus band expressed in that method's unit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AerobicIntensity {
    /// Prescription method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metodo: Option<AerobicMethod>,
    /// Intensity band
    #[serde(default)]
    pub faixa: Range,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texto: Option<String>,
}

/// Aerobic training section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AerobicOutputs {
    /// Session duration in minutes
    #[serde(default)]
    pub duracao_min: Range,
    /// Intensity prescription
    #[serde(default)]
    pub intensidade: AerobicIntensity,
    /// Sessions per week
    #[serde(default)]
    pub frequencia_sem: Range,
    /// Section observations
    #[serde(default)]
    pub obs: Vec<String>,
}

impl AerobicOutputs {
    /// Whether no field of the section carries a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.duracao_min.is_unset()
            && self.intensidade.faixa.is_unset()
            && self.intensidade.metodo.is_none()
            && self.frequencia_sem.is_unset()
            && self.obs.is_empty()
    }
}

/// Resistance (weights) training section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResistanceOutputs {
    /// Exercises per session
    #[serde(default)]
    pub exercicios: Range,
    /// Sets per exercise
    #[serde(default)]
    pub series: Range,
    /// Repetitions per set
    #[serde(default)]
    pub reps: Range,
    /// Sessions per week
    #[serde(default)]
    pub frequencia_sem: Range,
    /// Load as a percentage of one-repetition maximum
    #[serde(default)]
    pub intensidade_pct_1rm: Range,
    /// Section observations
    #[serde(default)]
    pub obs: Vec<String>,
}

impl ResistanceOutputs {
    /// Whether no field of the section carries a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercicios.is_unset()
            && self.series.is_unset()
            && self.reps.is_unset()
            && self.frequencia_sem.is_unset()
            && self.intensidade_pct_1rm.is_unset()
            && self.obs.is_empty()
    }
}

/// Flexibility and mobility section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlexMobOutputs {
    /// Focus (e.g. "obrigatorio")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foco: Option<String>,
    /// Section observations
    #[serde(default)]
    pub obs: Vec<String>,
}

impl FlexMobOutputs {
    /// Whether no field of the section carries a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foco.is_none() && self.obs.is_empty()
    }
}

/// Prescription record attached to a rule, and the shape of merged guidelines
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outputs {
    /// Aerobic section
    #[serde(default)]
    pub aerobio: AerobicOutputs,
    /// Resistance section
    #[serde(default)]
    pub pesos: ResistanceOutputs,
    /// Flexibility and mobility section
    #[serde(default)]
    pub flex_mob: FlexMobOutputs,
    /// Contraindications
    #[serde(default)]
    pub contraindicacoes: Vec<String>,
    /// General observations
    #[serde(default)]
    pub observacoes: Vec<String>,
}

impl Outputs {
    /// Whether every section is unset and every list empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aerobio.is_empty()
            && self.pesos.is_empty()
            && self.flex_mob.is_empty()
            && self.contraindicacoes.is_empty()
            && self.observacoes.is_empty()
    }

    /// Value of one numeric range field
    #[must_use]
    pub const fn range(&self, field: RangeField) -> Range {
        match field {
            RangeField::AerobioDuracaoMin => self.aerobio.duracao_min,
            RangeField::AerobioIntensidadeFaixa => self.aerobio.intensidade.faixa,
            RangeField::AerobioFrequenciaSem => self.aerobio.frequencia_sem,
            RangeField::PesosExercicios => self.pesos.exercicios,
            RangeField::PesosSeries => self.pesos.series,
            RangeField::PesosReps => self.pesos.reps,
            RangeField::PesosFrequenciaSem => self.pesos.frequencia_sem,
            RangeField::PesosIntensidadePct1rm => self.pesos.intensidade_pct_1rm,
        }
    }

    /// Mutable access to one numeric range field
    pub fn range_mut(&mut self, field: RangeField) -> &mut Range {
        match field {
            RangeField::AerobioDuracaoMin => &mut self.aerobio.duracao_min,
            RangeField::AerobioIntensidadeFaixa => &mut self.aerobio.intensidade.faixa,
            RangeField::AerobioFrequenciaSem => &mut self.aerobio.frequencia_sem,
            RangeField::PesosExercicios => &mut self.pesos.exercicios,
            RangeField::PesosSeries => &mut self.pesos.series,
            RangeField::PesosReps => &mut self.pesos.reps,
            RangeField::PesosFrequenciaSem => &mut self.pesos.frequencia_sem,
            RangeField::PesosIntensidadePct1rm => &mut self.pesos.intensidade_pct_1rm,
        }
    }

    /// Every numeric range with its dotted field path
    #[must_use]
    pub fn ranges(&self) -> [(&'static str, Range); 8] {
        RangeField::ALL.map(|field| (field.path(), self.range(field)))
    }
}

/// Numeric range fields of [`Outputs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RangeField {
    /// `aerobio.duracao_min`
    AerobioDuracaoMin,
    /// `aerobio.intensidade.faixa`
    AerobioIntensidadeFaixa,
    /// `aerobio.frequencia_sem`
    AerobioFrequenciaSem,
    /// `pesos.exercicios`
    PesosExercicios,
    /// `pesos.series`
    PesosSeries,
    /// `pesos.reps`
    PesosReps,
    /// `pesos.frequencia_sem`
    PesosFrequenciaSem,
    /// `pesos.intensidade_pct_1rm`
    PesosIntensidadePct1rm,
}

impl RangeField {
    /// All fields in output order
    pub const ALL: [Self; 8] = [
        Self::AerobioDuracaoMin,
        Self::AerobioIntensidadeFaixa,
        Self::AerobioFrequenciaSem,
        Self::PesosExercicios,
        Self::PesosSeries,
        Self::PesosReps,
        Self::PesosFrequenciaSem,
        Self::PesosIntensidadePct1rm,
    ];

    /// Dotted path of the field in the serialized output
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::AerobioDuracaoMin => "aerobio.duracao_min",
            Self::AerobioIntensidadeFaixa => "aerobio.intensidade.faixa",
            Self::AerobioFrequenciaSem => "aerobio.frequencia_sem",
            Self::PesosExercicios => "pesos.exercicios",
            Self::PesosSeries => "pesos.series",
            Self::PesosReps => "pesos.reps",
            Self::PesosFrequenciaSem => "pesos.frequencia_sem",
            Self::PesosIntensidadePct1rm => "pesos.intensidade_pct_1rm",
        }
    }
}

impl fmt::Display for RangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
