// ABOUTME: Preview orchestrator evaluating a guideline version against one student's data
// ABOUTME: Builds the fact set, selects and merges rules, applies aerobic defaults, assembles debug output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Preview Orchestrator
//!
//! A preview never changes stored state and never fails because of the
//! student's data: out-of-domain values and incomplete measurements are left
//! out of the fact set and reported as warnings. Only an unknown version or
//! tenant is an error.

use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::store::GuidelineStore;
use chrono::{DateTime, Utc};
use diretriz_core::catalog::ProtocolCatalog;
use diretriz_core::constants::{aerobic_defaults, derived_tags, readiness};
use diretriz_core::errors::EngineError;
use diretriz_core::models::{
    AerobicMethod, AnthroInput, AnthroSnapshot, Outputs, PriorityClinical, RirEntry, Rule, RuleId,
    Scalar, Sex, TenantId, VersionId,
};
use diretriz_engine::anthropometry::{AnthropometryCalculator, StudentProfile};
use diretriz_engine::merger::extend_unique;
use diretriz_engine::trace::{criteria, DecisionTrace, IntensityMerge};
use diretriz_engine::{EngineConfig, FactSet, OutputMerger, RirResolver, RuleSelector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Warning returned when the version has no rules at all
pub const NO_RULES_WARNING: &str = "Nenhuma regra encontrada";

/// Highest plausible student age in years
const MAX_AGE_YEARS: f64 = 120.0;

/// Student data supplied with the preview
///
/// Values stay as raw JSON until the facts are built, so a mistyped field
/// costs a warning rather than the whole preview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentInput {
    /// Age in years
    #[serde(default)]
    pub idade: Option<Value>,
    /// Sex as `M` or `F`
    #[serde(default)]
    pub sexo: Option<Value>,
}

/// Readiness questionnaire scores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadinessInput {
    /// Readiness for exercise, 1 to 5
    #[serde(default)]
    pub exercicio: Option<Value>,
}

/// RIR reference request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RirInput {
    /// Repetitions, a whole number
    #[serde(default)]
    pub reps: Option<Value>,
    /// Reps in reserve, a whole number
    #[serde(default)]
    pub rir: Option<Value>,
}

/// Preview payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// Student data
    #[serde(default)]
    pub aluno: Option<StudentInput>,
    /// Anthropometric measurements, decoded as [`AnthroInput`] when facts are built
    #[serde(default)]
    pub anthro: Option<Value>,
    /// Preferred aerobic method for the default intensity band
    #[serde(default)]
    pub aerobio_metodo: Option<String>,
    /// Readiness scores
    #[serde(default)]
    pub readiness: Option<ReadinessInput>,
    /// RIR reference lookup
    #[serde(default)]
    pub rir: Option<RirInput>,
    /// Anamnesis answers keyed by canonical tag
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,
}

/// A rule that fired, as listed in the debug output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiredRule {
    /// Rule identifier
    pub id: RuleId,
    /// Clinical priority
    pub priority: PriorityClinical,
    /// Tags referenced by the rule's condition
    pub tags: Vec<String>,
}

/// Merge summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeSummary {
    /// Aerobic intensity band before and after the merge
    pub intensidade: Option<IntensityMerge>,
}

/// Debug section of a preview response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewDebug {
    /// Matched rules in authoring order
    pub rules_fired: Vec<FiredRule>,
    /// Merge summaries
    pub merges: MergeSummary,
    /// Computed body composition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthro_snapshot: Option<AnthroSnapshot>,
    /// RIR references, informational only
    pub rir_refs: Vec<RirEntry>,
    /// Non-fatal notes
    pub warnings: Vec<String>,
    /// Facts the rules were evaluated against
    pub facts: FactSet,
    /// Per-rule decisions
    pub trace: DecisionTrace,
}

/// Preview response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewResponse {
    /// Combined prescription
    pub guidelines: Outputs,
    /// How it was obtained
    pub debug: PreviewDebug,
    /// Generation timestamp
    pub preview_generated_at: DateTime<Utc>,
}

/// Which version a preview runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    /// The tenant's default version
    Default,
    /// A specific version
    Id(VersionId),
}

impl FromStr for VersionSelector {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "default" {
            return Ok(Self::Default);
        }
        s.parse()
            .map(Self::Id)
            .map_err(|_| AppError::invalid_input(format!("Invalid version id: {s}")))
    }
}

/// Runs previews against a guideline store
#[derive(Clone)]
pub struct PreviewOrchestrator {
    store: Arc<dyn GuidelineStore>,
    config: Arc<EngineConfig>,
}

impl PreviewOrchestrator {
    /// Create an orchestrator
    #[must_use]
    pub fn new(store: Arc<dyn GuidelineStore>, config: Arc<EngineConfig>) -> Self {
        Self { store, config }
    }

    /// Load the version's rules and evaluate them
    ///
    /// # Errors
    ///
    /// Returns not found when the version (or the tenant default) does not exist
    pub async fn preview(
        &self,
        tenant: TenantId,
        selector: VersionSelector,
        request: &PreviewRequest,
    ) -> AppResult<PreviewResponse> {
        let started = Instant::now();
        let version = match selector {
            VersionSelector::Default => self.store.default_version(tenant).await?,
            VersionSelector::Id(id) => self.store.get_version(tenant, id).await?,
        };
        let rules = self.store.list_rules(tenant, version.id).await?;

        let response = self.evaluate(&rules, request);

        AppLogger::log_preview(
            version.id,
            response.debug.rules_fired.len(),
            response.debug.warnings.len(),
            started.elapsed().as_millis(),
        );
        Ok(response)
    }

    /// Evaluate rules against a payload
    #[must_use]
    pub fn evaluate(&self, rules: &[Rule], request: &PreviewRequest) -> PreviewResponse {
        let mut warnings = Vec::new();
        let (facts, anthro_snapshot) = self.build_facts(request, &mut warnings);

        let rir_refs = request
            .rir
            .as_ref()
            .and_then(|rir| resolve_rir(rir, &mut warnings))
            .into_iter()
            .collect();

        if rules.is_empty() {
            warnings.push(NO_RULES_WARNING.to_owned());
        }

        let matched = RuleSelector::new(self.config.preview.parallel_selection_threshold)
            .select(rules, &facts);
        let merged = OutputMerger::with_facts(&facts).merge(&matched);
        extend_unique(&mut warnings, &merged.warnings);

        let mut guidelines = merged.outputs;
        let mut intensity = merged.intensity;
        if let Some(default_band) = self.apply_aerobic_default(
            &mut guidelines,
            request.aerobio_metodo.as_deref(),
            &mut warnings,
        ) {
            intensity = Some(default_band);
        }

        if facts.get(derived_tags::BETABLOQUEADOR) == Some(&Scalar::Bool(true)) {
            extend_unique(
                &mut guidelines.observacoes,
                &[aerobic_defaults::BETA_BLOCKER_NOTE.to_owned()],
            );
        }

        let rules_fired = matched
            .iter()
            .map(|entry| FiredRule {
                id: entry.id(),
                priority: entry.priority(),
                tags: entry.rule.condition.tags(),
            })
            .collect();

        PreviewResponse {
            guidelines,
            debug: PreviewDebug {
                rules_fired,
                merges: MergeSummary {
                    intensidade: intensity,
                },
                anthro_snapshot,
                rir_refs,
                warnings,
                facts,
                trace: merged.trace,
            },
            preview_generated_at: Utc::now(),
        }
    }

    /// Answers first, then derived facts, which take precedence over answers
    /// with the same tag
    fn build_facts(
        &self,
        request: &PreviewRequest,
        warnings: &mut Vec<String>,
    ) -> (FactSet, Option<AnthroSnapshot>) {
        let mut facts = FactSet::new();
        warnings.extend(facts.insert_answers(&request.answers));
        for tag in derived_tags::ANTHROPOMETRIC {
            if facts.remove(tag).is_some() {
                warnings.push(invalid_field(
                    tag,
                    "answer ignored; body composition comes only from anthro measurements",
                ));
            }
        }

        let student = request.aluno.as_ref();
        let idade = numeric_field(
            "aluno.idade",
            student.and_then(|aluno| aluno.idade.as_ref()),
            warnings,
        )
        .and_then(|idade| {
            if (0.0..=MAX_AGE_YEARS).contains(&idade) {
                Some(idade)
            } else {
                warnings.push(out_of_range_warning("idade", idade, 0, 120));
                None
            }
        });
        if let Some(idade) = idade {
            facts.insert(derived_tags::IDADE, idade);
        }

        let sexo = match student.and_then(|aluno| aluno.sexo.as_ref()) {
            None | Some(Value::Null) => None,
            Some(Value::String(sexo)) => parse_sex(sexo).or_else(|| {
                warnings.push(invalid_field(
                    "aluno.sexo",
                    &format!("'{sexo}' não reconhecido; use M ou F"),
                ));
                None
            }),
            Some(other) => {
                warnings.push(invalid_field(
                    "aluno.sexo",
                    &format!("must be M or F, got {other}"),
                ));
                None
            }
        };

        let exercicio = request.readiness.as_ref().and_then(|r| r.exercicio.as_ref());
        if let Some(score) = numeric_field("readiness.exercicio", exercicio, warnings) {
            let (min, max) = (readiness::MIN_SCORE, readiness::MAX_SCORE);
            if (f64::from(min)..=f64::from(max)).contains(&score) {
                facts.insert(derived_tags::READINESS_EXERCICIO, score);
            } else {
                warnings.push(out_of_range_warning(
                    "readiness.exercicio",
                    score,
                    i64::from(min),
                    i64::from(max),
                ));
            }
        }

        let input = request
            .anthro
            .as_ref()
            .filter(|raw| !raw.is_null())
            .and_then(|raw| {
                AnthroInput::deserialize(raw)
                    .map_err(|e| warnings.push(invalid_field("anthro", &e.to_string())))
                    .ok()
            });
        let snapshot = input.and_then(|input| {
            let calculator =
                AnthropometryCalculator::new(ProtocolCatalog::builtin(), &self.config.anthropometry);
            match calculator.compute_from_input(&input, StudentProfile { idade, sexo }) {
                Ok(outcome) => {
                    warnings.extend(outcome.warnings);
                    facts.insert_snapshot(&outcome.snapshot);
                    Some(outcome.snapshot)
                }
                Err(e) => {
                    debug!(error = %e, "Anthropometry skipped");
                    warnings.push(e.as_warning());
                    None
                }
            }
        });

        (facts, snapshot)
    }

    /// Fill an empty aerobic intensity from the method's default band
    fn apply_aerobic_default(
        &self,
        guidelines: &mut Outputs,
        requested: Option<&str>,
        warnings: &mut Vec<String>,
    ) -> Option<IntensityMerge> {
        let aerobio = &mut guidelines.aerobio;
        if aerobio.is_empty() || !aerobio.intensidade.faixa.is_unset() {
            return None;
        }

        let requested = requested.and_then(|code| {
            AerobicMethod::from_str(code)
                .map_err(|e| warnings.push(format!("InvalidMeasurement: {e}")))
                .ok()
        });
        let method = aerobio
            .intensidade
            .metodo
            .or(requested)
            .unwrap_or(self.config.preview.default_aerobic_method);

        let band = method.default_band();
        aerobio.intensidade.metodo = Some(method);
        aerobio.intensidade.faixa = band;
        if aerobio.intensidade.texto.is_none() {
            aerobio.intensidade.texto = Some(method.description().to_owned());
        }

        Some(IntensityMerge {
            antes: Vec::new(),
            depois: band,
            criterio: criteria::METHOD_DEFAULT.to_owned(),
            metodo: Some(method),
        })
    }
}

fn parse_sex(value: &str) -> Option<Sex> {
    match value.trim().to_uppercase().as_str() {
        "M" | "MASCULINO" => Some(Sex::Male),
        "F" | "FEMININO" => Some(Sex::Female),
        _ => None,
    }
}

fn out_of_range_warning(field: &'static str, value: f64, min: i64, max: i64) -> String {
    EngineError::OutOfRange {
        field,
        value,
        min,
        max,
    }
    .as_warning()
}

fn invalid_field(field: &str, reason: &str) -> String {
    EngineError::InvalidMeasurement {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
    .as_warning()
}

/// A numeric payload value; anything but a number or null is reported and dropped
fn numeric_field(field: &str, value: Option<&Value>, warnings: &mut Vec<String>) -> Option<f64> {
    match value? {
        Value::Null => None,
        Value::Number(number) => number.as_f64(),
        other => {
            warnings.push(invalid_field(
                field,
                &format!("must be a number, got {other}"),
            ));
            None
        }
    }
}

/// Like [`numeric_field`], but fractional values are reported and dropped too
fn whole_number_field(
    field: &str,
    value: Option<&Value>,
    warnings: &mut Vec<String>,
) -> Option<i64> {
    let number = numeric_field(field, value, warnings)?;
    if number.fract().abs() < f64::EPSILON {
        Some(number as i64)
    } else {
        warnings.push(invalid_field(
            field,
            &format!("must be a whole number, got {number}"),
        ));
        None
    }
}

fn resolve_rir(input: &RirInput, warnings: &mut Vec<String>) -> Option<RirEntry> {
    let level = whole_number_field("rir.rir", input.rir.as_ref(), warnings);
    let reps = whole_number_field("rir.reps", input.reps.as_ref(), warnings);
    let (Some(level), Some(reps)) = (level, reps) else {
        if input.rir.is_none() || input.reps.is_none() {
            warnings.push(invalid_field("rir", "both reps and rir are required"));
        }
        return None;
    };
    RirResolver::builtin()
        .lookup(level, reps)
        .map_err(|e| warnings.push(e.as_warning()))
        .ok()
}
