// ABOUTME: Clinical rule model with priority ordering and save-time validation
// ABOUTME: A rule pairs a condition tree with the prescription outputs it contributes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::condition::{ConditionExpr, Predicate};
use super::ids::{RuleId, VersionId};
use super::outputs::Outputs;
use crate::catalog::{TagCatalog, TagKind};
use crate::constants::limits;
use crate::errors::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Clinical priority of a rule, ordered `Critica > Alta > Media > Baixa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClinical {
    /// High risk, immediate attention
    Critica,
    /// Moderate risk, monitoring
    Alta,
    /// Low risk, follow-up
    Media,
    /// Minimal risk, maintenance
    Baixa,
}

impl PriorityClinical {
    /// Numeric rank, higher is more important
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Critica => 3,
            Self::Alta => 2,
            Self::Media => 1,
            Self::Baixa => 0,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critica => "critica",
            Self::Alta => "alta",
            Self::Media => "media",
            Self::Baixa => "baixa",
        }
    }
}

impl PartialOrd for PriorityClinical {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityClinical {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for PriorityClinical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoring limits applied when a rule is saved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleLimits {
    /// Maximum contraindications per rule
    pub max_contraindicacoes: usize,
    /// Maximum general observations per rule
    pub max_observacoes: usize,
    /// Maximum characters per list entry
    pub max_text_len: usize,
    /// Maximum characters for the flexibility focus
    pub max_focus_len: usize,
}

impl Default for RuleLimits {
    fn default() -> Self {
        Self {
            max_contraindicacoes: limits::MAX_CONTRAINDICACOES,
            max_observacoes: limits::MAX_OBSERVACOES,
            max_text_len: limits::MAX_TEXT_LEN,
            max_focus_len: limits::MAX_FOCUS_LEN,
        }
    }
}

/// Rule content as authored (create and update payload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDraft {
    /// Clinical priority
    pub priority_clinical: PriorityClinical,
    /// Condition tree
    pub condition: ConditionExpr,
    /// Prescription outputs
    #[serde(default)]
    pub outputs: Outputs,
}

impl RuleDraft {
    /// Validate the draft against the tag vocabulary and authoring limits
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownTag` for tags outside the catalog and
    /// `EngineError::InvalidRule` for structural problems.
    pub fn validate(&self, catalog: &TagCatalog, limits: &RuleLimits) -> Result<(), EngineError> {
        if self.condition.is_empty() {
            return Err(EngineError::InvalidRule(
                "at least one condition is required".into(),
            ));
        }

        for atom in self.condition.atoms() {
            let definition = catalog.require(&atom.tag)?;
            let numeric_op = matches!(
                atom.predicate,
                Predicate::Gt(_) | Predicate::Lt(_) | Predicate::Gte(_) | Predicate::Lte(_)
            );
            if numeric_op && definition.kind == TagKind::Boolean {
                return Err(EngineError::InvalidRule(format!(
                    "'{}' is a yes/no tag and cannot be compared with '{}'",
                    atom.tag,
                    atom.predicate.operator()
                )));
            }
            if matches!(&atom.predicate, Predicate::In(values) if values.is_empty()) {
                return Err(EngineError::InvalidRule(format!(
                    "condition on '{}' has an empty 'in' list",
                    atom.tag
                )));
            }
        }

        for (field, range) in self.outputs.ranges() {
            if !range.is_unset() && !range.is_well_formed() {
                return Err(EngineError::InvalidRule(format!(
                    "{field} {range} must be non-negative with lo <= hi"
                )));
            }
        }

        Self::check_list(
            "contraindicacoes",
            &self.outputs.contraindicacoes,
            limits.max_contraindicacoes,
            limits.max_text_len,
        )?;
        Self::check_list(
            "observacoes",
            &self.outputs.observacoes,
            limits.max_observacoes,
            limits.max_text_len,
        )?;
        for (field, list) in [
            ("aerobio.obs", &self.outputs.aerobio.obs),
            ("pesos.obs", &self.outputs.pesos.obs),
            ("flex_mob.obs", &self.outputs.flex_mob.obs),
        ] {
            Self::check_list(field, list, usize::MAX, limits.max_text_len)?;
        }

        if let Some(foco) = &self.outputs.flex_mob.foco {
            if foco.chars().count() > limits.max_focus_len {
                return Err(EngineError::InvalidRule(format!(
                    "flex_mob.foco exceeds {} characters",
                    limits.max_focus_len
                )));
            }
        }

        Ok(())
    }

    fn check_list(
        field: &str,
        items: &[String],
        max_items: usize,
        max_len: usize,
    ) -> Result<(), EngineError> {
        if items.len() > max_items {
            return Err(EngineError::InvalidRule(format!(
                "{field} allows at most {max_items} entries, got {}",
                items.len()
            )));
        }
        if let Some(item) = items
            .iter()
            .find(|item| item.trim().is_empty() || item.chars().count() > max_len)
        {
            return Err(EngineError::InvalidRule(format!(
                "{field} entry '{item}' must be non-empty and at most {max_len} characters"
            )));
        }
        Ok(())
    }
}

/// Persisted rule belonging to exactly one guideline version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier
    pub id: RuleId,
    /// Owning version
    pub version_id: VersionId,
    /// Clinical priority
    pub priority_clinical: PriorityClinical,
    /// Condition tree
    pub condition: ConditionExpr,
    /// Prescription outputs
    pub outputs: Outputs,
    /// Creation timestamp (authoring order)
    pub created_at: DateTime<Utc>,
}

impl Rule {
    /// Materialize a draft into a rule of the given version
    #[must_use]
    pub fn from_draft(version_id: VersionId, draft: RuleDraft) -> Self {
        Self {
            id: RuleId::new(),
            version_id,
            priority_clinical: draft.priority_clinical,
            condition: draft.condition,
            outputs: draft.outputs,
            created_at: Utc::now(),
        }
    }

    /// Copy this rule into another version with a fresh identifier
    #[must_use]
    pub fn cloned_into(&self, version_id: VersionId) -> Self {
        Self {
            id: RuleId::new(),
            version_id,
            ..self.clone()
        }
    }
}
