// ABOUTME: Decision trace recorded while folding matched rules into the combined output
// ABOUTME: Per-rule decisions, resolved contradictions, bound provenance, and the intensity merge
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use diretriz_core::models::{AerobicMethod, PriorityClinical, Range, RuleId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Kind of effect a rule had on one output field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// First value for a previously unset range
    Set,
    /// Range intersected to a strictly smaller one
    Narrowed,
    /// Range already inside the incoming one
    Unchanged,
    /// Incoming range did not overlap and was discarded
    Rejected,
    /// Aerobic method chosen
    MethodSelected,
    /// Aerobic method discarded in favour of an earlier choice
    MethodIgnored,
    /// Intensity band expressed in a method other than the chosen one
    BandSkipped,
    /// Flexibility focus set or escalated
    FocusSet,
    /// Flexibility focus discarded
    FocusIgnored,
    /// New list entries contributed
    Appended,
}

/// One field-level effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    /// Dotted output path
    pub field: String,
    /// What happened
    pub action: ChangeAction,
    /// Human-readable statement
    pub detail: String,
}

/// Trace record for one matched rule, in fold order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    /// Rule identifier
    pub rule_id: RuleId,
    /// Clinical priority
    pub priority: PriorityClinical,
    /// Authoring position
    pub ordinal: usize,
    /// Rendered condition tree
    pub condition_summary: String,
    /// What the rule changed in the running combined output
    pub decision: String,
    /// Field-level effects behind `decision`
    pub changes: Vec<FieldChange>,
}

/// A non-overlapping range resolved in favour of the earlier-folded rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contradiction {
    /// Dotted output path
    pub field: String,
    /// Range held before the conflict, which the merge keeps
    pub kept: Range,
    /// Rules that supplied the kept lower and upper bounds
    pub kept_from: Vec<RuleId>,
    /// Discarded range
    pub rejected: Range,
    /// Rule whose range was discarded
    pub rejected_rule: RuleId,
    /// Priority of the discarded rule
    pub rejected_priority: PriorityClinical,
}

/// Which rules supplied the final bounds of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundSources {
    /// Rule that supplied the lower bound
    pub lo_from: RuleId,
    /// Rule that supplied the upper bound
    pub hi_from: RuleId,
}

/// Before/after view of the aerobic intensity band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityMerge {
    /// Bands contributed by the participating rules, in fold order
    pub antes: Vec<Range>,
    /// Resulting band
    pub depois: Range,
    /// How the result was obtained
    pub criterio: String,
    /// Method the band is expressed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metodo: Option<AerobicMethod>,
}

/// Criteria reported in [`IntensityMerge::criterio`]
pub mod criteria {
    /// Intersection of two or more bands
    pub const INTERSECTION: &str = "interseção";
    /// Only one rule contributed a band
    pub const SINGLE_RULE: &str = "regra_unica";
    /// A conflicting band was discarded by precedence
    pub const PRIORITY: &str = "prioridade";
    /// No rule contributed a band; the method default was applied
    pub const METHOD_DEFAULT: &str = "metodo_padrao";
}

/// Full record of a merge
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecisionTrace {
    /// One entry per matched rule, in fold order
    pub entries: Vec<TraceEntry>,
    /// Conflicts resolved by precedence
    pub contradictions: Vec<Contradiction>,
    /// Provenance of every set range, keyed by dotted path
    pub bounds: BTreeMap<String, BoundSources>,
}

impl DecisionTrace {
    /// Whether any range conflict was resolved on the given field
    #[must_use]
    pub fn has_contradiction_on(&self, field: &str) -> bool {
        self.contradictions.iter().any(|c| c.field == field)
    }
}
