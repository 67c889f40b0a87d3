// ABOUTME: Rule selector returning the rules whose conditions hold, in authoring order
// ABOUTME: Each match carries its authoring ordinal so the merger can break priority ties
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::evaluator::evaluate;
use crate::facts::FactSet;
use diretriz_core::models::{PriorityClinical, Rule, RuleId};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

/// A rule that matched, annotated with its position in the version's rule list
#[derive(Debug, Clone, Copy)]
pub struct MatchedRule<'a> {
    /// The matching rule
    pub rule: &'a Rule,
    /// Zero-based authoring position
    pub ordinal: usize,
}

impl MatchedRule<'_> {
    /// Rule identifier
    #[must_use]
    pub const fn id(&self) -> RuleId {
        self.rule.id
    }

    /// Clinical priority
    #[must_use]
    pub const fn priority(&self) -> PriorityClinical {
        self.rule.priority_clinical
    }

    /// Fold order: priority descending, then authoring order, then id
    #[must_use]
    pub fn fold_cmp(&self, other: &Self) -> Ordering {
        other
            .priority()
            .cmp(&self.priority())
            .then(self.ordinal.cmp(&other.ordinal))
            .then(self.id().cmp(&other.id()))
    }
}

/// Selects matching rules without reordering them
#[derive(Debug, Clone, Copy)]
pub struct RuleSelector {
    parallel_threshold: usize,
}

impl Default for RuleSelector {
    fn default() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}

impl RuleSelector {
    /// Selector that evaluates on the rayon pool once a version has more than
    /// `parallel_threshold` rules
    #[must_use]
    pub const fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Rules whose condition holds, in their original order
    #[must_use]
    pub fn select<'a>(&self, rules: &'a [Rule], facts: &FactSet) -> Vec<MatchedRule<'a>> {
        let matches = |(ordinal, rule): (usize, &'a Rule)| {
            evaluate(&rule.condition, facts).then_some(MatchedRule { rule, ordinal })
        };

        let matched: Vec<MatchedRule<'a>> = if rules.len() > self.parallel_threshold {
            rules.par_iter().enumerate().filter_map(matches).collect()
        } else {
            rules.iter().enumerate().filter_map(matches).collect()
        };

        debug!(
            rules.total = rules.len(),
            rules.matched = matched.len(),
            "Selected matching rules"
        );
        matched
    }
}
