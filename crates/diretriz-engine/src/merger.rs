// ABOUTME: Output merger folding matched rules into one prescription ("most restrictive wins")
// ABOUTME: Ranges intersect, conflicts resolve by priority then authoring order, lists union
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Output Merger
//!
//! Matched rules are folded left to right in priority order (critica first),
//! ties broken by authoring order. Every rule carries that position with it, so
//! the combined output does not depend on the order the matches are handed in.
//!
//! - Numeric ranges narrow by intersection. Unset ranges are skipped. A range
//!   that does not overlap the running one is discarded and recorded as a
//!   [`Contradiction`]; the running range came from rules earlier in the fold,
//!   so the higher-priority (or first-authored) bounds survive.
//! - The aerobic method is taken from the first rule in fold order that sets
//!   one. Intensity bands expressed in a different method are not comparable
//!   and are skipped.
//! - Lists are unioned without duplicates in authoring order.
//! - A focus of `obrigatorio` overrides any other focus.

use crate::facts::FactSet;
use crate::selector::MatchedRule;
use crate::trace::{
    criteria, BoundSources, ChangeAction, Contradiction, DecisionTrace, FieldChange,
    IntensityMerge, TraceEntry,
};
use diretriz_core::models::{AerobicMethod, Outputs, Range, RangeField};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Focus value that dominates every other flexibility focus
pub const MANDATORY_FOCUS: &str = "obrigatorio";

/// Combined output of a merge with its trace
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    /// Combined prescription
    pub outputs: Outputs,
    /// How each rule contributed
    pub trace: DecisionTrace,
    /// Before/after view of the aerobic intensity band, when any rule set one
    pub intensity: Option<IntensityMerge>,
    /// Non-fatal notes about the merge inputs
    pub warnings: Vec<String>,
}

/// Folds matched rules into a single prescription
#[derive(Debug, Clone, Default)]
pub struct OutputMerger {
    unavailable: Vec<&'static str>,
}

impl OutputMerger {
    /// Merger with no knowledge of missing upstream facts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merger that warns about matched rules referencing derived facts absent from `facts`
    #[must_use]
    pub fn with_facts(facts: &FactSet) -> Self {
        Self {
            unavailable: facts.unavailable_derived(),
        }
    }

    /// Merge matched rules
    #[must_use]
    pub fn merge(&self, matched: &[MatchedRule<'_>]) -> MergeResult {
        let mut fold = distinct(matched);
        fold.sort_by(MatchedRule::fold_cmp);

        let mut state = FoldState::default();
        let mut trace = DecisionTrace::default();
        for entry in &fold {
            let changes = state.apply(entry);
            let decision = if changes.is_empty() {
                "matched without changing the combined output".to_owned()
            } else {
                changes
                    .iter()
                    .map(|change| change.detail.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            trace.entries.push(TraceEntry {
                rule_id: entry.id(),
                priority: entry.priority(),
                ordinal: entry.ordinal,
                condition_summary: entry.rule.condition.to_string(),
                decision,
                changes,
            });
        }

        let mut by_authoring = fold.clone();
        by_authoring.sort_by_key(|entry| (entry.ordinal, entry.id()));
        let mut outputs = state.outputs;
        union_lists(&mut outputs, &by_authoring);

        trace.contradictions = state.contradictions;
        trace.bounds = state
            .bounds
            .into_iter()
            .map(|(field, sources)| (field.path().to_owned(), sources))
            .collect();

        let faixa = RangeField::AerobioIntensidadeFaixa;
        let intensity = (!state.bands.is_empty()).then(|| IntensityMerge {
            criterio: if trace.has_contradiction_on(faixa.path()) {
                criteria::PRIORITY
            } else if state.bands.len() == 1 {
                criteria::SINGLE_RULE
            } else {
                criteria::INTERSECTION
            }
            .to_owned(),
            antes: state.bands,
            depois: outputs.range(faixa),
            metodo: outputs.aerobio.intensidade.metodo,
        });

        let warnings = self.unavailable_fact_warnings(&fold);

        debug!(
            rules.merged = fold.len(),
            contradictions = trace.contradictions.len(),
            warnings = warnings.len(),
            "Merged rule outputs"
        );

        MergeResult {
            outputs,
            trace,
            intensity,
            warnings,
        }
    }

    fn unavailable_fact_warnings(&self, fold: &[MatchedRule<'_>]) -> Vec<String> {
        let mut warnings = Vec::new();
        for entry in fold {
            for tag in entry.rule.condition.tags() {
                if self.unavailable.contains(&tag.as_str()) {
                    warnings.push(format!(
                        "Regra {} ({}) usa '{tag}', que não pôde ser calculado; a regra foi avaliada sem esse dado",
                        entry.id(),
                        entry.priority()
                    ));
                }
            }
        }
        warnings
    }
}

/// One entry per rule id, keeping the earliest authoring position
fn distinct<'a>(matched: &[MatchedRule<'a>]) -> Vec<MatchedRule<'a>> {
    let mut unique = matched.to_vec();
    unique.sort_by_key(|entry| (entry.id(), entry.ordinal));
    unique.dedup_by_key(|entry| entry.id());
    unique
}

fn union_lists(outputs: &mut Outputs, by_authoring: &[MatchedRule<'_>]) {
    for entry in by_authoring {
        let source = &entry.rule.outputs;
        extend_unique(&mut outputs.aerobio.obs, &source.aerobio.obs);
        extend_unique(&mut outputs.pesos.obs, &source.pesos.obs);
        extend_unique(&mut outputs.flex_mob.obs, &source.flex_mob.obs);
        extend_unique(&mut outputs.contraindicacoes, &source.contraindicacoes);
        extend_unique(&mut outputs.observacoes, &source.observacoes);
    }
}

/// Append items not already present, preserving first-seen order
pub fn extend_unique(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

#[derive(Default)]
struct FoldState {
    outputs: Outputs,
    bounds: BTreeMap<RangeField, BoundSources>,
    contradictions: Vec<Contradiction>,
    bands: Vec<Range>,
    listed: HashSet<(&'static str, String)>,
}

impl FoldState {
    fn apply(&mut self, entry: &MatchedRule<'_>) -> Vec<FieldChange> {
        let source = &entry.rule.outputs;
        let mut changes = Vec::new();

        let band_comparable = self.apply_method(source.aerobio.intensidade.metodo, &mut changes);

        for field in RangeField::ALL {
            let incoming = source.range(field);
            if incoming.is_unset() {
                continue;
            }
            if field == RangeField::AerobioIntensidadeFaixa {
                if !band_comparable {
                    changes.push(FieldChange {
                        field: field.path().to_owned(),
                        action: ChangeAction::BandSkipped,
                        detail: format!(
                            "ignored {field} {incoming}: expressed in a different aerobic method"
                        ),
                    });
                    continue;
                }
                if incoming.is_well_formed() {
                    self.bands.push(incoming);
                }
            }
            self.narrow(field, incoming, entry, &mut changes);
        }

        if band_comparable && self.outputs.aerobio.intensidade.texto.is_none() {
            if let Some(texto) = &source.aerobio.intensidade.texto {
                self.outputs.aerobio.intensidade.texto = Some(texto.clone());
            }
        }

        self.apply_focus(source.flex_mob.foco.as_deref(), &mut changes);
        self.note_lists(source, &mut changes);
        changes
    }

    /// Returns whether the rule's intensity band is expressed in the chosen method
    fn apply_method(
        &mut self,
        method: Option<AerobicMethod>,
        changes: &mut Vec<FieldChange>,
    ) -> bool {
        let Some(method) = method else {
            return true;
        };
        match self.outputs.aerobio.intensidade.metodo {
            None => {
                self.outputs.aerobio.intensidade.metodo = Some(method);
                changes.push(FieldChange {
                    field: "aerobio.intensidade.metodo".to_owned(),
                    action: ChangeAction::MethodSelected,
                    detail: format!("selected aerobic method {method}"),
                });
                true
            }
            Some(chosen) if chosen == method => true,
            Some(chosen) => {
                changes.push(FieldChange {
                    field: "aerobio.intensidade.metodo".to_owned(),
                    action: ChangeAction::MethodIgnored,
                    detail: format!("ignored aerobic method {method}: {chosen} already selected"),
                });
                false
            }
        }
    }

    fn narrow(
        &mut self,
        field: RangeField,
        incoming: Range,
        entry: &MatchedRule<'_>,
        changes: &mut Vec<FieldChange>,
    ) {
        let path = field.path().to_owned();
        if !incoming.is_well_formed() {
            changes.push(FieldChange {
                field: path,
                action: ChangeAction::Rejected,
                detail: format!("ignored malformed {field} {incoming}"),
            });
            return;
        }

        let current = self.outputs.range(field);
        let id = entry.id();

        if current.is_unset() {
            *self.outputs.range_mut(field) = incoming;
            self.bounds.insert(
                field,
                BoundSources {
                    lo_from: id,
                    hi_from: id,
                },
            );
            changes.push(FieldChange {
                field: path,
                action: ChangeAction::Set,
                detail: format!("set {field} to {incoming}"),
            });
            return;
        }

        match current.intersect(&incoming) {
            Some(next) if next == current => changes.push(FieldChange {
                field: path,
                action: ChangeAction::Unchanged,
                detail: format!("{field} {incoming} already satisfied by {current}"),
            }),
            Some(next) => {
                if let Some(sources) = self.bounds.get_mut(&field) {
                    if next.lo > current.lo {
                        sources.lo_from = id;
                    }
                    if next.hi < current.hi {
                        sources.hi_from = id;
                    }
                }
                *self.outputs.range_mut(field) = next;
                changes.push(FieldChange {
                    field: path,
                    action: ChangeAction::Narrowed,
                    detail: format!("narrowed {field} from {current} to {next}"),
                });
            }
            None => {
                let mut kept_from = Vec::new();
                if let Some(sources) = self.bounds.get(&field) {
                    kept_from.push(sources.lo_from);
                    if sources.hi_from != sources.lo_from {
                        kept_from.push(sources.hi_from);
                    }
                }
                debug!(
                    field = %field,
                    kept = %current,
                    rejected = %incoming,
                    rule.id = %id,
                    "Resolved range contradiction by precedence"
                );
                self.contradictions.push(Contradiction {
                    field: path.clone(),
                    kept: current,
                    kept_from,
                    rejected: incoming,
                    rejected_rule: id,
                    rejected_priority: entry.priority(),
                });
                changes.push(FieldChange {
                    field: path,
                    action: ChangeAction::Rejected,
                    detail: format!(
                        "rejected {field} {incoming}: no overlap with {current} held by higher-precedence rules"
                    ),
                });
            }
        }
    }

    fn apply_focus(&mut self, focus: Option<&str>, changes: &mut Vec<FieldChange>) {
        let Some(focus) = focus.map(str::trim).filter(|f| !f.is_empty()) else {
            return;
        };
        let field = "flex_mob.foco".to_owned();
        match self.outputs.flex_mob.foco.as_deref() {
            None => {
                self.outputs.flex_mob.foco = Some(focus.to_owned());
                changes.push(FieldChange {
                    field,
                    action: ChangeAction::FocusSet,
                    detail: format!("set flex_mob.foco to '{focus}'"),
                });
            }
            Some(current) if current == focus => {}
            Some(current) if focus == MANDATORY_FOCUS => {
                let detail = format!("escalated flex_mob.foco from '{current}' to '{focus}'");
                self.outputs.flex_mob.foco = Some(focus.to_owned());
                changes.push(FieldChange {
                    field,
                    action: ChangeAction::FocusSet,
                    detail,
                });
            }
            Some(current) => changes.push(FieldChange {
                field,
                action: ChangeAction::FocusIgnored,
                detail: format!("kept flex_mob.foco '{current}', ignored '{focus}'"),
            }),
        }
    }

    fn note_lists(&mut self, source: &Outputs, changes: &mut Vec<FieldChange>) {
        let lists: [(&'static str, &Vec<String>); 5] = [
            ("aerobio.obs", &source.aerobio.obs),
            ("pesos.obs", &source.pesos.obs),
            ("flex_mob.obs", &source.flex_mob.obs),
            ("contraindicacoes", &source.contraindicacoes),
            ("observacoes", &source.observacoes),
        ];
        for (name, items) in lists {
            let added: Vec<&str> = items
                .iter()
                .filter(|item| self.listed.insert((name, (*item).clone())))
                .map(String::as_str)
                .collect();
            if !added.is_empty() {
                changes.push(FieldChange {
                    field: name.to_owned(),
                    action: ChangeAction::Appended,
                    detail: format!("added to {name}: {}", added.join(", ")),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diretriz_core::models::{
        Condition, ConditionExpr, Predicate, PriorityClinical, Rule, RuleDraft, Scalar, VersionId,
    };

    fn rule(priority: PriorityClinical, outputs: Outputs) -> Rule {
        Rule::from_draft(
            VersionId::new(),
            RuleDraft {
                priority_clinical: priority,
                condition: ConditionExpr::all_of(vec![Condition::new(
                    "hipertensao",
                    Predicate::Eq(Scalar::Bool(true)),
                )]),
                outputs,
            },
        )
    }

    fn with_faixa(lo: f64, hi: f64) -> Outputs {
        let mut outputs = Outputs::default();
        outputs.aerobio.intensidade.faixa = Range::new(lo, hi);
        outputs
    }

    fn matched(rules: &[Rule]) -> Vec<MatchedRule<'_>> {
        rules
            .iter()
            .enumerate()
            .map(|(ordinal, rule)| MatchedRule { rule, ordinal })
            .collect()
    }

    #[test]
    fn test_scenario_a_intersection_with_provenance() {
        let rules = vec![
            rule(PriorityClinical::Media, with_faixa(60.0, 80.0)),
            rule(PriorityClinical::Alta, with_faixa(50.0, 70.0)),
        ];
        let result = OutputMerger::new().merge(&matched(&rules));

        assert_eq!(
            result.outputs.aerobio.intensidade.faixa,
            Range::new(60.0, 70.0)
        );
        let sources = result.trace.bounds["aerobio.intensidade.faixa"];
        assert_eq!(sources.lo_from, rules[0].id);
        assert_eq!(sources.hi_from, rules[1].id);
        assert_eq!(result.trace.entries[0].rule_id, rules[1].id);
        assert!(result.trace.entries[1].decision.contains("narrowed"));

        let intensity = result.intensity.unwrap();
        assert_eq!(intensity.antes.len(), 2);
        assert_eq!(intensity.criterio, criteria::INTERSECTION);
        assert!(result.trace.contradictions.is_empty());
    }

    #[test]
    fn test_scenario_b_contradiction_keeps_higher_priority() {
        let rules = vec![
            rule(PriorityClinical::Alta, with_faixa(70.0, 80.0)),
            rule(PriorityClinical::Baixa, with_faixa(50.0, 60.0)),
        ];
        let result = OutputMerger::new().merge(&matched(&rules));

        assert_eq!(
            result.outputs.aerobio.intensidade.faixa,
            Range::new(70.0, 80.0)
        );
        assert_eq!(result.trace.contradictions.len(), 1);
        let contradiction = &result.trace.contradictions[0];
        assert_eq!(contradiction.rejected_rule, rules[1].id);
        assert_eq!(contradiction.kept_from, vec![rules[0].id]);
        assert_eq!(result.intensity.unwrap().criterio, criteria::PRIORITY);
    }

    #[test]
    fn test_scenario_b_independent_of_presentation_order() {
        let rules = vec![
            rule(PriorityClinical::Baixa, with_faixa(50.0, 60.0)),
            rule(PriorityClinical::Alta, with_faixa(70.0, 80.0)),
        ];
        let result = OutputMerger::new().merge(&matched(&rules));
        assert_eq!(
            result.outputs.aerobio.intensidade.faixa,
            Range::new(70.0, 80.0)
        );
    }

    #[test]
    fn test_same_priority_non_overlap_first_authored_wins() {
        let rules = vec![
            rule(PriorityClinical::Media, with_faixa(20.0, 30.0)),
            rule(PriorityClinical::Media, with_faixa(40.0, 50.0)),
        ];
        let mut entries = matched(&rules);
        let forward = OutputMerger::new().merge(&entries);
        entries.reverse();
        let reversed = OutputMerger::new().merge(&entries);

        assert_eq!(
            forward.outputs.aerobio.intensidade.faixa,
            Range::new(20.0, 30.0)
        );
        assert_eq!(forward.outputs, reversed.outputs);
        assert_eq!(forward.trace.contradictions[0].rejected_rule, rules[1].id);
    }

    #[test]
    fn test_permutations_yield_identical_outputs() {
        let mut a = with_faixa(55.0, 85.0);
        a.pesos.reps = Range::new(8.0, 15.0);
        a.contraindicacoes = vec!["Evitar Valsalva".into()];
        let mut b = with_faixa(60.0, 75.0);
        b.pesos.reps = Range::new(10.0, 12.0);
        b.observacoes = vec!["Monitorar PA".into()];
        let mut c = Outputs::default();
        c.pesos.series = Range::new(2.0, 3.0);
        c.contraindicacoes = vec!["Evitar isometria".into(), "Evitar Valsalva".into()];

        let rules = vec![
            rule(PriorityClinical::Media, a),
            rule(PriorityClinical::Critica, b),
            rule(PriorityClinical::Baixa, c),
        ];
        let base = matched(&rules);
        let expected = OutputMerger::new().merge(&base).outputs;

        for order in [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            let permuted: Vec<_> = order.iter().map(|&i| base[i]).collect();
            assert_eq!(OutputMerger::new().merge(&permuted).outputs, expected);
        }
        assert_eq!(
            expected.contraindicacoes,
            vec!["Evitar Valsalva".to_owned(), "Evitar isometria".to_owned()]
        );
    }

    #[test]
    fn test_duplicate_rule_is_idempotent() {
        let mut outputs = with_faixa(60.0, 70.0);
        outputs.observacoes = vec!["Hidratar".into()];
        let rules = vec![rule(PriorityClinical::Alta, outputs)];
        let once = matched(&rules);
        let twice = vec![once[0], once[0]];

        let single = OutputMerger::new().merge(&once);
        let doubled = OutputMerger::new().merge(&twice);
        assert_eq!(single.outputs, doubled.outputs);
        assert_eq!(doubled.trace.entries.len(), 1);
    }

    #[test]
    fn test_no_match_is_identity() {
        let result = OutputMerger::new().merge(&[]);
        assert!(result.outputs.is_empty());
        assert_eq!(result.outputs, Outputs::default());
        assert!(result.warnings.is_empty());
        assert!(result.intensity.is_none());
        assert!(result.trace.entries.is_empty());
    }

    #[test]
    fn test_adding_rules_never_widens_ranges() {
        let mut base = Outputs::default();
        base.pesos.intensidade_pct_1rm = Range::new(50.0, 80.0);
        let mut tighter = Outputs::default();
        tighter.pesos.intensidade_pct_1rm = Range::new(60.0, 90.0);
        let mut unset = Outputs::default();
        unset.observacoes = vec!["Sem carga máxima".into()];

        let rules = vec![
            rule(PriorityClinical::Media, base),
            rule(PriorityClinical::Baixa, tighter),
            rule(PriorityClinical::Alta, unset),
        ];
        let all = matched(&rules);

        let small = OutputMerger::new().merge(&all[..1]).outputs;
        let large = OutputMerger::new().merge(&all).outputs;
        assert!(small
            .pesos
            .intensidade_pct_1rm
            .contains(&large.pesos.intensidade_pct_1rm));
        assert_eq!(large.pesos.intensidade_pct_1rm, Range::new(60.0, 80.0));
    }

    #[test]
    fn test_lists_grow_monotonically() {
        let mut first = Outputs::default();
        first.contraindicacoes = vec!["A".into(), "B".into()];
        first.aerobio.obs = vec!["x".into()];
        let mut second = Outputs::default();
        second.contraindicacoes = vec!["B".into(), "C".into()];
        second.flex_mob.obs = vec!["y".into()];

        let rules = vec![
            rule(PriorityClinical::Baixa, first),
            rule(PriorityClinical::Critica, second),
        ];
        let all = matched(&rules);
        let small = OutputMerger::new().merge(&all[..1]).outputs;
        let large = OutputMerger::new().merge(&all).outputs;

        assert!(small
            .contraindicacoes
            .iter()
            .all(|item| large.contraindicacoes.contains(item)));
        assert_eq!(
            large.contraindicacoes,
            vec!["A".to_owned(), "B".to_owned(), "C".to_owned()]
        );
        assert_eq!(large.aerobio.obs, vec!["x".to_owned()]);
        assert_eq!(large.flex_mob.obs, vec!["y".to_owned()]);
    }

    #[test]
    fn test_method_from_highest_priority_and_foreign_bands_skipped() {
        let mut fcr = with_faixa(40.0, 60.0);
        fcr.aerobio.intensidade.metodo = Some(AerobicMethod::Fcr);
        let mut pse = with_faixa(11.0, 13.0);
        pse.aerobio.intensidade.metodo = Some(AerobicMethod::Pse);
        pse.aerobio.intensidade.texto = Some("Borg 11-13".into());

        let rules = vec![
            rule(PriorityClinical::Media, fcr),
            rule(PriorityClinical::Critica, pse),
        ];
        let result = OutputMerger::new().merge(&matched(&rules));

        let intensity = &result.outputs.aerobio.intensidade;
        assert_eq!(intensity.metodo, Some(AerobicMethod::Pse));
        assert_eq!(intensity.faixa, Range::new(11.0, 13.0));
        assert_eq!(intensity.texto.as_deref(), Some("Borg 11-13"));
        assert!(result.trace.contradictions.is_empty());

        let skipped = &result.trace.entries[1].changes;
        assert!(skipped
            .iter()
            .any(|change| change.action == ChangeAction::BandSkipped));
        assert!(skipped
            .iter()
            .any(|change| change.action == ChangeAction::MethodIgnored));
    }

    #[test]
    fn test_mandatory_focus_dominates() {
        let mut optional = Outputs::default();
        optional.flex_mob.foco = Some("opcional".into());
        let mut mandatory = Outputs::default();
        mandatory.flex_mob.foco = Some(MANDATORY_FOCUS.into());

        let rules = vec![
            rule(PriorityClinical::Critica, optional),
            rule(PriorityClinical::Baixa, mandatory),
        ];
        let result = OutputMerger::new().merge(&matched(&rules));
        assert_eq!(result.outputs.flex_mob.foco.as_deref(), Some(MANDATORY_FOCUS));
    }

    #[test]
    fn test_malformed_range_never_reaches_output() {
        let rules = vec![
            rule(PriorityClinical::Alta, with_faixa(80.0, 60.0)),
            rule(PriorityClinical::Media, with_faixa(50.0, 70.0)),
        ];
        let result = OutputMerger::new().merge(&matched(&rules));
        let faixa = result.outputs.aerobio.intensidade.faixa;
        assert!(faixa.is_well_formed());
        assert_eq!(faixa, Range::new(50.0, 70.0));
    }

    #[test]
    fn test_warns_when_rule_uses_unavailable_derived_fact() {
        let negated = Rule::from_draft(
            VersionId::new(),
            RuleDraft {
                priority_clinical: PriorityClinical::Media,
                condition: ConditionExpr::Not {
                    not: Box::new(ConditionExpr::Atom(Condition::new(
                        "pct_gordura",
                        Predicate::Gt(30.0),
                    ))),
                },
                outputs: with_faixa(60.0, 70.0),
            },
        );
        let rules = vec![negated];
        let facts = FactSet::new().with("hipertensao", true);

        let result = OutputMerger::with_facts(&facts).merge(&matched(&rules));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("pct_gordura"));
    }
}
