// ABOUTME: Condition evaluator deciding whether a rule's condition tree holds for a fact set
// ABOUTME: Missing facts make an atom false and never raise an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::facts::FactSet;
use diretriz_core::models::{Condition, ConditionExpr, Predicate};

/// Evaluate a condition tree against the facts
///
/// `All` holds when every child holds (an empty `All` holds), `Any` when at
/// least one does (an empty `Any` never holds), and `Not` inverts its child.
/// A negated atom over a missing tag therefore holds, since the atom is false.
#[must_use]
pub fn evaluate(expr: &ConditionExpr, facts: &FactSet) -> bool {
    match expr {
        ConditionExpr::All { all } => all.iter().all(|child| evaluate(child, facts)),
        ConditionExpr::Any { any } => any.iter().any(|child| evaluate(child, facts)),
        ConditionExpr::Not { not } => !evaluate(not, facts),
        ConditionExpr::Atom(condition) => evaluate_condition(condition, facts),
    }
}

/// Evaluate one atomic condition
#[must_use]
pub fn evaluate_condition(condition: &Condition, facts: &FactSet) -> bool {
    let Some(fact) = facts.get(&condition.tag) else {
        return false;
    };

    match &condition.predicate {
        Predicate::Eq(expected) => fact.strict_eq(expected),
        Predicate::In(options) => options.iter().any(|option| fact.strict_eq(option)),
        Predicate::Gt(bound) => fact.as_number().is_some_and(|n| n > *bound),
        Predicate::Lt(bound) => fact.as_number().is_some_and(|n| n < *bound),
        Predicate::Gte(bound) => fact.as_number().is_some_and(|n| n >= *bound),
        Predicate::Lte(bound) => fact.as_number().is_some_and(|n| n <= *bound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diretriz_core::models::Scalar;

    fn atom(tag: &str, predicate: Predicate) -> ConditionExpr {
        ConditionExpr::Atom(Condition::new(tag, predicate))
    }

    #[test]
    fn test_eq_normalizes_yes_no() {
        let facts = FactSet::new().with("hipertensao", "sim");
        assert!(evaluate(
            &atom("hipertensao", Predicate::Eq(Scalar::Bool(true))),
            &facts
        ));
        assert!(evaluate(
            &atom("hipertensao", Predicate::Eq(Scalar::from("SIM"))),
            &facts
        ));
        assert!(!evaluate(
            &atom("hipertensao", Predicate::Eq(Scalar::from("não"))),
            &facts
        ));
    }

    #[test]
    fn test_eq_is_type_strict() {
        let facts = FactSet::new().with("readiness_exercicio", 3.0);
        assert!(!evaluate(
            &atom("readiness_exercicio", Predicate::Eq(Scalar::from("3"))),
            &facts
        ));
        assert!(evaluate(
            &atom("readiness_exercicio", Predicate::Eq(Scalar::Number(3.0))),
            &facts
        ));
    }

    #[test]
    fn test_numeric_comparisons_coerce_fact() {
        let facts = FactSet::new().with("idade", "65");
        assert!(evaluate(&atom("idade", Predicate::Gte(60.0)), &facts));
        assert!(evaluate(&atom("idade", Predicate::Gt(64.0)), &facts));
        assert!(!evaluate(&atom("idade", Predicate::Lt(65.0)), &facts));
        assert!(evaluate(&atom("idade", Predicate::Lte(65.0)), &facts));
    }

    #[test]
    fn test_non_numeric_fact_fails_comparison() {
        let facts = FactSet::new().with("idade", "idoso");
        assert!(!evaluate(&atom("idade", Predicate::Gt(10.0)), &facts));
    }

    #[test]
    fn test_in_membership() {
        let facts = FactSet::new().with("objetivo", "hipertrofia");
        let options = vec![Scalar::from("emagrecimento"), Scalar::from("hipertrofia")];
        assert!(evaluate(&atom("objetivo", Predicate::In(options)), &facts));
    }

    #[test]
    fn test_missing_tag_is_false_not_error() {
        let facts = FactSet::new();
        assert!(!evaluate(&atom("dac", Predicate::Eq(Scalar::Bool(true))), &facts));

        let negated = ConditionExpr::Not {
            not: Box::new(atom("dac", Predicate::Eq(Scalar::Bool(true)))),
        };
        assert!(evaluate(&negated, &facts));
    }

    #[test]
    fn test_all_requires_every_atom() {
        let facts = FactSet::new().with("hipertensao", true).with("idade", 70.0);
        let expr = ConditionExpr::all_of(vec![
            Condition::new("hipertensao", Predicate::Eq(Scalar::Bool(true))),
            Condition::new("idade", Predicate::Gte(60.0)),
        ]);
        assert!(evaluate(&expr, &facts));

        let expr = ConditionExpr::all_of(vec![
            Condition::new("hipertensao", Predicate::Eq(Scalar::Bool(true))),
            Condition::new("diabetes", Predicate::Eq(Scalar::Bool(true))),
        ]);
        assert!(!evaluate(&expr, &facts));
    }

    #[test]
    fn test_any_and_empty_nodes() {
        let facts = FactSet::new().with("diabetes", true);
        let expr = ConditionExpr::Any {
            any: vec![
                atom("dac", Predicate::Eq(Scalar::Bool(true))),
                atom("diabetes", Predicate::Eq(Scalar::Bool(true))),
            ],
        };
        assert!(evaluate(&expr, &facts));
        assert!(evaluate(&ConditionExpr::default(), &facts));
        assert!(!evaluate(&ConditionExpr::Any { any: vec![] }, &facts));
    }
}
