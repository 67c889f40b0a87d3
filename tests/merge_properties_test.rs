// ABOUTME: Integration tests for merge properties observed through full previews
// ABOUTME: Authoring-order independence, monotonic narrowing, and list union without duplicates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{aerobic_band, create_test_orchestrator, create_test_store, draft, is_true};
use diretriz_core::models::{Outputs, PriorityClinical, Range, Rule, RuleDraft, VersionId};
use diretriz_server::preview::{PreviewOrchestrator, PreviewRequest};
use serde_json::json;

fn rules_from(drafts: &[RuleDraft]) -> Vec<Rule> {
    let version = VersionId::new();
    drafts
        .iter()
        .cloned()
        .map(|d| Rule::from_draft(version, d))
        .collect()
}

fn all_answers() -> PreviewRequest {
    serde_json::from_value(json!({
        "answers": {"hipertensao": true, "diabetes": true, "obesidade": true, "dac": true}
    }))
    .unwrap()
}

fn orchestrator() -> PreviewOrchestrator {
    create_test_orchestrator(create_test_store())
}

fn mixed_drafts() -> Vec<RuleDraft> {
    let mut strength = Outputs::default();
    strength.pesos.reps = Range::new(8.0, 15.0);
    strength.contraindicacoes = vec!["Manobra de Valsalva".to_owned()];

    let mut lighter = Outputs::default();
    lighter.pesos.reps = Range::new(10.0, 20.0);
    lighter.contraindicacoes = vec![
        "Manobra de Valsalva".to_owned(),
        "Exercícios isométricos prolongados".to_owned(),
    ];

    vec![
        draft(
            PriorityClinical::Media,
            vec![is_true("hipertensao")],
            aerobic_band(None, 60.0, 80.0),
        ),
        draft(PriorityClinical::Alta, vec![is_true("diabetes")], strength),
        draft(
            PriorityClinical::Critica,
            vec![is_true("dac")],
            aerobic_band(None, 50.0, 70.0),
        ),
        draft(PriorityClinical::Baixa, vec![is_true("obesidade")], lighter),
    ]
}

#[test]
fn test_result_independent_of_authoring_order() {
    let drafts = mixed_drafts();
    let baseline = orchestrator().evaluate(&rules_from(&drafts), &all_answers());

    let mut rotated = drafts.clone();
    for _ in 0..drafts.len() {
        rotated.rotate_left(1);
        let response = orchestrator().evaluate(&rules_from(&rotated), &all_answers());
        assert_eq!(
            response.guidelines.aerobio.intensidade.faixa,
            baseline.guidelines.aerobio.intensidade.faixa
        );
        assert_eq!(response.guidelines.pesos.reps, baseline.guidelines.pesos.reps);

        let mut contraindications = response.guidelines.contraindicacoes.clone();
        let mut expected = baseline.guidelines.contraindicacoes.clone();
        contraindications.sort();
        expected.sort();
        assert_eq!(contraindications, expected);
    }

    assert_eq!(
        baseline.guidelines.aerobio.intensidade.faixa,
        Range::new(60.0, 70.0)
    );
    assert_eq!(baseline.guidelines.pesos.reps, Range::new(10.0, 15.0));
}

#[test]
fn test_adding_a_matching_rule_only_narrows() {
    let drafts = mixed_drafts();
    let before = orchestrator().evaluate(&rules_from(&drafts[..3]), &all_answers());
    let after = orchestrator().evaluate(&rules_from(&drafts), &all_answers());

    let (wide, narrow) = (before.guidelines.pesos.reps, after.guidelines.pesos.reps);
    assert!(wide.contains(&narrow));
    for item in &before.guidelines.contraindicacoes {
        assert!(after.guidelines.contraindicacoes.contains(item));
    }
}

#[test]
fn test_lists_union_without_duplicates() {
    let response = orchestrator().evaluate(&rules_from(&mixed_drafts()), &all_answers());
    assert_eq!(
        response.guidelines.contraindicacoes,
        vec![
            "Manobra de Valsalva".to_owned(),
            "Exercícios isométricos prolongados".to_owned(),
        ]
    );
}

#[test]
fn test_repeated_previews_are_identical() {
    let rules = rules_from(&mixed_drafts());
    let first = orchestrator().evaluate(&rules, &all_answers());
    let second = orchestrator().evaluate(&rules, &all_answers());
    assert_eq!(first.guidelines, second.guidelines);
    assert_eq!(first.debug.trace, second.debug.trace);
}
