// ABOUTME: End-to-end preview tests over the in-memory store
// ABOUTME: Covers range intersection, priority contradictions, incomplete skinfolds, and RIR domain errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    aerobic_band, aerobic_duration, create_test_orchestrator, create_test_store, draft, is_true,
    jp7_skinfolds, publish_version,
};
use diretriz_core::constants::{aerobic_defaults, derived_tags};
use diretriz_core::models::{
    Condition, Outputs, Predicate, PriorityClinical, Range, Scalar, TenantId,
};
use diretriz_engine::trace::criteria;
use diretriz_server::preview::{PreviewRequest, VersionSelector, NO_RULES_WARNING};
use diretriz_server::store::GuidelineStore;
use serde_json::json;

const FAIXA: &str = "aerobio.intensidade.faixa";

fn request(value: serde_json::Value) -> PreviewRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_overlapping_bands_intersect() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![
            draft(
                PriorityClinical::Media,
                vec![is_true("hipertensao")],
                aerobic_band(None, 60.0, 80.0),
            ),
            draft(
                PriorityClinical::Alta,
                vec![is_true("diabetes")],
                aerobic_band(None, 50.0, 70.0),
            ),
        ],
    )
    .await;
    let rules = store.list_rules(tenant, version).await.unwrap();
    let (media, alta) = (rules[0].id, rules[1].id);

    let response = create_test_orchestrator(store)
        .preview(
            tenant,
            VersionSelector::Id(version),
            &request(json!({"answers": {"hipertensao": true, "diabetes": true}})),
        )
        .await
        .unwrap();

    assert_eq!(
        response.guidelines.aerobio.intensidade.faixa,
        Range::new(60.0, 70.0)
    );
    let sources = &response.debug.trace.bounds[FAIXA];
    assert_eq!(sources.lo_from, media);
    assert_eq!(sources.hi_from, alta);
    assert!(response.debug.trace.contradictions.is_empty());

    let merge = response.debug.merges.intensidade.unwrap();
    assert_eq!(merge.criterio, criteria::INTERSECTION);
    assert_eq!(merge.depois, Range::new(60.0, 70.0));

    let fired: Vec<_> = response.debug.rules_fired.iter().map(|r| r.id).collect();
    assert_eq!(fired, vec![media, alta]);
}

#[tokio::test]
async fn test_disjoint_bands_keep_higher_priority() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![
            draft(
                PriorityClinical::Alta,
                vec![is_true("hipertensao")],
                aerobic_band(None, 70.0, 80.0),
            ),
            draft(
                PriorityClinical::Baixa,
                vec![is_true("hipertensao")],
                aerobic_band(None, 50.0, 60.0),
            ),
        ],
    )
    .await;
    let rules = store.list_rules(tenant, version).await.unwrap();

    let response = create_test_orchestrator(store)
        .preview(
            tenant,
            VersionSelector::Id(version),
            &request(json!({"answers": {"hipertensao": true}})),
        )
        .await
        .unwrap();

    assert_eq!(
        response.guidelines.aerobio.intensidade.faixa,
        Range::new(70.0, 80.0)
    );
    let trace = &response.debug.trace;
    assert!(trace.has_contradiction_on(FAIXA));
    let contradiction = &trace.contradictions[0];
    assert_eq!(contradiction.kept, Range::new(70.0, 80.0));
    assert_eq!(contradiction.rejected, Range::new(50.0, 60.0));
    assert_eq!(contradiction.rejected_rule, rules[1].id);
    assert_eq!(contradiction.rejected_priority, PriorityClinical::Baixa);
    assert_eq!(
        response.debug.merges.intensidade.unwrap().criterio,
        criteria::PRIORITY
    );
}

#[tokio::test]
async fn test_incomplete_skinfolds_skip_snapshot() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![
            draft(
                PriorityClinical::Media,
                vec![is_true("hipertensao")],
                aerobic_duration(20.0, 40.0),
            ),
            draft(
                PriorityClinical::Alta,
                vec![Condition::new(
                    derived_tags::PCT_GORDURA,
                    Predicate::Gt(25.0),
                )],
                aerobic_duration(30.0, 60.0),
            ),
        ],
    )
    .await;

    let mut skinfolds = jp7_skinfolds();
    skinfolds.as_object_mut().unwrap().remove("coxa");
    let payload = request(json!({
        "aluno": {"idade": 35, "sexo": "M"},
        "anthro": {
            "massa_kg": 82.0,
            "estatura_m": 1.78,
            "protocolo_code": "JP7_H_M",
            "skinfolds_mm": skinfolds
        },
        "answers": {"hipertensao": true}
    }));

    let response = create_test_orchestrator(store)
        .preview(tenant, VersionSelector::Id(version), &payload)
        .await
        .unwrap();

    assert!(response.debug.anthro_snapshot.is_none());
    assert!(response
        .debug
        .warnings
        .iter()
        .any(|w| w.starts_with("MissingMeasurement") && w.contains("coxa")));
    assert!(!response.debug.facts.contains(derived_tags::PCT_GORDURA));
    assert_eq!(response.debug.rules_fired.len(), 1);
    assert_eq!(
        response.guidelines.aerobio.duracao_min,
        Range::new(20.0, 40.0)
    );
}

#[tokio::test]
async fn test_complete_skinfolds_feed_rules() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![draft(
            PriorityClinical::Alta,
            vec![Condition::new(derived_tags::PCT_GORDURA, Predicate::Gt(1.0))],
            aerobic_duration(30.0, 60.0),
        )],
    )
    .await;

    let payload = request(json!({
        "aluno": {"idade": 35, "sexo": "M"},
        "anthro": {
            "massa_kg": 82.0,
            "estatura_m": 1.78,
            "protocolo_code": "JP7_H_M",
            "skinfolds_mm": jp7_skinfolds()
        }
    }));

    let response = create_test_orchestrator(store)
        .preview(tenant, VersionSelector::Id(version), &payload)
        .await
        .unwrap();

    let snapshot = response.debug.anthro_snapshot.unwrap();
    assert_eq!(snapshot.protocolo, "JP7_H_M");
    assert!(snapshot.pct_gordura > 0.0);
    assert_eq!(response.debug.rules_fired.len(), 1);
}

#[tokio::test]
async fn test_rir_out_of_domain_is_a_warning() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![draft(
            PriorityClinical::Media,
            vec![is_true("hipertensao")],
            aerobic_duration(20.0, 40.0),
        )],
    )
    .await;

    let response = create_test_orchestrator(store)
        .preview(
            tenant,
            VersionSelector::Id(version),
            &request(json!({"rir": {"reps": 8, "rir": 11}, "answers": {"hipertensao": true}})),
        )
        .await
        .unwrap();

    assert!(response.debug.rir_refs.is_empty());
    assert!(response
        .debug
        .warnings
        .iter()
        .any(|w| w.starts_with("OutOfRange")));
    assert_eq!(
        response.guidelines.aerobio.duracao_min,
        Range::new(20.0, 40.0)
    );
}

#[tokio::test]
async fn test_rir_reference_in_domain() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![draft(
            PriorityClinical::Media,
            vec![is_true("forca")],
            Outputs::default(),
        )],
    )
    .await;

    let response = create_test_orchestrator(store)
        .preview(
            tenant,
            VersionSelector::Id(version),
            &request(json!({"rir": {"reps": 8, "rir": 8}})),
        )
        .await
        .unwrap();

    assert_eq!(response.debug.rir_refs.len(), 1);
    assert_eq!(response.debug.rir_refs[0].pct_1rm, 72);
    assert!(response.debug.warnings.is_empty());
}

#[tokio::test]
async fn test_default_selector_uses_tenant_default() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![draft(
            PriorityClinical::Media,
            vec![is_true("hipertensao")],
            aerobic_duration(20.0, 40.0),
        )],
    )
    .await;
    store.set_default(tenant, version).await.unwrap();

    let response = create_test_orchestrator(store)
        .preview(
            tenant,
            VersionSelector::Default,
            &request(json!({"answers": {"hipertensao": true, "betabloqueador": true}})),
        )
        .await
        .unwrap();

    let intensity = &response.guidelines.aerobio.intensidade;
    assert_eq!(intensity.faixa, Range::new(40.0, 60.0));
    assert_eq!(
        response.guidelines.observacoes,
        vec![aerobic_defaults::BETA_BLOCKER_NOTE.to_owned()]
    );
}

#[tokio::test]
async fn test_missing_default_is_not_found() {
    let store = create_test_store();
    let result = create_test_orchestrator(store)
        .preview(
            TenantId::new(),
            VersionSelector::Default,
            &PreviewRequest::default(),
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_draft_version_with_no_rules_warns() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = store.create_version(tenant, "Vazia").await.unwrap();

    let response = create_test_orchestrator(store)
        .preview(
            tenant,
            VersionSelector::Id(version.id),
            &PreviewRequest::default(),
        )
        .await
        .unwrap();

    assert!(response.guidelines.is_empty());
    assert!(response.debug.warnings.contains(&NO_RULES_WARNING.to_owned()));
}

#[tokio::test]
async fn test_invalid_student_data_never_fails() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![draft(
            PriorityClinical::Media,
            vec![Condition::new(derived_tags::IDADE, Predicate::Gte(60.0))],
            aerobic_duration(15.0, 30.0),
        )],
    )
    .await;

    let response = create_test_orchestrator(store)
        .preview(
            tenant,
            VersionSelector::Id(version),
            &request(json!({
                "aluno": {"idade": 150, "sexo": "X"},
                "readiness": {"exercicio": 9},
                "answers": {"hipertensao": [1, 2]}
            })),
        )
        .await
        .unwrap();

    assert!(response.debug.rules_fired.is_empty());
    assert!(!response.debug.facts.contains(derived_tags::IDADE));
    assert!(!response.debug.facts.contains(derived_tags::READINESS_EXERCICIO));
    assert!(response.debug.warnings.len() >= 4);
    assert_eq!(
        response.debug.facts.get("hipertensao"),
        None::<&Scalar>
    );
}

#[tokio::test]
async fn test_answered_body_composition_never_reaches_rules() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![draft(
            PriorityClinical::Alta,
            vec![Condition::new(derived_tags::PCT_GORDURA, Predicate::Gt(30.0))],
            aerobic_duration(30.0, 60.0),
        )],
    )
    .await;

    let payload = request(json!({
        "aluno": {"idade": 35, "sexo": "M"},
        "anthro": {
            "massa_kg": 82.0,
            "estatura_m": 1.78,
            "protocolo_code": "JP7_H_M",
            "skinfolds_mm": {"peitoral": 12.0, "tricipital": 10.0}
        },
        "answers": {"pct_gordura": 40}
    }));

    let response = create_test_orchestrator(store)
        .preview(tenant, VersionSelector::Id(version), &payload)
        .await
        .unwrap();

    assert!(response.debug.anthro_snapshot.is_none());
    assert!(response.debug.rules_fired.is_empty());
    assert!(!response.debug.facts.contains(derived_tags::PCT_GORDURA));
    let warnings = &response.debug.warnings;
    assert!(warnings.iter().any(|w| w.starts_with("MissingMeasurement")));
    assert!(warnings
        .iter()
        .any(|w| w.starts_with("InvalidMeasurement") && w.contains("pct_gordura")));
}

#[tokio::test]
async fn test_answered_body_composition_yields_to_snapshot() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![draft(
            PriorityClinical::Media,
            vec![is_true("hipertensao")],
            aerobic_duration(20.0, 40.0),
        )],
    )
    .await;

    let payload = request(json!({
        "aluno": {"idade": 35, "sexo": "M"},
        "anthro": {
            "massa_kg": 82.0,
            "estatura_m": 1.78,
            "protocolo_code": "JP7_H_M",
            "skinfolds_mm": jp7_skinfolds()
        },
        "answers": {"pct_gordura": 99}
    }));

    let response = create_test_orchestrator(store)
        .preview(tenant, VersionSelector::Id(version), &payload)
        .await
        .unwrap();

    let snapshot = response.debug.anthro_snapshot.unwrap();
    assert_eq!(
        response.debug.facts.get(derived_tags::PCT_GORDURA),
        Some(&Scalar::Number(snapshot.pct_gordura))
    );
}

#[tokio::test]
async fn test_mistyped_payload_values_become_warnings() {
    let store = create_test_store();
    let tenant = TenantId::new();
    let version = publish_version(
        &store,
        tenant,
        vec![draft(
            PriorityClinical::Media,
            vec![is_true("hipertensao")],
            aerobic_duration(20.0, 40.0),
        )],
    )
    .await;

    let payload = request(json!({
        "aluno": {"idade": "quarenta", "sexo": 1},
        "readiness": {"exercicio": "alta"},
        "rir": {"reps": 8.5, "rir": "6"},
        "anthro": {"massa_kg": "82", "protocolo_code": "JP7_H_M"},
        "answers": {"hipertensao": true}
    }));

    let response = create_test_orchestrator(store)
        .preview(tenant, VersionSelector::Id(version), &payload)
        .await
        .unwrap();

    assert_eq!(response.debug.rules_fired.len(), 1);
    assert_eq!(
        response.guidelines.aerobio.duracao_min,
        Range::new(20.0, 40.0)
    );
    assert!(response.debug.rir_refs.is_empty());
    assert!(response.debug.anthro_snapshot.is_none());
    assert!(!response.debug.facts.contains(derived_tags::IDADE));

    let warnings = &response.debug.warnings;
    for field in [
        "aluno.idade",
        "aluno.sexo",
        "readiness.exercicio",
        "rir.reps",
        "rir.rir",
        "anthro",
    ] {
        let prefix = format!("InvalidMeasurement: invalid measurement '{field}'");
        assert!(
            warnings.iter().any(|w| w.starts_with(&prefix)),
            "no warning for {field}: {warnings:?}"
        );
    }
    assert!(warnings.iter().any(|w| w.contains("whole number")));
}
