// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides logging setup, rule builders, and a store seeded with published versions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `diretriz_server`

use diretriz_core::models::{
    AerobicMethod, Condition, ConditionExpr, Outputs, Predicate, PriorityClinical, Range,
    RuleDraft, Scalar, TenantId, VersionId,
};
use diretriz_engine::EngineConfig;
use diretriz_server::preview::PreviewOrchestrator;
use diretriz_server::routes::{router, AppState};
use diretriz_server::store::{GuidelineStore, InMemoryGuidelineStore};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory store with default limits
pub fn create_test_store() -> Arc<InMemoryGuidelineStore> {
    init_test_logging();
    Arc::new(InMemoryGuidelineStore::default())
}

/// Orchestrator over the given store with default engine settings
pub fn create_test_orchestrator(store: Arc<InMemoryGuidelineStore>) -> PreviewOrchestrator {
    PreviewOrchestrator::new(store, Arc::new(EngineConfig::default()))
}

/// Full application router over the given store
pub fn create_test_router(store: Arc<InMemoryGuidelineStore>) -> axum::Router {
    router(AppState::new(store, Arc::new(EngineConfig::default())))
}

/// `tag eq true`
pub fn is_true(tag: &str) -> Condition {
    Condition::new(tag, Predicate::Eq(Scalar::Bool(true)))
}

/// Rule draft with a conjunction of conditions and the given outputs
pub fn draft(
    priority: PriorityClinical,
    conditions: Vec<Condition>,
    outputs: Outputs,
) -> RuleDraft {
    RuleDraft {
        priority_clinical: priority,
        condition: ConditionExpr::all_of(conditions),
        outputs,
    }
}

/// Outputs carrying only an aerobic intensity band
pub fn aerobic_band(metodo: Option<AerobicMethod>, lo: f64, hi: f64) -> Outputs {
    let mut outputs = Outputs::default();
    outputs.aerobio.intensidade.metodo = metodo;
    outputs.aerobio.intensidade.faixa = Range::new(lo, hi);
    outputs
}

/// Outputs carrying only an aerobic session duration
pub fn aerobic_duration(lo: f64, hi: f64) -> Outputs {
    let mut outputs = Outputs::default();
    outputs.aerobio.duracao_min = Range::new(lo, hi);
    outputs
}

/// Create a DRAFT, add the drafts in order, publish it, and return its id
pub async fn publish_version(
    store: &InMemoryGuidelineStore,
    tenant: TenantId,
    drafts: Vec<RuleDraft>,
) -> VersionId {
    let version = store
        .create_version(tenant, "Diretrizes de teste")
        .await
        .unwrap();
    for rule in drafts {
        store.add_rule(tenant, version.id, rule).await.unwrap();
    }
    store.publish(tenant, version.id).await.unwrap();
    version.id
}

/// Complete JP7 skinfold set for a male student
pub fn jp7_skinfolds() -> serde_json::Value {
    serde_json::json!({
        "tricipital": 10.0,
        "peitoral": 12.0,
        "subescapular": 15.0,
        "suprailíaca": 14.0,
        "axilar_media": 11.0,
        "abdominal": 20.0,
        "coxa": 16.0
    })
}
