// ABOUTME: HTTP route composition for the guidelines server
// ABOUTME: Shared application state, tenant extraction, JSON body parsing, and the assembled router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route modules
//!
//! Every `/api/guidelines` route is scoped by the opaque tenant identifier in
//! the `x-tenant-id` header; authentication happens upstream.

/// Reference catalog routes (tags, protocols, RIR matrix)
pub mod catalog;
/// Guideline version, rule, and preview routes
pub mod guidelines;
/// Health check routes
pub mod health;

pub use catalog::CatalogRoutes;
pub use guidelines::GuidelineRoutes;
pub use health::HealthRoutes;

use crate::errors::{AppError, AppResult};
use crate::preview::PreviewOrchestrator;
use crate::store::GuidelineStore;
use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::Router;
use diretriz_core::constants::headers;
use diretriz_core::models::TenantId;
use diretriz_engine::EngineConfig;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// State shared by the guideline handlers
#[derive(Clone)]
pub struct AppState {
    /// Version and rule storage
    pub store: Arc<dyn GuidelineStore>,
    /// Preview runner over the same store
    pub preview: PreviewOrchestrator,
}

impl AppState {
    /// Build state around a store
    #[must_use]
    pub fn new(store: Arc<dyn GuidelineStore>, config: Arc<EngineConfig>) -> Self {
        Self {
            preview: PreviewOrchestrator::new(Arc::clone(&store), config),
            store,
        }
    }
}

/// Assemble every route
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(CatalogRoutes::routes())
        .merge(GuidelineRoutes::routes(state))
}

/// Tenant identifier from the request headers
///
/// # Errors
///
/// Returns a missing field error without the header and invalid input when it
/// is not a UUID
pub fn tenant_from_headers(headers: &HeaderMap) -> AppResult<TenantId> {
    let raw = headers
        .get(headers::TENANT_ID)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::missing_field(headers::TENANT_ID))?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid tenant id: {raw}")))
}

/// Decode a JSON body into the unified error shape instead of axum's rejection text
///
/// # Errors
///
/// Returns invalid input when the body is not valid JSON for `T`
pub fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| {
            AppError::invalid_input(format!("Malformed JSON body: {e}")).with_source(e)
        })
}

/// Like [`parse_json_body`], but an empty body decodes as `T::default()`
///
/// # Errors
///
/// Returns invalid input when a non-empty body is not valid JSON for `T`
pub fn parse_optional_json_body<T: DeserializeOwned + Default>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_json_body(body)
}
