// ABOUTME: Route handlers for guideline versions, their rules, and previews
// ABOUTME: Version lifecycle (create, publish, correct, default), DRAFT-only rule CRUD, and preview
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Guideline routes
//!
//! Rule mutations on a PUBLISHED version fail with `409 RESOURCE_LOCKED`; the
//! way to change a published version is `POST .../correct`, which forks it
//! into a new DRAFT.

use super::{parse_json_body, parse_optional_json_body, tenant_from_headers, AppState};
use crate::errors::{AppError, AppResult};
use crate::preview::{PreviewRequest, VersionSelector};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use diretriz_core::constants::headers;
use diretriz_core::models::{GuidelineVersion, Rule, RuleDraft, RuleId, VersionId};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Body for creating a version
#[derive(Debug, Deserialize)]
pub struct CreateVersionBody {
    /// Display title
    pub title: String,
}

/// Version with its rule count
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    /// The version
    #[serde(flatten)]
    pub version: GuidelineVersion,
    /// Number of rules it carries
    pub rule_count: usize,
}

/// Version listing
#[derive(Debug, Serialize)]
pub struct ListVersionsResponse {
    /// Versions, newest first
    pub versions: Vec<GuidelineVersion>,
    /// Number of versions
    pub total: usize,
}

/// Rule listing
#[derive(Debug, Serialize)]
pub struct ListRulesResponse {
    /// Rules in authoring order
    pub rules: Vec<Rule>,
    /// Number of rules
    pub total: usize,
}

/// Guideline routes implementation
pub struct GuidelineRoutes;

impl GuidelineRoutes {
    /// Create all guideline routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route(
                "/api/guidelines/versions",
                get(Self::handle_list_versions).post(Self::handle_create_version),
            )
            .route("/api/guidelines/versions/:id", get(Self::handle_get_version))
            .route(
                "/api/guidelines/versions/:id/publish",
                post(Self::handle_publish),
            )
            .route(
                "/api/guidelines/versions/:id/correct",
                post(Self::handle_correct),
            )
            .route(
                "/api/guidelines/versions/:id/default",
                post(Self::handle_set_default),
            )
            .route(
                "/api/guidelines/versions/:id/rules",
                get(Self::handle_list_rules).post(Self::handle_add_rule),
            )
            .route(
                "/api/guidelines/versions/:id/rules/:rule_id",
                put(Self::handle_update_rule).delete(Self::handle_delete_rule),
            )
            .route(
                "/api/guidelines/versions/:id/preview",
                post(Self::handle_preview),
            )
            .with_state(state)
    }

    fn parse_version_id(raw: &str) -> AppResult<VersionId> {
        raw.parse()
            .map_err(|_| AppError::invalid_input(format!("Invalid version id: {raw}")))
    }

    fn parse_rule_id(raw: &str) -> AppResult<RuleId> {
        raw.parse()
            .map_err(|_| AppError::invalid_input(format!("Invalid rule id: {raw}")))
    }

    /// Handle GET /api/guidelines/versions
    async fn handle_list_versions(
        State(state): State<AppState>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let versions = state.store.list_versions(tenant).await?;
        let response = ListVersionsResponse {
            total: versions.len(),
            versions,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/guidelines/versions
    async fn handle_create_version(
        State(state): State<AppState>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let body: CreateVersionBody = parse_json_body(&body)?;
        let version = state.store.create_version(tenant, &body.title).await?;
        Ok((StatusCode::CREATED, Json(version)).into_response())
    }

    /// Handle GET /api/guidelines/versions/:id
    async fn handle_get_version(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let id = Self::parse_version_id(&id)?;
        let version = state.store.get_version(tenant, id).await?;
        let rule_count = state.store.list_rules(tenant, id).await?.len();
        let response = VersionResponse {
            version,
            rule_count,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/guidelines/versions/:id/publish
    async fn handle_publish(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let version = state
            .store
            .publish(tenant, Self::parse_version_id(&id)?)
            .await?;
        Ok((StatusCode::OK, Json(version)).into_response())
    }

    /// Handle POST /api/guidelines/versions/:id/correct
    async fn handle_correct(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let fork = state
            .store
            .correct(tenant, Self::parse_version_id(&id)?)
            .await?;
        Ok((StatusCode::CREATED, Json(fork)).into_response())
    }

    /// Handle POST /api/guidelines/versions/:id/default
    async fn handle_set_default(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let version = state
            .store
            .set_default(tenant, Self::parse_version_id(&id)?)
            .await?;
        Ok((StatusCode::OK, Json(version)).into_response())
    }

    /// Handle GET /api/guidelines/versions/:id/rules
    async fn handle_list_rules(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let rules = state
            .store
            .list_rules(tenant, Self::parse_version_id(&id)?)
            .await?;
        let response = ListRulesResponse {
            total: rules.len(),
            rules,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/guidelines/versions/:id/rules
    async fn handle_add_rule(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path(id): Path<String>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let version = Self::parse_version_id(&id)?;
        let draft: RuleDraft = parse_json_body(&body)?;
        let rule = state.store.add_rule(tenant, version, draft).await?;
        Ok((StatusCode::CREATED, Json(rule)).into_response())
    }

    /// Handle PUT /api/guidelines/versions/:id/rules/:rule_id
    async fn handle_update_rule(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path((id, rule_id)): Path<(String, String)>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let version = Self::parse_version_id(&id)?;
        let rule_id = Self::parse_rule_id(&rule_id)?;
        let draft: RuleDraft = parse_json_body(&body)?;
        let rule = state
            .store
            .update_rule(tenant, version, rule_id, draft)
            .await?;
        Ok((StatusCode::OK, Json(rule)).into_response())
    }

    /// Handle DELETE /api/guidelines/versions/:id/rules/:rule_id
    async fn handle_delete_rule(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path((id, rule_id)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let tenant = tenant_from_headers(&headers)?;
        let version = Self::parse_version_id(&id)?;
        let rule_id = Self::parse_rule_id(&rule_id)?;
        state.store.delete_rule(tenant, version, rule_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/guidelines/versions/:id/preview
    async fn handle_preview(
        State(state): State<AppState>,
        headers: HeaderMap,
        Path(id): Path<String>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let started = Instant::now();
        let tenant = tenant_from_headers(&headers)?;
        let selector: VersionSelector = id.parse()?;
        let request: PreviewRequest = parse_optional_json_body(&body)?;

        let preview = state.preview.preview(tenant, selector, &request).await?;

        let elapsed = format!("{}ms", started.elapsed().as_millis());
        let mut response = (StatusCode::OK, Json(preview)).into_response();
        if let Ok(value) = HeaderValue::from_str(&elapsed) {
            response.headers_mut().insert(headers::QUERY_TIME, value);
        }
        Ok(response)
    }
}
