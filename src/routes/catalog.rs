// ABOUTME: Route handlers for the read-only reference catalogs
// ABOUTME: Canonical condition tags, anthropometric protocols, and the RIR to %1RM matrix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use diretriz_core::catalog::{self, ProtocolCatalog, TagCatalog, TagCategory, TagDefinition};
use diretriz_core::constants::rir_domain;
use diretriz_core::models::{AnthroProtocol, RirRow};
use serde::{Deserialize, Serialize};

/// Filters for the tag listing
#[derive(Debug, Default, Deserialize)]
pub struct TagQuery {
    /// Restrict to one category
    pub category: Option<TagCategory>,
    /// Case-insensitive text search
    pub q: Option<String>,
}

/// Tag listing
#[derive(Debug, Serialize)]
pub struct TagListResponse {
    /// Matching tags
    pub tags: Vec<&'static TagDefinition>,
    /// Every category of the vocabulary
    pub categories: Vec<TagCategory>,
    /// Number of matching tags
    pub total: usize,
}

/// Protocol listing
#[derive(Debug, Serialize)]
pub struct ProtocolListResponse {
    /// Built-in protocols
    pub protocols: &'static [AnthroProtocol],
}

/// RIR matrix listing
#[derive(Debug, Serialize)]
pub struct RirMatrixResponse {
    /// Inclusive RIR domain
    pub rir_range: [u8; 2],
    /// Inclusive repetition domain
    pub reps_range: [u8; 2],
    /// One row per RIR level
    pub rows: &'static [RirRow],
}

/// Catalog routes implementation
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes() -> Router {
        Router::new()
            .route("/api/guidelines/catalog/tags", get(Self::handle_tags))
            .route(
                "/api/guidelines/catalog/protocols",
                get(Self::handle_protocols),
            )
            .route("/api/guidelines/catalog/rir", get(Self::handle_rir))
    }

    /// Handle GET /api/guidelines/catalog/tags
    async fn handle_tags(Query(query): Query<TagQuery>) -> Response {
        let catalog = TagCatalog::builtin();
        let mut tags = catalog.search(query.q.as_deref().unwrap_or_default());
        if let Some(category) = query.category {
            tags.retain(|def| def.category == category);
        }

        let response = TagListResponse {
            total: tags.len(),
            tags,
            categories: catalog.categories(),
        };
        (StatusCode::OK, Json(response)).into_response()
    }

    /// Handle GET /api/guidelines/catalog/protocols
    async fn handle_protocols() -> Response {
        let response = ProtocolListResponse {
            protocols: ProtocolCatalog::builtin().all(),
        };
        (StatusCode::OK, Json(response)).into_response()
    }

    /// Handle GET /api/guidelines/catalog/rir
    async fn handle_rir() -> Response {
        let response = RirMatrixResponse {
            rir_range: [rir_domain::RIR_MIN, rir_domain::RIR_MAX],
            reps_range: [rir_domain::REPS_MIN, rir_domain::REPS_MAX],
            rows: catalog::rir::builtin().rows(),
        };
        (StatusCode::OK, Json(response)).into_response()
    }
}
