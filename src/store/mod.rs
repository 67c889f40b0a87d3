// ABOUTME: Guideline storage abstraction for versions and their rules
// ABOUTME: Async trait with the DRAFT-only write guard as part of its contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Guideline store
//!
//! Versions belong to one tenant; a version owned by another tenant is reported
//! as not found. Rules are returned in authoring order, which is the tie-break
//! the merger relies on.
//!
//! Every rule mutation must be rejected with `RESOURCE_LOCKED` once the version
//! is published. Implementations perform the status check and the write under
//! one lock (or one transaction).

use crate::errors::AppResult;
use async_trait::async_trait;
use diretriz_core::models::{GuidelineVersion, Rule, RuleDraft, RuleId, TenantId, VersionId};

/// In-memory store implementation
pub mod memory;

pub use memory::InMemoryGuidelineStore;

/// Storage for guideline versions and rules
#[async_trait]
pub trait GuidelineStore: Send + Sync {
    // ================================
    // Versions
    // ================================

    /// Create a new DRAFT version with the next sequence number
    async fn create_version(&self, tenant: TenantId, title: &str) -> AppResult<GuidelineVersion>;

    /// Fetch a version
    async fn get_version(&self, tenant: TenantId, id: VersionId) -> AppResult<GuidelineVersion>;

    /// All versions of a tenant, newest sequence number first
    async fn list_versions(&self, tenant: TenantId) -> AppResult<Vec<GuidelineVersion>>;

    /// The tenant's default version
    async fn default_version(&self, tenant: TenantId) -> AppResult<GuidelineVersion>;

    /// Transition DRAFT to PUBLISHED
    async fn publish(&self, tenant: TenantId, id: VersionId) -> AppResult<GuidelineVersion>;

    /// Fork a PUBLISHED version into a new DRAFT carrying copies of its rules
    async fn correct(&self, tenant: TenantId, id: VersionId) -> AppResult<GuidelineVersion>;

    /// Make a PUBLISHED version the tenant default, clearing the previous one
    async fn set_default(&self, tenant: TenantId, id: VersionId) -> AppResult<GuidelineVersion>;

    // ================================
    // Rules
    // ================================

    /// Validate and append a rule to a DRAFT version
    async fn add_rule(&self, tenant: TenantId, version: VersionId, draft: RuleDraft)
        -> AppResult<Rule>;

    /// Validate and replace a rule of a DRAFT version, keeping its position
    async fn update_rule(
        &self,
        tenant: TenantId,
        version: VersionId,
        rule: RuleId,
        draft: RuleDraft,
    ) -> AppResult<Rule>;

    /// Remove a rule from a DRAFT version
    async fn delete_rule(&self, tenant: TenantId, version: VersionId, rule: RuleId)
        -> AppResult<()>;

    /// Rules of a version in authoring order
    async fn list_rules(&self, tenant: TenantId, version: VersionId) -> AppResult<Vec<Rule>>;
}
