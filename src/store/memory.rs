// ABOUTME: In-memory guideline store backed by a tokio RwLock
// ABOUTME: Status guard and mutation happen under one write lock; concurrent edits are last-write-wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::GuidelineStore;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use async_trait::async_trait;
use diretriz_core::catalog::TagCatalog;
use diretriz_core::models::{
    GuidelineVersion, Rule, RuleDraft, RuleId, RuleLimits, TenantId, VersionId,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    versions: HashMap<VersionId, GuidelineVersion>,
    rules: HashMap<VersionId, Vec<Rule>>,
}

impl Tables {
    fn version(&self, tenant: TenantId, id: VersionId) -> AppResult<&GuidelineVersion> {
        self.versions
            .get(&id)
            .filter(|version| version.tenant_id == tenant)
            .ok_or_else(|| AppError::not_found(format!("Guideline version {id}")))
    }

    fn version_mut(&mut self, tenant: TenantId, id: VersionId) -> AppResult<&mut GuidelineVersion> {
        self.versions
            .get_mut(&id)
            .filter(|version| version.tenant_id == tenant)
            .ok_or_else(|| AppError::not_found(format!("Guideline version {id}")))
    }

    fn next_sequence(&self, tenant: TenantId) -> u32 {
        self.versions
            .values()
            .filter(|version| version.tenant_id == tenant)
            .map(|version| version.version)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn rule_count(&self, id: VersionId) -> usize {
        self.rules.get(&id).map_or(0, Vec::len)
    }

    /// Rules of a version that may be mutated
    fn draft_rules_mut(&mut self, tenant: TenantId, id: VersionId) -> AppResult<&mut Vec<Rule>> {
        self.version(tenant, id)?.ensure_mutable()?;
        Ok(self.rules.entry(id).or_default())
    }
}

/// Guideline store kept in process memory
#[derive(Debug)]
pub struct InMemoryGuidelineStore {
    tables: RwLock<Tables>,
    catalog: &'static TagCatalog,
    limits: RuleLimits,
}

impl Default for InMemoryGuidelineStore {
    fn default() -> Self {
        Self::new(RuleLimits::default())
    }
}

impl InMemoryGuidelineStore {
    /// Empty store validating rules against the built-in tag catalog
    #[must_use]
    pub fn new(limits: RuleLimits) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            catalog: TagCatalog::builtin(),
            limits,
        }
    }
}

#[async_trait]
impl GuidelineStore for InMemoryGuidelineStore {
    async fn create_version(&self, tenant: TenantId, title: &str) -> AppResult<GuidelineVersion> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::missing_field("title"));
        }

        let mut tables = self.tables.write().await;
        let version = GuidelineVersion::draft(tenant, title, tables.next_sequence(tenant));
        tables.versions.insert(version.id, version.clone());
        tables.rules.insert(version.id, Vec::new());
        drop(tables);

        AppLogger::log_version_event(version.id, "created", version.version);
        Ok(version)
    }

    async fn get_version(&self, tenant: TenantId, id: VersionId) -> AppResult<GuidelineVersion> {
        self.tables.read().await.version(tenant, id).cloned()
    }

    async fn list_versions(&self, tenant: TenantId) -> AppResult<Vec<GuidelineVersion>> {
        let tables = self.tables.read().await;
        let mut versions: Vec<GuidelineVersion> = tables
            .versions
            .values()
            .filter(|version| version.tenant_id == tenant)
            .cloned()
            .collect();
        drop(tables);
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    async fn default_version(&self, tenant: TenantId) -> AppResult<GuidelineVersion> {
        self.tables
            .read()
            .await
            .versions
            .values()
            .find(|version| version.tenant_id == tenant && version.is_default)
            .cloned()
            .ok_or_else(|| AppError::not_found("Default guideline version"))
    }

    async fn publish(&self, tenant: TenantId, id: VersionId) -> AppResult<GuidelineVersion> {
        let mut tables = self.tables.write().await;
        let rule_count = tables.rule_count(id);
        let version = tables.version_mut(tenant, id)?;
        version.publish(rule_count)?;
        let published = version.clone();
        drop(tables);

        AppLogger::log_version_event(published.id, "published", published.version);
        Ok(published)
    }

    async fn correct(&self, tenant: TenantId, id: VersionId) -> AppResult<GuidelineVersion> {
        let mut tables = self.tables.write().await;
        let next = tables.next_sequence(tenant);
        let fork = tables.version(tenant, id)?.fork_correction(next)?;
        let copied: Vec<Rule> = tables
            .rules
            .get(&id)
            .map(|rules| rules.iter().map(|rule| rule.cloned_into(fork.id)).collect())
            .unwrap_or_default();

        debug!(
            version.id = %fork.id,
            corrected_from = %id,
            rules.copied = copied.len(),
            "Forked correction draft"
        );
        tables.rules.insert(fork.id, copied);
        tables.versions.insert(fork.id, fork.clone());
        drop(tables);

        AppLogger::log_version_event(fork.id, "corrected", fork.version);
        Ok(fork)
    }

    async fn set_default(&self, tenant: TenantId, id: VersionId) -> AppResult<GuidelineVersion> {
        let mut tables = self.tables.write().await;
        tables.version(tenant, id)?.ensure_defaultable()?;
        for version in tables.versions.values_mut() {
            if version.tenant_id == tenant {
                version.is_default = version.id == id;
            }
        }
        let chosen = tables.version(tenant, id)?.clone();
        drop(tables);

        AppLogger::log_version_event(chosen.id, "set_default", chosen.version);
        Ok(chosen)
    }

    async fn add_rule(
        &self,
        tenant: TenantId,
        version: VersionId,
        draft: RuleDraft,
    ) -> AppResult<Rule> {
        draft.validate(self.catalog, &self.limits)?;

        let mut tables = self.tables.write().await;
        let rules = tables.draft_rules_mut(tenant, version)?;
        let rule = Rule::from_draft(version, draft);
        rules.push(rule.clone());
        drop(tables);

        debug!(version.id = %version, rule.id = %rule.id, "Added rule");
        Ok(rule)
    }

    async fn update_rule(
        &self,
        tenant: TenantId,
        version: VersionId,
        rule_id: RuleId,
        draft: RuleDraft,
    ) -> AppResult<Rule> {
        draft.validate(self.catalog, &self.limits)?;

        let mut tables = self.tables.write().await;
        let rules = tables.draft_rules_mut(tenant, version)?;
        let rule = rules
            .iter_mut()
            .find(|rule| rule.id == rule_id)
            .ok_or_else(|| AppError::not_found(format!("Rule {rule_id}")))?;
        rule.priority_clinical = draft.priority_clinical;
        rule.condition = draft.condition;
        rule.outputs = draft.outputs;
        let updated = rule.clone();
        drop(tables);

        debug!(version.id = %version, rule.id = %rule_id, "Updated rule");
        Ok(updated)
    }

    async fn delete_rule(
        &self,
        tenant: TenantId,
        version: VersionId,
        rule_id: RuleId,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let rules = tables.draft_rules_mut(tenant, version)?;
        let before = rules.len();
        rules.retain(|rule| rule.id != rule_id);
        if rules.len() == before {
            return Err(AppError::not_found(format!("Rule {rule_id}")));
        }
        drop(tables);

        debug!(version.id = %version, rule.id = %rule_id, "Deleted rule");
        Ok(())
    }

    async fn list_rules(&self, tenant: TenantId, version: VersionId) -> AppResult<Vec<Rule>> {
        let tables = self.tables.read().await;
        tables.version(tenant, version)?;
        Ok(tables.rules.get(&version).cloned().unwrap_or_default())
    }
}
