// ABOUTME: Guideline version model with the DRAFT to PUBLISHED state machine
// ABOUTME: Publishing is one-way; corrections fork a new DRAFT that records its origin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ids::{TenantId, VersionId};
use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a guideline version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VersionStatus {
    /// Editable; rules may be added, changed, or removed
    Draft,
    /// Frozen; usable as a tenant default
    Published,
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("DRAFT"),
            Self::Published => f.write_str("PUBLISHED"),
        }
    }
}

/// A versioned set of clinical rules owned by one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineVersion {
    /// Version identifier
    pub id: VersionId,
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Display title
    pub title: String,
    /// Per-tenant sequence number, starting at 1
    pub version: u32,
    /// Lifecycle state
    pub status: VersionStatus,
    /// Whether previews without an explicit version use this one
    pub is_default: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Set once, when the version is published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Published version this draft was forked from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_from: Option<VersionId>,
}

impl GuidelineVersion {
    /// New DRAFT version
    #[must_use]
    pub fn draft(tenant_id: TenantId, title: impl Into<String>, version: u32) -> Self {
        Self {
            id: VersionId::new(),
            tenant_id,
            title: title.into(),
            version,
            status: VersionStatus::Draft,
            is_default: false,
            created_at: Utc::now(),
            published_at: None,
            corrected_from: None,
        }
    }

    /// Whether rules of this version may still change
    #[must_use]
    pub const fn is_draft(&self) -> bool {
        matches!(self.status, VersionStatus::Draft)
    }

    /// Guard for every rule mutation
    ///
    /// # Errors
    ///
    /// Returns a `ResourceLocked` error when the version is published.
    pub fn ensure_mutable(&self) -> Result<(), AppError> {
        if self.is_draft() {
            Ok(())
        } else {
            Err(AppError::locked(format!(
                "version {} is {} and cannot be modified; create a correction instead",
                self.id, self.status
            ))
            .with_resource_id(self.id.to_string()))
        }
    }

    /// Transition DRAFT to PUBLISHED
    ///
    /// # Errors
    ///
    /// Returns an invalid transition error if already published or if the
    /// version carries no rules.
    pub fn publish(&mut self, rule_count: usize) -> Result<(), AppError> {
        if !self.is_draft() {
            return Err(AppError::invalid_transition(format!(
                "version {} is already published",
                self.id
            )));
        }
        if rule_count == 0 {
            return Err(AppError::invalid_transition(
                "a version needs at least one rule before it can be published",
            ));
        }
        self.status = VersionStatus::Published;
        self.published_at = Some(Utc::now());
        Ok(())
    }

    /// Fork a published version into a new DRAFT with the given sequence number
    ///
    /// # Errors
    ///
    /// Returns an invalid transition error when the source is still a DRAFT.
    pub fn fork_correction(&self, next_version: u32) -> Result<Self, AppError> {
        if self.is_draft() {
            return Err(AppError::invalid_transition(format!(
                "version {} is a draft; edit it directly instead of correcting it",
                self.id
            )));
        }
        let mut fork = Self::draft(self.tenant_id, self.title.clone(), next_version);
        fork.corrected_from = Some(self.id);
        Ok(fork)
    }

    /// Check that this version may become the tenant default
    ///
    /// # Errors
    ///
    /// Returns an invalid transition error for DRAFT versions.
    pub fn ensure_defaultable(&self) -> Result<(), AppError> {
        if self.is_draft() {
            Err(AppError::invalid_transition(format!(
                "version {} must be published before it can be the default",
                self.id
            )))
        } else {
            Ok(())
        }
    }
}
