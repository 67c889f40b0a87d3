// ABOUTME: Guideline domain models shared by the engine and the service
// ABOUTME: Re-exports ranges, conditions, outputs, rules, versions, protocols, and the RIR matrix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain models
//!
//! Plain serializable data. Validation that needs the tag vocabulary lives on
//! [`RuleDraft::validate`]; lifecycle rules live on [`GuidelineVersion`].

/// Skinfold protocols and body composition snapshots
pub mod anthropometry;
/// Condition atoms and boolean condition trees
pub mod condition;
/// Identifier newtypes
pub mod ids;
/// Prescription outputs
pub mod outputs;
/// Closed numeric ranges
pub mod range;
/// RIR to %1RM reference matrix
pub mod rir;
/// Clinical rules and priorities
pub mod rule;
/// Guideline versions and their lifecycle
pub mod version;

pub use anthropometry::{
    AnthroInput, AnthroProtocol, AnthroSnapshot, DensityEquation, FatEquation, FatFormula, Sex,
};
pub use condition::{Condition, ConditionExpr, Operator, Predicate, Scalar};
pub use ids::{RuleId, TenantId, VersionId};
pub use outputs::{
    AerobicIntensity, AerobicMethod, AerobicOutputs, FlexMobOutputs, Outputs, RangeField,
    ResistanceOutputs,
};
pub use range::Range;
pub use rir::{RirEntry, RirMatrix, RirRow};
pub use rule::{PriorityClinical, Rule, RuleDraft, RuleLimits};
pub use version::{GuidelineVersion, VersionStatus};
