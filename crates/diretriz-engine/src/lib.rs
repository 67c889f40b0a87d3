// ABOUTME: Rule engine for the Diretriz training guidelines platform
// ABOUTME: Condition evaluation, body composition, RIR lookup, rule selection, and output merging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Diretriz Engine
//!
//! Pure, synchronous computation over the models in `diretriz-core`. Nothing in
//! this crate performs I/O; the server crate loads rules and facts and hands
//! them in.
//!
//! A preview runs the pieces in order:
//!
//! 1. [`facts::FactSet`] collects answers and derived values
//! 2. [`selector::RuleSelector`] keeps the rules whose condition holds
//! 3. [`merger::OutputMerger`] folds them into one prescription and a [`trace::DecisionTrace`]
//!
//! The [`anthropometry::AnthropometryCalculator`] and [`rir::RirResolver`]
//! supply derived values and reference lookups along the way.

/// Engine configuration and environment overrides
pub mod config;

/// Fact set built from questionnaire answers and derived values
pub mod facts;

/// Boolean evaluation of condition trees
pub mod evaluator;

/// Body composition from skinfold protocols
pub mod anthropometry;

/// RIR to %1RM lookup
pub mod rir;

/// Selection of matching rules
pub mod selector;

/// Folding matched rules into a combined output
pub mod merger;

/// Decision trace types
pub mod trace;

pub use anthropometry::{AnthropometryCalculator, AnthropometryOutcome, StudentProfile};
pub use config::EngineConfig;
pub use evaluator::evaluate;
pub use facts::FactSet;
pub use merger::{MergeResult, OutputMerger};
pub use rir::RirResolver;
pub use selector::{MatchedRule, RuleSelector};
pub use trace::{DecisionTrace, IntensityMerge};
