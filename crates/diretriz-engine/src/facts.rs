// ABOUTME: Per-request fact set mapping canonical tags to normalized scalar values
// ABOUTME: Built from anamnesis answers, student data, readiness, and body composition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use diretriz_core::constants::derived_tags;
use diretriz_core::models::{AnthroSnapshot, Scalar};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Facts known about one student for one preview
///
/// Values are normalized on insert, so `"sim"` is stored as `true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FactSet {
    facts: BTreeMap<String, Scalar>,
}

impl FactSet {
    /// Empty fact set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a fact
    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<Scalar>) {
        self.facts.insert(tag.into(), value.into().normalized());
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, tag: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(tag, value);
        self
    }

    /// Remove a fact, returning its value
    pub fn remove(&mut self, tag: &str) -> Option<Scalar> {
        self.facts.remove(tag)
    }

    /// Fact value for a tag
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Scalar> {
        self.facts.get(tag)
    }

    /// Whether the tag has a value
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.facts.contains_key(tag)
    }

    /// Number of facts
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether no fact is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate over facts in tag order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.facts.iter().map(|(tag, value)| (tag.as_str(), value))
    }

    /// Fold anamnesis answers into the set
    ///
    /// Strings, numbers, and booleans become facts. Nulls are treated as
    /// unanswered; arrays and objects cannot be compared by any operator and
    /// are skipped with a warning.
    pub fn insert_answers<'a, I>(&mut self, answers: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        let mut warnings = Vec::new();
        for (tag, value) in answers {
            match value {
                Value::Bool(flag) => self.insert(tag.clone(), *flag),
                Value::Number(number) => match number.as_f64() {
                    Some(n) => self.insert(tag.clone(), n),
                    None => warnings.push(format!(
                        "InvalidMeasurement: answer '{tag}' is not a representable number"
                    )),
                },
                Value::String(text) => self.insert(tag.clone(), text.as_str()),
                Value::Null => debug!(tag = %tag, "Skipping unanswered question"),
                Value::Array(_) | Value::Object(_) => warnings.push(format!(
                    "InvalidMeasurement: answer '{tag}' must be a string, number, or boolean"
                )),
            }
        }
        warnings
    }

    /// Add the computed body composition as numeric facts
    pub fn insert_snapshot(&mut self, snapshot: &AnthroSnapshot) {
        self.insert(derived_tags::DENSIDADE_CORPORAL, snapshot.densidade);
        self.insert(derived_tags::PCT_GORDURA, snapshot.pct_gordura);
        self.insert(derived_tags::MASSA_GORDA_KG, snapshot.mg_kg);
        self.insert(derived_tags::MASSA_MAGRA_KG, snapshot.mm_kg);
    }

    /// Derived tags a rule may use that this set cannot answer
    #[must_use]
    pub fn unavailable_derived(&self) -> Vec<&'static str> {
        derived_tags::ANTHROPOMETRIC
            .into_iter()
            .filter(|tag| !self.contains(tag))
            .collect()
    }
}
