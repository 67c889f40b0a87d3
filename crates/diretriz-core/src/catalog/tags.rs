// ABOUTME: Canonical tag vocabulary that rule conditions may reference
// ABOUTME: Answered clinical tags plus facts derived by the engine, grouped by category
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::derived_tags;
use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Grouping used by authoring tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    /// Cardiovascular conditions and medication
    Cardiovascular,
    /// Musculoskeletal conditions
    Musculoesqueletica,
    /// Metabolic conditions and body composition
    Metabolica,
    /// Training goals
    Objetivo,
    /// Physical capacities and readiness
    Capacidade,
}

impl TagCategory {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cardiovascular => "cardiovascular",
            Self::Musculoesqueletica => "musculoesqueletica",
            Self::Metabolica => "metabolica",
            Self::Objetivo => "objetivo",
            Self::Capacidade => "capacidade",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type a fact for the tag carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// Yes/no answer
    Boolean,
    /// Numeric measurement or score
    Numeric,
}

/// Entry of the canonical vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDefinition {
    /// Tag referenced by conditions
    pub value: &'static str,
    /// Display label
    pub label: &'static str,
    /// Category
    pub category: TagCategory,
    /// Fact value type
    pub kind: TagKind,
}

const fn tag(
    value: &'static str,
    label: &'static str,
    category: TagCategory,
    kind: TagKind,
) -> TagDefinition {
    TagDefinition {
        value,
        label,
        category,
        kind,
    }
}

static BUILTIN: LazyLock<TagCatalog> = LazyLock::new(|| {
    use TagCategory::{Capacidade, Cardiovascular, Metabolica, Musculoesqueletica, Objetivo};
    use TagKind::{Boolean, Numeric};

    TagCatalog::new(vec![
        tag("dac", "DAC (Doença Arterial Coronariana)", Cardiovascular, Boolean),
        tag("hipertensao", "Hipertensão Arterial", Cardiovascular, Boolean),
        tag(derived_tags::BETABLOQUEADOR, "Uso de Betabloqueador", Cardiovascular, Boolean),
        tag("condromalacia", "Condromalácia Patelar", Musculoesqueletica, Boolean),
        tag("diabetes", "Diabetes Mellitus", Metabolica, Boolean),
        tag("obesidade", "Obesidade", Metabolica, Boolean),
        tag(derived_tags::PCT_GORDURA, "Percentual de Gordura", Metabolica, Numeric),
        tag(derived_tags::MASSA_GORDA_KG, "Massa Gorda (kg)", Metabolica, Numeric),
        tag(derived_tags::MASSA_MAGRA_KG, "Massa Magra (kg)", Metabolica, Numeric),
        tag(derived_tags::DENSIDADE_CORPORAL, "Densidade Corporal", Metabolica, Numeric),
        tag("hipertrofia", "Hipertrofia Muscular", Objetivo, Boolean),
        tag("emagrecimento", "Emagrecimento", Objetivo, Boolean),
        tag("condicionamento", "Condicionamento Físico", Objetivo, Boolean),
        tag("reabilitacao", "Reabilitação", Objetivo, Boolean),
        tag("forca", "Força", Capacidade, Boolean),
        tag("resistencia", "Resistência", Capacidade, Boolean),
        tag("flexibilidade", "Flexibilidade", Capacidade, Boolean),
        tag("coordinacao", "Coordenação", Capacidade, Boolean),
        tag(derived_tags::IDADE, "Idade (anos)", Capacidade, Numeric),
        tag(derived_tags::READINESS_EXERCICIO, "Prontidão para o Exercício (1-5)", Capacidade, Numeric),
    ])
});

/// Closed set of tags a rule condition may reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCatalog {
    tags: Vec<TagDefinition>,
}

impl TagCatalog {
    /// Build a catalog from its definitions
    #[must_use]
    pub const fn new(tags: Vec<TagDefinition>) -> Self {
        Self { tags }
    }

    /// The built-in vocabulary
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// All definitions in catalog order
    #[must_use]
    pub fn all(&self) -> &[TagDefinition] {
        &self.tags
    }

    /// Definition for a tag
    #[must_use]
    pub fn get(&self, value: &str) -> Option<&TagDefinition> {
        self.tags.iter().find(|def| def.value == value)
    }

    /// Whether the tag is part of the vocabulary
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.get(value).is_some()
    }

    /// Definition for a tag, or a configuration error
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownTag` when the tag is not in the vocabulary.
    pub fn require(&self, value: &str) -> Result<&TagDefinition, EngineError> {
        self.get(value).ok_or_else(|| EngineError::UnknownTag {
            tag: value.to_owned(),
        })
    }

    /// Tags of one category
    #[must_use]
    pub fn by_category(&self, category: TagCategory) -> Vec<&TagDefinition> {
        self.tags
            .iter()
            .filter(|def| def.category == category)
            .collect()
    }

    /// Distinct categories in catalog order
    #[must_use]
    pub fn categories(&self) -> Vec<TagCategory> {
        let mut seen = Vec::new();
        for def in &self.tags {
            if !seen.contains(&def.category) {
                seen.push(def.category);
            }
        }
        seen
    }

    /// Case-insensitive search over value, label, and category
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&TagDefinition> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.tags.iter().collect();
        }
        self.tags
            .iter()
            .filter(|def| {
                def.value.contains(&term)
                    || def.label.to_lowercase().contains(&term)
                    || def.category.as_str().contains(&term)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_answered_and_derived_tags() {
        let catalog = TagCatalog::builtin();
        assert!(catalog.contains("hipertensao"));
        assert!(catalog.contains("idade"));
        assert!(catalog.contains("pct_gordura"));
        assert!(!catalog.contains("asma"));
    }

    #[test]
    fn test_by_category() {
        let tags = TagCatalog::builtin().by_category(TagCategory::Objetivo);
        let values: Vec<_> = tags.iter().map(|def| def.value).collect();
        assert_eq!(
            values,
            vec!["hipertrofia", "emagrecimento", "condicionamento", "reabilitacao"]
        );
    }

    #[test]
    fn test_search_matches_label_case_insensitively() {
        let found = TagCatalog::builtin().search("DIABETES");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "diabetes");

        let cardio = TagCatalog::builtin().search("cardio");
        assert_eq!(cardio.len(), 3);
    }

    #[test]
    fn test_categories_are_distinct() {
        assert_eq!(TagCatalog::builtin().categories().len(), 5);
    }
}
