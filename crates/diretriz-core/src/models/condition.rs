// ABOUTME: Rule condition model: scalar values, typed predicates, and boolean expression trees
// ABOUTME: Keeps the persisted {tag, op, val} wire shape while exposing closed enums internally
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::range::format_number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single fact or condition value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean (answers "sim"/"não" normalize to this)
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Free text
    Text(String),
}

impl Scalar {
    /// Normalize yes/no strings to booleans and trim text
    ///
    /// Accepted spellings are case-insensitive: `sim`, `s`, `true`, `yes`
    /// and `não`, `nao`, `n`, `false`, `no`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        match self {
            Self::Text(text) => {
                let trimmed = text.trim();
                match trimmed.to_lowercase().as_str() {
                    "sim" | "s" | "true" | "yes" => Self::Bool(true),
                    "não" | "nao" | "n" | "false" | "no" => Self::Bool(false),
                    _ => Self::Text(trimmed.to_owned()),
                }
            }
            other => other.clone(),
        }
    }

    /// Coerce to a number: numbers as-is, numeric text parsed (decimal comma accepted)
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Type-aware equality after normalization
    ///
    /// A boolean never equals a number and a number never equals text; the
    /// only coercion performed is the yes/no normalization.
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self.normalized(), other.normalized()) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => (a - b).abs() < f64::EPSILON,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{}", format_number(*value)),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Comparison operator as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Equal to
    Eq,
    /// Member of list
    In,
    /// Greater than
    Gt,
    /// Less than
    Lt,
    /// Greater than or equal
    Gte,
    /// Less than or equal
    Lte,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Eq => "eq",
            Self::In => "in",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
        };
        f.write_str(name)
    }
}

/// Typed predicate: one variant per operator, carrying exactly the value shape it needs
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Fact equals the scalar
    Eq(Scalar),
    /// Fact is one of the scalars
    In(Vec<Scalar>),
    /// Fact is greater than the number
    Gt(f64),
    /// Fact is less than the number
    Lt(f64),
    /// Fact is greater than or equal to the number
    Gte(f64),
    /// Fact is less than or equal to the number
    Lte(f64),
}

impl Predicate {
    /// Operator of this predicate
    #[must_use]
    pub const fn operator(&self) -> Operator {
        match self {
            Self::Eq(_) => Operator::Eq,
            Self::In(_) => Operator::In,
            Self::Gt(_) => Operator::Gt,
            Self::Lt(_) => Operator::Lt,
            Self::Gte(_) => Operator::Gte,
            Self::Lte(_) => Operator::Lte,
        }
    }
}

/// Wire value: a scalar or a list of scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// List form (used by `in`)
    List(Vec<Scalar>),
    /// Scalar form
    Scalar(Scalar),
}

/// Persisted condition shape `{tag, op, val}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCondition {
    /// Canonical tag
    pub tag: String,
    /// Operator name
    pub op: Operator,
    /// Comparison value
    pub val: ConditionValue,
}

/// Atomic condition: a canonical tag tested by a typed predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCondition", into = "RawCondition")]
pub struct Condition {
    /// Canonical tag the predicate applies to
    pub tag: String,
    /// Typed predicate
    pub predicate: Predicate,
}

impl Condition {
    /// Create a condition from a tag and predicate
    pub fn new(tag: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            tag: tag.into(),
            predicate,
        }
    }
}

impl TryFrom<RawCondition> for Condition {
    type Error = String;

    fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
        let numeric = |value: &ConditionValue| match value {
            ConditionValue::Scalar(scalar) => scalar.as_number().ok_or_else(|| {
                format!("operator '{}' on '{}' requires a numeric value", raw.op, raw.tag)
            }),
            ConditionValue::List(_) => Err(format!(
                "operator '{}' on '{}' does not accept a list",
                raw.op, raw.tag
            )),
        };

        let predicate = match raw.op {
            Operator::Eq => match &raw.val {
                ConditionValue::Scalar(scalar) => Predicate::Eq(scalar.clone()),
                ConditionValue::List(_) => {
                    return Err(format!("operator 'eq' on '{}' does not accept a list", raw.tag))
                }
            },
            // A scalar under `in` is a one-element list
            Operator::In => match &raw.val {
                ConditionValue::List(values) => Predicate::In(values.clone()),
                ConditionValue::Scalar(scalar) => Predicate::In(vec![scalar.clone()]),
            },
            Operator::Gt => Predicate::Gt(numeric(&raw.val)?),
            Operator::Lt => Predicate::Lt(numeric(&raw.val)?),
            Operator::Gte => Predicate::Gte(numeric(&raw.val)?),
            Operator::Lte => Predicate::Lte(numeric(&raw.val)?),
        };

        Ok(Self {
            tag: raw.tag,
            predicate,
        })
    }
}

impl From<Condition> for RawCondition {
    fn from(condition: Condition) -> Self {
        let op = condition.predicate.operator();
        let val = match condition.predicate {
            Predicate::Eq(scalar) => ConditionValue::Scalar(scalar),
            Predicate::In(values) => ConditionValue::List(values),
            Predicate::Gt(n) | Predicate::Lt(n) | Predicate::Gte(n) | Predicate::Lte(n) => {
                ConditionValue::Scalar(Scalar::Number(n))
            }
        };
        Self {
            tag: condition.tag,
            op,
            val,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.predicate.operator();
        match &self.predicate {
            Predicate::Eq(value) => write!(f, "{} {op} {value}", self.tag),
            Predicate::In(values) => {
                let joined = values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{} {op} [{joined}]", self.tag)
            }
            Predicate::Gt(n) | Predicate::Lt(n) | Predicate::Gte(n) | Predicate::Lte(n) => {
                write!(f, "{} {op} {}", self.tag, format_number(*n))
            }
        }
    }
}

/// Boolean condition tree
///
/// Persisted rules use `{"all": [...]}` of atoms; `any` and `not` nodes compose
/// the same atoms when a rule needs disjunction or negation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionExpr {
    /// Every child must hold
    All {
        /// Children
        all: Vec<ConditionExpr>,
    },
    /// At least one child must hold
    Any {
        /// Children
        any: Vec<ConditionExpr>,
    },
    /// Child must not hold
    Not {
        /// Negated child
        not: Box<ConditionExpr>,
    },
    /// Leaf condition
    Atom(Condition),
}

impl ConditionExpr {
    /// Conjunction of atomic conditions (the persisted default shape)
    #[must_use]
    pub fn all_of(conditions: Vec<Condition>) -> Self {
        Self::All {
            all: conditions.into_iter().map(Self::Atom).collect(),
        }
    }

    /// Every atomic condition in the tree, depth-first
    #[must_use]
    pub fn atoms(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Self::All { all: children } | Self::Any { any: children } => {
                for child in children {
                    child.collect_atoms(out);
                }
            }
            Self::Not { not } => not.collect_atoms(out),
            Self::Atom(condition) => out.push(condition),
        }
    }

    /// Distinct tags referenced by the tree, in first-seen order
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for atom in self.atoms() {
            if !tags.iter().any(|t| t == &atom.tag) {
                tags.push(atom.tag.clone());
            }
        }
        tags
    }

    /// Whether the tree contains no atomic condition at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms().is_empty()
    }
}

impl Default for ConditionExpr {
    fn default() -> Self {
        Self::All { all: Vec::new() }
    }
}

impl fmt::Display for ConditionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |children: &[Self], sep: &str| {
            children
                .iter()
                .map(|child| match child {
                    Self::Atom(_) | Self::Not { .. } => child.to_string(),
                    _ => format!("({child})"),
                })
                .collect::<Vec<_>>()
                .join(sep)
        };
        match self {
            Self::All { all } if all.is_empty() => f.write_str("(sempre)"),
            Self::All { all } => f.write_str(&join(all, " AND ")),
            Self::Any { any } if any.is_empty() => f.write_str("(nunca)"),
            Self::Any { any } => f.write_str(&join(any, " OR ")),
            Self::Not { not } => write!(f, "NOT ({not})"),
            Self::Atom(condition) => write!(f, "{condition}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_persisted_all_shape() {
        let json = r#"{"all":[{"tag":"hipertensao","op":"eq","val":"sim"},{"tag":"idade","op":"gte","val":60}]}"#;
        let expr: ConditionExpr = serde_json::from_str(json).unwrap();

        let atoms = expr.atoms();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].predicate, Predicate::Eq(Scalar::Text("sim".into())));
        assert_eq!(atoms[1].predicate, Predicate::Gte(60.0));
        assert_eq!(expr.to_string(), "hipertensao eq sim AND idade gte 60");
    }

    #[test]
    fn test_rejects_list_for_numeric_operator() {
        let json = r#"{"tag":"idade","op":"gt","val":["a"]}"#;
        assert!(serde_json::from_str::<Condition>(json).is_err());
    }

    #[test]
    fn test_in_accepts_scalar_as_singleton() {
        let json = r#"{"tag":"objetivo","op":"in","val":"hipertrofia"}"#;
        let condition: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(
            condition.predicate,
            Predicate::In(vec![Scalar::Text("hipertrofia".into())])
        );
    }

    #[test]
    fn test_nested_any_and_not() {
        let json = r#"{"any":[{"tag":"dac","op":"eq","val":true},{"not":{"tag":"diabetes","op":"eq","val":"não"}}]}"#;
        let expr: ConditionExpr = serde_json::from_str(json).unwrap();
        assert_eq!(expr.tags(), vec!["dac".to_owned(), "diabetes".to_owned()]);
        assert_eq!(expr.to_string(), "dac eq true OR NOT (diabetes eq não)");
    }

    #[test]
    fn test_normalization_and_strict_eq() {
        assert!(Scalar::from("Sim").strict_eq(&Scalar::Bool(true)));
        assert!(Scalar::from("nao").strict_eq(&Scalar::from("não")));
        assert!(!Scalar::from("1").strict_eq(&Scalar::Number(1.0)));
        assert_eq!(Scalar::from("72,5").as_number(), Some(72.5));
    }

    #[test]
    fn test_round_trips_wire_shape() {
        let condition = Condition::new("idade", Predicate::Lt(30.0));
        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(json, serde_json::json!({"tag": "idade", "op": "lt", "val": 30.0}));
    }
}
