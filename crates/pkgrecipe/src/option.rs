// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Option values and their legal domains.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::platform::split_assignment;

#[cfg(test)]
#[path = "./option_test.rs"]
mod option_test;

/// Keyword used in recipes for a domain that accepts any value.
pub const ANY_KEYWORD: &str = "ANY";

/// Caller-supplied option values, keyed by option name.
pub type OptionOverrides = IndexMap<String, OptionValue>;

/// Parse `option=value` assignments, later entries winning.
pub fn parse_option_assignments<I, S>(assignments: I) -> crate::Result<OptionOverrides>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut overrides = OptionOverrides::new();
    for assignment in assignments {
        let (option, value) = split_assignment(assignment.as_ref())?;
        overrides.insert(option.to_string(), OptionValue::parse(value));
    }
    Ok(overrides)
}

/// A single concrete value for a build option.
///
/// Strings that spell a boolean or an integer are normalized on the way in,
/// so `"False"` read from a text source compares equal to a YAML `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    String(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawValue::deserialize(deserializer).map(Self::from)
    }
}

impl From<RawValue> for OptionValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Bool(b) => Self::Bool(b),
            RawValue::Int(i) => Self::Int(i),
            RawValue::String(s) => Self::parse(&s),
        }
    }
}

impl OptionValue {
    /// Interpret a textual value, normalizing booleans and integers.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Self::Bool(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Self::Bool(false)
        } else if let Ok(i) = trimmed.parse::<i64>() {
            Self::Int(i)
        } else {
            Self::String(trimmed.to_string())
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// The set of legal values for one option.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "DomainRepr", into = "DomainRepr")]
pub enum OptionDomain {
    /// Any value is accepted.
    Any,
    /// Only the listed values are accepted, in declaration order.
    Values(Vec<OptionValue>),
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum DomainRepr {
    Keyword(String),
    Values(Vec<OptionValue>),
}

impl TryFrom<DomainRepr> for OptionDomain {
    type Error = String;

    fn try_from(repr: DomainRepr) -> Result<Self, Self::Error> {
        match repr {
            DomainRepr::Keyword(k) if k == ANY_KEYWORD => Ok(Self::Any),
            DomainRepr::Keyword(k) => Err(format!(
                "expected a list of values or '{ANY_KEYWORD}', got '{k}'"
            )),
            DomainRepr::Values(values) => Ok(Self::Values(values)),
        }
    }
}

impl From<OptionDomain> for DomainRepr {
    fn from(domain: OptionDomain) -> Self {
        match domain {
            OptionDomain::Any => Self::Keyword(ANY_KEYWORD.to_string()),
            OptionDomain::Values(values) => Self::Values(values),
        }
    }
}

impl OptionDomain {
    /// The `[true, false]` domain used by most switches.
    pub fn boolean() -> Self {
        Self::Values(vec![OptionValue::Bool(true), OptionValue::Bool(false)])
    }

    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        Self::Values(values.into_iter().map(Into::into).collect())
    }

    /// Whether the value is legal for this domain.
    pub fn contains(&self, value: &OptionValue) -> bool {
        match self {
            Self::Any => true,
            Self::Values(values) => values.contains(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Values(values) if values.is_empty())
    }
}

impl fmt::Display for OptionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ANY_KEYWORD),
            Self::Values(values) => {
                let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}
