// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Declared package requirements and their visibility.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[cfg(test)]
#[path = "./requirement_test.rs"]
mod requirement_test;

/// Whether a requirement is re-exposed to downstream consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Consumed internally, not a transitive link requirement.
    Private,
    /// Re-exposed to anything that depends on this package.
    #[default]
    Public,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => f.write_str("private"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// A dependency on another package at a version constraint.
///
/// In recipe files a requirement is written as:
///
/// ```yaml
/// - pkg: llvm-core/13.0.0
///   private: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "RequirementRepr", into = "RequirementRepr")]
pub struct Requirement {
    pub name: String,
    /// Version or version range, passed through uninterpreted.
    pub version: String,
    pub visibility: Visibility,
}

#[derive(Deserialize, Serialize)]
struct RequirementRepr {
    pkg: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    private: bool,
}

impl TryFrom<RequirementRepr> for Requirement {
    type Error = Error;

    fn try_from(repr: RequirementRepr) -> Result<Self> {
        let visibility = if repr.private {
            Visibility::Private
        } else {
            Visibility::Public
        };
        Self::parse(&repr.pkg, visibility)
    }
}

impl From<Requirement> for RequirementRepr {
    fn from(req: Requirement) -> Self {
        Self {
            pkg: req.reference(),
            private: req.is_private(),
        }
    }
}

impl Requirement {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            visibility,
        }
    }

    /// Parse a `name/version` reference.
    pub fn parse(reference: &str, visibility: Visibility) -> Result<Self> {
        let (name, version) = reference.split_once('/').ok_or_else(|| {
            Error::InvalidRequirement(format!("'{reference}' is missing a /version"))
        })?;
        let name = name.trim();
        validate_name(name)?;
        let version = version.trim();
        if version.is_empty() {
            return Err(Error::InvalidRequirement(format!(
                "'{reference}' has an empty version"
            )));
        }
        Ok(Self::new(name, version, visibility))
    }

    /// Shorthand for a private requirement from a `name/version` reference.
    pub fn private(reference: &str) -> Result<Self> {
        Self::parse(reference, Visibility::Private)
    }

    /// Shorthand for a public requirement from a `name/version` reference.
    pub fn public(reference: &str) -> Result<Self> {
        Self::parse(reference, Visibility::Public)
    }

    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.name, self.version, self.visibility)
    }
}

/// Package names start with a letter, digit or underscore and otherwise
/// contain only letters, digits and `_ + . -`.
fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_first = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || "_+.-".contains(c));
    if valid_first && valid_rest {
        Ok(())
    } else {
        Err(Error::InvalidRequirement(format!(
            "'{name}' is not a valid package name"
        )))
    }
}

/// The effective requirements of a package for one platform, in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RequirementSpec {
    requirements: Vec<Requirement>,
}

impl RequirementSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
        self.requirements.iter()
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.requirements.iter().map(|r| r.name.as_str())
    }

    /// Requirements that downstream consumers inherit.
    pub fn public(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|r| !r.is_private())
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.requirements.retain(|r| r.name != name);
    }

    /// Replace the requirement with the same name in place, or append.
    pub(crate) fn upsert(&mut self, requirement: Requirement) {
        match self.requirements.iter_mut().find(|r| r.name == requirement.name) {
            Some(existing) => *existing = requirement,
            None => self.requirements.push(requirement),
        }
    }
}

impl From<Vec<Requirement>> for RequirementSpec {
    fn from(requirements: Vec<Requirement>) -> Self {
        Self { requirements }
    }
}

impl<'a> IntoIterator for &'a RequirementSpec {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.requirements.iter()
    }
}

impl IntoIterator for RequirementSpec {
    type Item = Requirement;
    type IntoIter = std::vec::IntoIter<Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.requirements.into_iter()
    }
}
