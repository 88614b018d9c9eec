// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Platform-conditional adjustments to a recipe's options and requirements.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::option::{OptionDomain, OptionValue};
use crate::platform::{OS_SETTING, Platform, scalar_string, scalar_strings};
use crate::requirement::{Requirement, RequirementSpec};
use crate::{Error, Result};

#[cfg(test)]
#[path = "./rule_test.rs"]
mod rule_test;

/// Accepted value(s) for one setting in a [`Condition`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SettingMatch {
    #[serde(deserialize_with = "scalar_string")]
    Equals(String),
    #[serde(deserialize_with = "scalar_strings")]
    OneOf(Vec<String>),
}

impl SettingMatch {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Equals(expected) => expected == value,
            Self::OneOf(expected) => expected.iter().any(|e| e == value),
        }
    }
}

/// A conjunction of setting clauses, written as a mapping:
///
/// ```yaml
/// when:
///   os: Windows
///   arch: [x86, x86_64]
/// ```
///
/// An empty condition always holds. A clause over a setting the platform
/// does not assign never holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Condition {
    clauses: BTreeMap<String, SettingMatch>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Condition holding when `setting` equals `value`.
    pub fn setting_equals(setting: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new().and(setting, SettingMatch::Equals(value.into()))
    }

    /// Condition holding when the operating system equals `os`.
    pub fn os_equals(os: impl Into<String>) -> Self {
        Self::setting_equals(OS_SETTING, os)
    }

    pub fn and(mut self, setting: impl Into<String>, matcher: SettingMatch) -> Self {
        self.clauses.insert(setting.into(), matcher);
        self
    }

    pub fn matches(&self, platform: &Platform) -> bool {
        self.clauses.iter().all(|(setting, matcher)| {
            platform
                .get(setting)
                .is_some_and(|value| matcher.matches(value))
        })
    }

    /// Settings this condition inspects.
    pub fn settings(&self) -> impl Iterator<Item = &str> {
        self.clauses.keys().map(String::as_str)
    }
}

/// One change applied to a working copy of the recipe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "MutationRepr", into = "MutationRepr")]
pub enum Mutation {
    /// Delete the option from both the domain and the defaults.
    RemoveOption(String),
    /// Replace the default of an option that is still present.
    SetDefault { option: String, value: OptionValue },
    /// Drop the named requirement.
    RemoveRequirement(String),
    /// Append a requirement, replacing one with the same name in place.
    AddRequirement(Requirement),
}

#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct SetDefaultRepr {
    option: String,
    value: OptionValue,
}

/// Single-key mapping form used in recipe files, e.g. `- remove_option: fPIC`.
#[derive(Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct MutationRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remove_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    set_default: Option<SetDefaultRepr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remove_requirement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    add_requirement: Option<Requirement>,
}

impl TryFrom<MutationRepr> for Mutation {
    type Error = Error;

    fn try_from(repr: MutationRepr) -> Result<Self> {
        let mut found = Vec::with_capacity(1);
        if let Some(option) = repr.remove_option {
            found.push(Self::RemoveOption(option));
        }
        if let Some(SetDefaultRepr { option, value }) = repr.set_default {
            found.push(Self::SetDefault { option, value });
        }
        if let Some(name) = repr.remove_requirement {
            found.push(Self::RemoveRequirement(name));
        }
        if let Some(requirement) = repr.add_requirement {
            found.push(Self::AddRequirement(requirement));
        }
        match (found.pop(), found.is_empty()) {
            (Some(mutation), true) => Ok(mutation),
            _ => Err(Error::ValidationFailed(
                "each rule mutation must name exactly one of remove_option, set_default, \
                 remove_requirement or add_requirement"
                    .to_string(),
            )),
        }
    }
}

impl From<Mutation> for MutationRepr {
    fn from(mutation: Mutation) -> Self {
        match mutation {
            Mutation::RemoveOption(option) => Self {
                remove_option: Some(option),
                ..Default::default()
            },
            Mutation::SetDefault { option, value } => Self {
                set_default: Some(SetDefaultRepr { option, value }),
                ..Default::default()
            },
            Mutation::RemoveRequirement(name) => Self {
                remove_requirement: Some(name),
                ..Default::default()
            },
            Mutation::AddRequirement(requirement) => Self {
                add_requirement: Some(requirement),
                ..Default::default()
            },
        }
    }
}

/// A predicate over the target platform paired with the mutations to apply
/// when it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlatformRule {
    #[serde(default)]
    pub when: Condition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub then: Vec<Mutation>,
}

impl PlatformRule {
    pub fn when(condition: Condition) -> Self {
        Self {
            when: condition,
            then: Vec::new(),
        }
    }

    pub fn remove_option(self, option: impl Into<String>) -> Self {
        self.then(Mutation::RemoveOption(option.into()))
    }

    pub fn set_default(self, option: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.then(Mutation::SetDefault {
            option: option.into(),
            value: value.into(),
        })
    }

    pub fn remove_requirement(self, name: impl Into<String>) -> Self {
        self.then(Mutation::RemoveRequirement(name.into()))
    }

    pub fn add_requirement(self, requirement: Requirement) -> Self {
        self.then(Mutation::AddRequirement(requirement))
    }

    pub fn then(mut self, mutation: Mutation) -> Self {
        self.then.push(mutation);
        self
    }

    pub fn applies_to(&self, platform: &Platform) -> bool {
        self.when.matches(platform)
    }

    /// Apply the option mutations of this rule to a working copy.
    pub(crate) fn apply_to_options(
        &self,
        package: &str,
        domains: &mut IndexMap<String, OptionDomain>,
        defaults: &mut IndexMap<String, OptionValue>,
    ) -> Result<()> {
        for mutation in &self.then {
            match mutation {
                Mutation::RemoveOption(option) => {
                    tracing::trace!(package, %option, "removing option");
                    domains.shift_remove(option);
                    defaults.shift_remove(option);
                }
                Mutation::SetDefault { option, value } => {
                    let domain = match domains.get(option) {
                        Some(domain) if defaults.contains_key(option) => domain,
                        _ => {
                            tracing::trace!(package, %option, "skipping default of absent option");
                            continue;
                        }
                    };
                    if !domain.contains(value) {
                        return Err(Error::invalid_value(package, option, value, domain));
                    }
                    tracing::trace!(package, %option, %value, "setting option default");
                    defaults.insert(option.clone(), value.clone());
                }
                Mutation::RemoveRequirement(_) | Mutation::AddRequirement(_) => {}
            }
        }
        Ok(())
    }

    /// Apply the requirement mutations of this rule to a working copy.
    pub(crate) fn apply_to_requirements(&self, package: &str, requirements: &mut RequirementSpec) {
        for mutation in &self.then {
            match mutation {
                Mutation::RemoveRequirement(name) => {
                    tracing::trace!(package, requirement = %name, "removing requirement");
                    requirements.remove(name);
                }
                Mutation::AddRequirement(requirement) => {
                    tracing::trace!(package, requirement = %requirement, "adding requirement");
                    requirements.upsert(requirement.clone());
                }
                Mutation::RemoveOption(_) | Mutation::SetDefault { .. } => {}
            }
        }
    }
}
