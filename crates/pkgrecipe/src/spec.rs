// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Recipe file parsing and the package descriptor type.

use std::collections::HashSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::option::{OptionDomain, OptionValue};
use crate::platform::scalar_string;
use crate::requirement::Requirement;
use crate::rule::{Mutation, PlatformRule};
use crate::{Error, Result};

#[cfg(test)]
#[path = "./spec_test.rs"]
mod spec_test;

/// API version for recipe files.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "pkgrecipe/v0")]
    V0,
}

/// Helper for two-stage deserialization to determine API version first.
#[derive(Deserialize)]
struct ApiVersionMapping {
    #[serde(default)]
    api: ApiVersion,
}

/// Declarative description of how one package is configured.
///
/// A descriptor is read-only input to resolution; every resolution works on
/// its own copy of the option tables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// API version identifier.
    #[serde(default)]
    pub api: ApiVersion,

    pub name: String,

    #[serde(deserialize_with = "scalar_string")]
    pub version: String,

    /// Setting dimensions every target platform must assign, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<String>,

    /// Legal values for each option.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, OptionDomain>,

    /// Default value for each option.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub default_options: IndexMap<String, OptionValue>,

    /// Build-file generators requested from the build engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generators: Vec<String>,

    /// Declared requirements, in precedence order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,

    /// Conditional adjustments, evaluated in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platform_rules: Vec<PlatformRule>,

    /// Path to the file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Parse a descriptor from YAML. The result is not validated.
    pub fn from_yaml<S: Into<String>>(yaml: S) -> Result<Self> {
        let yaml = yaml.into();

        // Stage 1: Parse to get API version
        let value: serde_yaml::Value =
            serde_yaml::from_str(&yaml).map_err(|e| Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        let with_version: ApiVersionMapping =
            serde_yaml::from_value(value.clone()).map_err(|e| Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        // Stage 2: Deserialize based on version
        match with_version.api {
            ApiVersion::V0 => serde_yaml::from_value(value).map_err(|e| Error::InvalidYaml {
                error: e,
                yaml_content: yaml,
            }),
        }
    }

    /// Load and validate a descriptor from a file path.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut spec = Self::from_yaml(yaml)?;
        spec.source_path = Some(path.to_path_buf());
        spec.validate()?;
        tracing::debug!(
            package = %spec.reference(),
            path = %path.display(),
            "loaded recipe"
        );
        Ok(spec)
    }

    /// Serialize back to the recipe YAML format.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ValidationFailed(e.to_string()))
    }

    /// `name/version` reference of this package.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    pub fn with_setting(mut self, setting: impl Into<String>) -> Self {
        let setting = setting.into();
        if !self.settings.contains(&setting) {
            self.settings.push(setting);
        }
        self
    }

    /// Declare an option with its domain and default.
    pub fn with_option(
        mut self,
        option: impl Into<String>,
        domain: OptionDomain,
        default: impl Into<OptionValue>,
    ) -> Self {
        let option = option.into();
        self.options.insert(option.clone(), domain);
        self.default_options.insert(option, default.into());
        self
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generators.push(generator.into());
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn with_rule(mut self, rule: PlatformRule) -> Self {
        self.platform_rules.push(rule);
        self
    }

    pub fn declares_setting(&self, setting: &str) -> bool {
        self.settings.iter().any(|s| s == setting)
    }

    /// Whether an option is declared at all, before any rule applies.
    pub fn declares_option(&self, option: &str) -> bool {
        self.options.contains_key(option) || self.default_options.contains_key(option)
    }

    /// Check the invariants of a well-formed descriptor.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ValidationFailed(
                "package name must not be empty".to_string(),
            ));
        }
        if self.version.trim().is_empty() {
            return Err(Error::ValidationFailed(format!(
                "{}: package version must not be empty",
                self.name
            )));
        }

        let mut seen_settings = HashSet::new();
        for setting in &self.settings {
            if !seen_settings.insert(setting.as_str()) {
                return Err(Error::ValidationFailed(format!(
                    "{}: setting '{setting}' is declared more than once",
                    self.name
                )));
            }
        }

        for (option, domain) in &self.options {
            if domain.is_empty() {
                return Err(Error::ValidationFailed(format!(
                    "{}: option '{option}' has no legal values",
                    self.name
                )));
            }
            if !self.default_options.contains_key(option) {
                tracing::warn!(
                    package = %self.name,
                    %option,
                    "option has no default and will never be resolved"
                );
            }
        }

        for (option, value) in &self.default_options {
            let domain = self.options.get(option).ok_or_else(|| {
                Error::ValidationFailed(format!(
                    "{}: default given for undeclared option '{option}'",
                    self.name
                ))
            })?;
            if !domain.contains(value) {
                return Err(Error::invalid_value(&self.name, option, value, domain));
            }
        }

        let mut seen_requirements = HashSet::new();
        for requirement in &self.requirements {
            if !seen_requirements.insert(requirement.name.as_str()) {
                return Err(Error::ValidationFailed(format!(
                    "{}: duplicate requirement '{}'",
                    self.name, requirement.name
                )));
            }
        }

        for (index, rule) in self.platform_rules.iter().enumerate() {
            self.validate_rule(index, rule)?;
        }

        Ok(())
    }

    fn validate_rule(&self, index: usize, rule: &PlatformRule) -> Result<()> {
        if let Some(setting) = rule.when.settings().find(|s| !self.declares_setting(s)) {
            return Err(Error::ValidationFailed(format!(
                "{}: platform rule #{index} tests undeclared setting '{setting}'",
                self.name
            )));
        }

        for mutation in &rule.then {
            match mutation {
                Mutation::RemoveOption(option) if !self.declares_option(option) => {
                    return Err(Error::ValidationFailed(format!(
                        "{}: platform rule #{index} removes undeclared option '{option}'",
                        self.name
                    )));
                }
                Mutation::SetDefault { option, value } => {
                    let domain = self.options.get(option).ok_or_else(|| {
                        Error::ValidationFailed(format!(
                            "{}: platform rule #{index} sets default of undeclared option '{option}'",
                            self.name
                        ))
                    })?;
                    if !domain.contains(value) {
                        return Err(Error::invalid_value(&self.name, option, value, domain));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
