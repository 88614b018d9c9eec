// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Resolution of a descriptor against one target platform.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::option::{OptionOverrides, OptionValue};
use crate::platform::Platform;
use crate::requirement::RequirementSpec;
use crate::spec::PackageDescriptor;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./resolve_test.rs"]
mod resolve_test;

/// The concrete configuration of one package for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolvedConfiguration {
    /// The platform restricted to the settings the package declares.
    pub settings: Platform,
    /// Chosen value of every supported option.
    pub options: IndexMap<String, OptionValue>,
}

impl ResolvedConfiguration {
    pub fn get(&self, option: &str) -> Option<&OptionValue> {
        self.options.get(option)
    }

    pub fn contains(&self, option: &str) -> bool {
        self.options.contains_key(option)
    }

    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }
}

/// Everything the build engine needs for one package on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Resolution {
    /// `name/version` of the resolved package.
    pub package: String,
    pub configuration: ResolvedConfiguration,
    pub requirements: RequirementSpec,
    /// Identifier of the binary this configuration produces.
    pub package_id: String,
}

/// Resolve the option values of `descriptor` for `platform`.
///
/// Rules are evaluated in order against a private copy of the option
/// tables, then `overrides` are applied on top of the defaults. The
/// descriptor itself is never modified.
pub fn resolve_options(
    descriptor: &PackageDescriptor,
    platform: &Platform,
    overrides: &OptionOverrides,
) -> Result<ResolvedConfiguration> {
    let package = descriptor.name.as_str();
    tracing::debug!(package, ?platform, "resolving options");
    check_settings(descriptor, platform)?;

    let mut domains = descriptor.options.clone();
    let mut defaults = descriptor.default_options.clone();

    for (index, rule) in descriptor.platform_rules.iter().enumerate() {
        if rule.applies_to(platform) {
            tracing::debug!(package, rule = index, "applying platform rule to options");
            rule.apply_to_options(package, &mut domains, &mut defaults)?;
        }
    }

    if let Some(option) = defaults.keys().find(|o| !domains.contains_key(*o)) {
        return Err(Error::ValidationFailed(format!(
            "{package}: default given for undeclared option '{option}'"
        )));
    }

    let mut options = defaults;
    for (option, value) in overrides {
        let (Some(current), Some(domain)) = (options.get_mut(option), domains.get(option)) else {
            return Err(Error::UnsupportedOption {
                package: package.to_string(),
                option: option.clone(),
            });
        };
        if !domain.contains(value) {
            return Err(Error::invalid_value(package, option, value, domain));
        }
        *current = value.clone();
    }

    let configuration = ResolvedConfiguration {
        settings: platform.restricted_to(&descriptor.settings),
        options,
    };
    tracing::debug!(package, options = ?configuration.options, "resolved options");
    Ok(configuration)
}

/// Resolve the effective requirements of `descriptor` for `platform`.
///
/// The result keeps declaration order; requirements added by rules follow
/// the declared ones.
pub fn resolve_requirements(
    descriptor: &PackageDescriptor,
    platform: &Platform,
) -> Result<RequirementSpec> {
    let package = descriptor.name.as_str();
    check_settings(descriptor, platform)?;

    let mut requirements = RequirementSpec::from(descriptor.requirements.clone());
    for (index, rule) in descriptor.platform_rules.iter().enumerate() {
        if rule.applies_to(platform) {
            tracing::debug!(package, rule = index, "applying platform rule to requirements");
            rule.apply_to_requirements(package, &mut requirements);
        }
    }

    tracing::debug!(package, count = requirements.len(), "resolved requirements");
    Ok(requirements)
}

/// Resolve options and requirements together and compute the package id.
pub fn resolve(
    descriptor: &PackageDescriptor,
    platform: &Platform,
    overrides: &OptionOverrides,
) -> Result<Resolution> {
    let configuration = resolve_options(descriptor, platform, overrides)?;
    let requirements = resolve_requirements(descriptor, platform)?;
    let package_id = crate::package_id::package_id(descriptor, &configuration, &requirements);
    Ok(Resolution {
        package: descriptor.reference(),
        configuration,
        requirements,
        package_id,
    })
}

/// Every declared setting must be assigned; settings are never defaulted.
fn check_settings(descriptor: &PackageDescriptor, platform: &Platform) -> Result<()> {
    match descriptor.settings.iter().find(|s| !platform.contains(s)) {
        Some(missing) => Err(Error::MissingSetting {
            package: descriptor.name.clone(),
            setting: missing.clone(),
        }),
        None => Ok(()),
    }
}
