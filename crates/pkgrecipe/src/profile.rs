// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Build profiles: caller-supplied settings and option overrides.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::option::OptionOverrides;
use crate::platform::Platform;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./profile_test.rs"]
mod profile_test;

/// Separator between a package name and an option in scoped option keys.
pub const SCOPE_SEPARATOR: char = ':';

/// Profile file API version.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ProfileApiVersion {
    #[default]
    #[serde(rename = "pkgrecipe/v0/profile")]
    V0,
}

#[derive(Deserialize)]
struct ApiVersionMapping {
    #[serde(default)]
    api: ProfileApiVersion,
}

/// A single profile file.
///
/// ```yaml
/// api: pkgrecipe/v0/profile
/// include:
///   - base.yaml
/// settings:
///   os: Linux
///   build_type: Release
/// options:
///   shared: false
///   cpp-peglib:fPIC: false
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub api: ProfileApiVersion,

    /// Profiles loaded before this one. Relative paths are resolved
    /// relative to this file's directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    #[serde(default, skip_serializing_if = "Platform::is_empty")]
    pub settings: Platform,

    /// Option overrides, either `option` or `package:option`.
    #[serde(default, skip_serializing_if = "OptionOverrides::is_empty")]
    pub options: OptionOverrides,

    /// Path to the file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Profile {
    pub fn from_yaml<S: Into<String>>(yaml: S) -> Result<Self> {
        let yaml = yaml.into();

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

        match with_version.api {
            ProfileApiVersion::V0 => {
                serde_yaml::from_value(value).map_err(|e| Error::InvalidYaml {
                    error: e,
                    yaml_content: yaml,
                })
            }
        }
    }

    /// Load a single profile file without following its includes.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut profile = Self::from_yaml(yaml)?;
        profile.source_path = Some(path.to_path_buf());
        Ok(profile)
    }
}

/// Several profiles merged into the input of one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedProfile {
    pub settings: Platform,
    pub options: OptionOverrides,
    /// Source files that contributed to this composition, in order.
    pub source_files: Vec<PathBuf>,
}

impl ComposedProfile {
    pub fn platform(&self) -> &Platform {
        &self.settings
    }

    /// Option overrides that apply to `package`.
    ///
    /// Unscoped options apply to every package; `package:option` entries
    /// apply only to the named package and win over unscoped ones.
    pub fn overrides_for(&self, package: &str) -> OptionOverrides {
        let mut overrides = OptionOverrides::new();
        for (key, value) in &self.options {
            if !key.contains(SCOPE_SEPARATOR) {
                overrides.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &self.options {
            if let Some((scope, option)) = key.split_once(SCOPE_SEPARATOR) {
                if scope == package {
                    overrides.insert(option.to_string(), value.clone());
                }
            }
        }
        overrides
    }
}

/// Compose profiles in order; later profiles override earlier ones key by
/// key.
pub fn compose_profiles(profiles: &[Profile]) -> ComposedProfile {
    let mut composed = ComposedProfile::default();

    for profile in profiles {
        for (setting, value) in profile.settings.iter() {
            composed.settings.set(setting, value);
        }

        for (option, value) in &profile.options {
            composed.options.insert(option.clone(), value.clone());
        }

        if let Some(path) = &profile.source_path {
            composed.source_files.push(path.clone());
        }
    }

    composed
}

/// Load a profile and everything it includes, then compose them.
///
/// Includes are loaded depth first, before the including profile, so the
/// including profile has the last word.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<ComposedProfile> {
    let path = path.as_ref();
    let path = dunce::canonicalize(path).map_err(|e| Error::ReadFailed {
        path: path.to_path_buf(),
        error: e,
    })?;
    let mut stack = HashSet::new();
    let mut profiles = Vec::new();
    collect_profiles(&path, &mut stack, &mut profiles)?;
    Ok(compose_profiles(&profiles))
}

fn collect_profiles(
    path: &Path,
    stack: &mut HashSet<PathBuf>,
    profiles: &mut Vec<Profile>,
) -> Result<()> {
    if !stack.insert(path.to_path_buf()) {
        return Err(Error::CircularInclude(path.to_path_buf()));
    }

    let profile = Profile::load(path)?;
    tracing::debug!(path = %path.display(), "loaded profile");
    for include in &profile.include {
        let include_path = resolve_include_path(include, path.parent())?;
        collect_profiles(&include_path, stack, profiles)?;
    }
    profiles.push(profile);

    stack.remove(path);
    Ok(())
}

/// Resolve include path to absolute canonical path.
fn resolve_include_path(include: &str, base_dir: Option<&Path>) -> Result<PathBuf> {
    let path = if include.starts_with('~') {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::ValidationFailed("Cannot resolve ~ without HOME".to_string())
        })?;
        let rel = include.strip_prefix("~/").unwrap_or(include);
        home.join(rel)
    } else if Path::new(include).is_absolute() {
        PathBuf::from(include)
    } else {
        let base = base_dir.ok_or_else(|| {
            Error::ValidationFailed(format!(
                "Cannot resolve relative include '{include}' without base directory"
            ))
        })?;
        base.join(include)
    };

    dunce::canonicalize(&path).map_err(|e| Error::IncludeNotFound {
        path: path.clone(),
        error: e,
    })
}
