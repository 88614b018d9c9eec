// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Concrete target platform assignments.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

#[cfg(test)]
#[path = "./platform_test.rs"]
mod platform_test;

/// Conventional name of the operating-system setting dimension.
pub const OS_SETTING: &str = "os";

/// A concrete value for each setting dimension of one build target.
///
/// Values are supplied entirely by the caller; nothing here knows which
/// operating systems or compilers exist.
///
/// Values written as YAML numbers or booleans (`compiler.version: 12`) are
/// read as their text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Platform {
    settings: BTreeMap<String, String>,
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let settings = BTreeMap::<String, ScalarText>::deserialize(deserializer)?;
        Ok(settings.into_iter().map(|(k, v)| (k, String::from(v))).collect())
    }
}

/// Any YAML scalar, kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ScalarText {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl From<ScalarText> for String {
    fn from(scalar: ScalarText) -> Self {
        match scalar {
            ScalarText::String(s) => s,
            ScalarText::Bool(b) => b.to_string(),
            ScalarText::Int(i) => i.to_string(),
            ScalarText::Uint(u) => u.to_string(),
            // Debug keeps the fraction of whole floats: 1.0 stays "1.0"
            ScalarText::Float(f) => format!("{f:?}"),
        }
    }
}

/// `deserialize_with` helper for string fields that may be written as any
/// scalar, such as `version: 1.0`.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    ScalarText::deserialize(deserializer).map(String::from)
}

/// Like [`scalar_string`], for a sequence of scalars.
pub(crate) fn scalar_strings<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<ScalarText>::deserialize(deserializer)?;
    Ok(values.into_iter().map(String::from).collect())
}

impl Platform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Platform::set`].
    pub fn with(mut self, setting: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(setting, value);
        self
    }

    pub fn set(&mut self, setting: impl Into<String>, value: impl Into<String>) {
        self.settings.insert(setting.into(), value.into());
    }

    pub fn get(&self, setting: &str) -> Option<&str> {
        self.settings.get(setting).map(String::as_str)
    }

    pub fn contains(&self, setting: &str) -> bool {
        self.settings.contains_key(setting)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Parse `setting=value` assignments, later entries winning.
    pub fn parse_assignments<I, S>(assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut platform = Self::new();
        for assignment in assignments {
            let (setting, value) = split_assignment(assignment.as_ref())?;
            platform.set(setting, value);
        }
        Ok(platform)
    }

    /// Copy of this platform restricted to the given dimensions.
    pub(crate) fn restricted_to<'a>(&self, settings: impl IntoIterator<Item = &'a String>) -> Self {
        settings
            .into_iter()
            .filter_map(|s| self.settings.get_key_value(s))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Platform
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            settings: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Split a `key=value` pair, trimming whitespace around both halves.
pub(crate) fn split_assignment(assignment: &str) -> Result<(&str, &str)> {
    let (key, value) = assignment.split_once('=').ok_or_else(|| {
        Error::ValidationFailed(format!(
            "Expected an assignment of the form key=value, got '{assignment}'"
        ))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::ValidationFailed(format!(
            "Assignment '{assignment}' has an empty key"
        )));
    }
    Ok((key, value.trim()))
}
