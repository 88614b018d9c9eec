// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for recipe loading and resolution.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with pkgrecipe Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or resolving a recipe.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// The target platform does not assign a declared setting
    #[error("{package}: platform does not define required setting '{setting}'")]
    #[diagnostic(
        code(pkgrecipe::missing_setting),
        help("Every setting declared by the recipe must be supplied, e.g. {setting}=<value>")
    )]
    MissingSetting { package: String, setting: String },

    /// An override targets an option that is not part of the resolved set
    #[error("{package}: option '{option}' is not supported for this platform")]
    #[diagnostic(
        code(pkgrecipe::unsupported_option),
        help("The option is either undeclared or removed by a platform rule")
    )]
    UnsupportedOption { package: String, option: String },

    /// An override or default lies outside the option's legal values
    #[error("{package}: invalid value '{value}' for option '{option}'")]
    #[diagnostic(
        code(pkgrecipe::invalid_option_value),
        help("Allowed values: {allowed}")
    )]
    InvalidOptionValue {
        package: String,
        option: String,
        value: String,
        allowed: String,
    },

    /// Malformed package reference or requirement entry
    #[error("Invalid requirement: {0}")]
    #[diagnostic(
        code(pkgrecipe::invalid_requirement),
        help("Requirements are written as name/version, e.g. gtest/1.11.0")
    )]
    InvalidRequirement(String),

    /// Descriptor or profile failed validation
    #[error("Validation failed: {0}")]
    #[diagnostic(code(pkgrecipe::validation_failed))]
    ValidationFailed(String),

    /// Invalid YAML in recipe or profile file
    #[error("Invalid YAML document: {error}")]
    #[diagnostic(
        code(pkgrecipe::invalid_yaml),
        help("Check YAML syntax and ensure the 'api' field names a known version")
    )]
    InvalidYaml {
        #[source]
        error: serde_yaml::Error,
        yaml_content: String,
    },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(pkgrecipe::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Profile include file not found
    #[error("Profile include not found: {path:?}")]
    #[diagnostic(
        code(pkgrecipe::include_not_found),
        help("Check that the include path is correct and the file exists")
    )]
    IncludeNotFound {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Circular profile include detected
    #[error("Circular profile include detected: {0:?}")]
    #[diagnostic(
        code(pkgrecipe::circular_include),
        help("Remove the circular reference in your profile includes")
    )]
    CircularInclude(PathBuf),

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(pkgrecipe::io_error))]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_value(
        package: &str,
        option: &str,
        value: impl std::fmt::Display,
        allowed: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidOptionValue {
            package: package.to_string(),
            option: option.to_string(),
            value: value.to_string(),
            allowed: allowed.to_string(),
        }
    }
}
