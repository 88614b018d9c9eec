// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! pkgrecipe - Recipe option and requirement resolution
//!
//! This crate resolves a declarative package recipe against one target
//! platform: which build options exist, what value each one takes, and which
//! other packages are required. Building, packaging and version solving are
//! left to the caller.
//!
//! # Example
//!
//! ```yaml
//! # recipe.yaml
//! api: pkgrecipe/v0
//! name: cpp-peglib
//! version: 0.0.1
//! settings: [os, compiler, build_type, arch]
//! options:
//!   shared: [true, false]
//!   fPIC: [true, false]
//! default_options:
//!   shared: true
//!   fPIC: true
//! requirements:
//!   - pkg: llvm-core/13.0.0
//!     private: true
//!   - pkg: gtest/1.11.0
//!     private: true
//! platform_rules:
//!   - when: { os: Windows }
//!     then:
//!       - remove_option: fPIC
//! ```
//!
//! Resolving it for `os=Windows` yields `{shared: true}`; for any other
//! operating system it yields `{shared: true, fPIC: true}`.

pub mod builtin;
pub mod error;
pub mod option;
pub mod package_id;
pub mod platform;
pub mod profile;
pub mod requirement;
pub mod resolve;
pub mod rule;
pub mod spec;

pub use error::{Error, Result};
pub use option::{parse_option_assignments, OptionDomain, OptionOverrides, OptionValue};
pub use package_id::package_id;
pub use platform::Platform;
pub use profile::{compose_profiles, load_profile, ComposedProfile, Profile};
pub use requirement::{Requirement, RequirementSpec, Visibility};
pub use resolve::{resolve, resolve_options, resolve_requirements, Resolution, ResolvedConfiguration};
pub use rule::{Condition, Mutation, PlatformRule, SettingMatch};
pub use spec::{ApiVersion, PackageDescriptor};

/// Well-known filename for recipes.
pub const RECIPE_FILENAME: &str = "recipe.yaml";
