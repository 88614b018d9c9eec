// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Recipes shipped with the library.
//!
//! Each descriptor is built once on first use and is read-only afterwards,
//! so any number of threads may resolve against it at the same time.

use once_cell::sync::Lazy;

use crate::option::OptionDomain;
use crate::requirement::{Requirement, Visibility};
use crate::rule::{Condition, PlatformRule};
use crate::spec::PackageDescriptor;

#[cfg(test)]
#[path = "./builtin_test.rs"]
mod builtin_test;

static CPP_PEGLIB: Lazy<PackageDescriptor> = Lazy::new(|| {
    PackageDescriptor::new("cpp-peglib", "0.0.1")
        .with_setting("os")
        .with_setting("compiler")
        .with_setting("build_type")
        .with_setting("arch")
        .with_option("shared", OptionDomain::boolean(), true)
        .with_option("fPIC", OptionDomain::boolean(), true)
        .with_generator("cmake_find_package_multi")
        .with_requirement(Requirement::new("llvm-core", "13.0.0", Visibility::Private))
        .with_requirement(Requirement::new("gtest", "1.11.0", Visibility::Private))
        // fPIC does not exist on Windows
        .with_rule(PlatformRule::when(Condition::os_equals("Windows")).remove_option("fPIC"))
});

/// The `cpp-peglib` parser library recipe.
pub fn cpp_peglib() -> &'static PackageDescriptor {
    &CPP_PEGLIB
}

/// Look up a shipped recipe by package name.
pub fn find(name: &str) -> Option<&'static PackageDescriptor> {
    all().find(|d| d.name == name)
}

/// Every shipped recipe.
pub fn all() -> impl Iterator<Item = &'static PackageDescriptor> {
    [cpp_peglib()].into_iter()
}
