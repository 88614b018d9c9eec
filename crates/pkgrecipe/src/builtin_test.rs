// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
fn test_cpp_peglib_is_valid() {
    let recipe = cpp_peglib();
    recipe.validate().expect("Shipped recipe should validate");
    assert_eq!(recipe.reference(), "cpp-peglib/0.0.1");
    assert_eq!(recipe.settings, vec!["os", "compiler", "build_type", "arch"]);
    assert_eq!(recipe.generators, vec!["cmake_find_package_multi"]);
    assert_eq!(recipe.platform_rules.len(), 1);
}

#[rstest]
fn test_cpp_peglib_is_shared() {
    assert!(std::ptr::eq(cpp_peglib(), cpp_peglib()));
}

#[rstest]
fn test_find() {
    assert!(find("cpp-peglib").is_some());
    assert!(find("zlib").is_none());
    assert_eq!(all().count(), 1);
}
