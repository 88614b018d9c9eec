// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
fn test_builder_and_lookup() {
    let platform = Platform::new().with("os", "Linux").with("arch", "x86_64");
    assert_eq!(platform.get("os"), Some("Linux"));
    assert_eq!(platform.get("compiler"), None);
    assert!(platform.contains("arch"));
    assert_eq!(platform.len(), 2);
}

#[rstest]
fn test_parse_assignments() {
    let platform = Platform::parse_assignments(["os=Windows", "arch = x86", "os=Linux"])
        .expect("Should parse assignments");
    assert_eq!(platform.get("os"), Some("Linux"));
    assert_eq!(platform.get("arch"), Some("x86"));
}

#[rstest]
fn test_parse_assignments_rejects_missing_value_separator() {
    let result = Platform::parse_assignments(["Linux"]);
    assert!(matches!(result, Err(Error::ValidationFailed(_))));
}

#[rstest]
fn test_restricted_to_declared_settings() {
    let platform = Platform::new()
        .with("os", "Linux")
        .with("arch", "armv8")
        .with("os.distro", "ubuntu");
    let declared = vec!["os".to_string(), "arch".to_string(), "compiler".to_string()];
    let restricted = platform.restricted_to(&declared);
    assert_eq!(restricted, Platform::new().with("os", "Linux").with("arch", "armv8"));
}

#[rstest]
fn test_yaml_mapping() {
    let platform: Platform = serde_yaml::from_str("os: Macos\narch: armv8\n").unwrap();
    assert_eq!(platform.get("os"), Some("Macos"));
    let collected: Platform = [("os", "Macos"), ("arch", "armv8")].into_iter().collect();
    assert_eq!(platform, collected);
}
