// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
fn test_parse_reference() {
    let req = Requirement::private("llvm-core/13.0.0").expect("Should parse reference");
    assert_eq!(req.name, "llvm-core");
    assert_eq!(req.version, "13.0.0");
    assert_eq!(req.visibility, Visibility::Private);
    assert_eq!(req.reference(), "llvm-core/13.0.0");
    assert_eq!(req.to_string(), "llvm-core/13.0.0 (private)");
}

#[rstest]
#[case(" gtest/1.11.0")]
#[case("gtest /1.11.0")]
#[case("gtest/ 1.11.0 ")]
fn test_parse_trims_both_halves(#[case] reference: &str) {
    let req = Requirement::public(reference).expect("Should parse padded reference");
    assert_eq!(req.reference(), "gtest/1.11.0");
}

#[rstest]
#[case("gtest")]
#[case("gtest/")]
#[case("/1.11.0")]
#[case("-bad/1.0")]
#[case("has space/1.0")]
fn test_parse_invalid_reference(#[case] reference: &str) {
    let result = Requirement::public(reference);
    assert!(
        matches!(result, Err(Error::InvalidRequirement(_))),
        "'{reference}' should be rejected"
    );
}

#[rstest]
fn test_version_range_passes_through() {
    let req = Requirement::public("zlib/[>=1.2.11 <2]").unwrap();
    assert_eq!(req.version, "[>=1.2.11 <2]");
    assert!(!req.is_private());
}

#[rstest]
fn test_yaml_form() {
    let yaml = r#"
- pkg: llvm-core/13.0.0
  private: true
- pkg: zlib/1.2.13
"#;
    let reqs: Vec<Requirement> = serde_yaml::from_str(yaml).expect("Should parse requirements");
    assert_eq!(reqs[0], Requirement::new("llvm-core", "13.0.0", Visibility::Private));
    assert_eq!(reqs[1], Requirement::new("zlib", "1.2.13", Visibility::Public));

    let written = serde_yaml::to_string(&reqs[1]).unwrap();
    assert!(written.contains("pkg: zlib/1.2.13"));
    assert!(!written.contains("private"), "public is the default and is omitted");
}

#[rstest]
fn test_yaml_rejects_bad_reference() {
    let result: std::result::Result<Vec<Requirement>, _> = serde_yaml::from_str("- pkg: zlib\n");
    assert!(result.is_err());
}

#[rstest]
fn test_spec_upsert_keeps_position() {
    let mut spec = RequirementSpec::from(vec![
        Requirement::new("a", "1", Visibility::Public),
        Requirement::new("b", "1", Visibility::Public),
    ]);
    spec.upsert(Requirement::new("a", "2", Visibility::Private));
    spec.upsert(Requirement::new("c", "1", Visibility::Public));
    assert_eq!(spec.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(spec.get("a").map(|r| r.version.as_str()), Some("2"));

    spec.remove("b");
    spec.remove("missing");
    assert_eq!(spec.names().collect::<Vec<_>>(), vec!["a", "c"]);
    assert_eq!(spec.public().count(), 1);
}
