// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
#[case("true", OptionValue::Bool(true))]
#[case("True", OptionValue::Bool(true))]
#[case(" FALSE ", OptionValue::Bool(false))]
#[case("17", OptionValue::Int(17))]
#[case("-3", OptionValue::Int(-3))]
#[case("1.0", OptionValue::String("1.0".to_string()))]
#[case("libstdc++11", OptionValue::String("libstdc++11".to_string()))]
fn test_parse_option_value(#[case] input: &str, #[case] expected: OptionValue) {
    assert_eq!(OptionValue::parse(input), expected);
}

#[rstest]
fn test_yaml_values_normalize_like_text() {
    let values: Vec<OptionValue> =
        serde_yaml::from_str("[true, 'False', 11, '14', gnu]").expect("Should parse values");
    assert_eq!(
        values,
        vec![
            OptionValue::Bool(true),
            OptionValue::Bool(false),
            OptionValue::Int(11),
            OptionValue::Int(14),
            OptionValue::String("gnu".to_string()),
        ]
    );
}

#[rstest]
fn test_domain_from_yaml() {
    let domain: OptionDomain = serde_yaml::from_str("[true, false]").unwrap();
    assert_eq!(domain, OptionDomain::boolean());

    let any: OptionDomain = serde_yaml::from_str("ANY").unwrap();
    assert_eq!(any, OptionDomain::Any);

    let bad: Result<OptionDomain, _> = serde_yaml::from_str("SOME");
    assert!(bad.is_err(), "Only the ANY keyword is accepted as a scalar");
}

#[rstest]
fn test_domain_serializes_any_keyword() {
    let yaml = serde_yaml::to_string(&OptionDomain::Any).unwrap();
    assert_eq!(yaml.trim(), "ANY");
}

#[rstest]
fn test_domain_contains() {
    let domain = OptionDomain::values(["static", "shared"]);
    assert!(domain.contains(&OptionValue::from("shared")));
    assert!(!domain.contains(&OptionValue::from("dynamic")));
    assert!(OptionDomain::Any.contains(&OptionValue::from("dynamic")));
    assert!(OptionDomain::boolean().contains(&OptionValue::from("False")));
}

#[rstest]
fn test_domain_display() {
    assert_eq!(OptionDomain::boolean().to_string(), "[true, false]");
    assert_eq!(OptionDomain::Any.to_string(), "ANY");
    assert!(OptionDomain::Values(Vec::new()).is_empty());
    assert!(!OptionDomain::Any.is_empty());
}

#[rstest]
fn test_parse_option_assignments() {
    let overrides =
        parse_option_assignments(["shared=False", "fPIC = true", "shared=True"]).unwrap();
    assert_eq!(overrides.len(), 2);
    assert_eq!(overrides["shared"], OptionValue::Bool(true));
    assert_eq!(overrides["fPIC"], OptionValue::Bool(true));
}

#[rstest]
#[case("shared")]
#[case("=true")]
fn test_parse_option_assignments_rejects_malformed(#[case] input: &str) {
    let result = parse_option_assignments([input]);
    assert!(matches!(result, Err(crate::Error::ValidationFailed(_))));
}
