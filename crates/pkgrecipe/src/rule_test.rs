// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;
use crate::requirement::Visibility;

#[rstest]
#[case(Platform::new().with("os", "Windows"), true)]
#[case(Platform::new().with("os", "Linux"), false)]
#[case(Platform::new().with("arch", "x86"), false)]
fn test_os_condition(#[case] platform: Platform, #[case] expected: bool) {
    assert_eq!(Condition::os_equals("Windows").matches(&platform), expected);
}

#[rstest]
fn test_condition_is_a_conjunction() {
    let condition = Condition::os_equals("Windows").and(
        "arch",
        SettingMatch::OneOf(vec!["x86".to_string(), "x86_64".to_string()]),
    );
    let win64 = Platform::new().with("os", "Windows").with("arch", "x86_64");
    let win_arm = Platform::new().with("os", "Windows").with("arch", "armv8");
    assert!(condition.matches(&win64));
    assert!(!condition.matches(&win_arm));
    assert!(Condition::new().matches(&Platform::new()));
}

#[rstest]
fn test_parse_rule_yaml() {
    let yaml = r#"
when:
  os: Windows
  arch: [x86, x86_64]
then:
  - remove_option: fPIC
  - set_default:
      option: shared
      value: false
  - remove_requirement: gtest
  - add_requirement:
      pkg: winflexbison/2.5.24
      private: true
"#;
    let rule: PlatformRule = serde_yaml::from_str(yaml).expect("Should parse rule");
    assert_eq!(rule.when.settings().collect::<Vec<_>>(), vec!["arch", "os"]);
    assert_eq!(
        rule.then,
        vec![
            Mutation::RemoveOption("fPIC".to_string()),
            Mutation::SetDefault {
                option: "shared".to_string(),
                value: OptionValue::Bool(false),
            },
            Mutation::RemoveRequirement("gtest".to_string()),
            Mutation::AddRequirement(Requirement::new(
                "winflexbison",
                "2.5.24",
                Visibility::Private
            )),
        ]
    );
}

#[rstest]
#[case("remove_option: fPIC\nremove_requirement: gtest\n")]
#[case("{}\n")]
#[case("rename_option: fPIC\n")]
fn test_mutation_needs_exactly_one_action(#[case] yaml: &str) {
    let result: std::result::Result<Mutation, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err(), "'{yaml}' should be rejected");
}

#[rstest]
fn test_mutation_yaml_is_single_key() {
    let yaml = serde_yaml::to_string(&Mutation::RemoveOption("fPIC".to_string())).unwrap();
    assert_eq!(yaml.trim(), "remove_option: fPIC");
}

#[rstest]
fn test_apply_to_options_is_idempotent() {
    let rule = PlatformRule::when(Condition::os_equals("Windows")).remove_option("fPIC");
    let mut domains = IndexMap::from([
        ("shared".to_string(), OptionDomain::boolean()),
        ("fPIC".to_string(), OptionDomain::boolean()),
    ]);
    let mut defaults = IndexMap::from([
        ("shared".to_string(), OptionValue::Bool(true)),
        ("fPIC".to_string(), OptionValue::Bool(true)),
    ]);

    rule.apply_to_options("pkg", &mut domains, &mut defaults).unwrap();
    let once = (domains.clone(), defaults.clone());
    rule.apply_to_options("pkg", &mut domains, &mut defaults).unwrap();

    assert_eq!((domains, defaults), once);
    assert!(!once.1.contains_key("fPIC"));
    assert!(!once.0.contains_key("fPIC"));
}

#[rstest]
fn test_set_default_outside_domain_fails() {
    let rule = PlatformRule::default().set_default("shared", "maybe");
    let mut domains = IndexMap::from([("shared".to_string(), OptionDomain::boolean())]);
    let mut defaults = IndexMap::from([("shared".to_string(), OptionValue::Bool(true))]);

    let result = rule.apply_to_options("pkg", &mut domains, &mut defaults);
    assert!(matches!(result, Err(Error::InvalidOptionValue { .. })));
}

#[rstest]
fn test_set_default_on_removed_option_is_skipped() {
    let rule = PlatformRule::default()
        .remove_option("fPIC")
        .set_default("fPIC", false);
    let mut domains = IndexMap::from([("fPIC".to_string(), OptionDomain::boolean())]);
    let mut defaults = IndexMap::from([("fPIC".to_string(), OptionValue::Bool(true))]);

    rule.apply_to_options("pkg", &mut domains, &mut defaults).unwrap();
    assert!(defaults.is_empty());
}

#[rstest]
fn test_set_default_needs_an_existing_default() {
    let rule = PlatformRule::default().set_default("extra", true);
    let mut domains = IndexMap::from([("extra".to_string(), OptionDomain::boolean())]);
    let mut defaults = IndexMap::new();

    rule.apply_to_options("pkg", &mut domains, &mut defaults).unwrap();
    assert!(defaults.is_empty(), "an option without a default stays unresolved");
}

#[rstest]
fn test_condition_reads_numeric_values() {
    let yaml = "compiler.version: 12
arch: [8, 9.5]
";
    let condition: Condition = serde_yaml::from_str(yaml).unwrap();
    let platform = Platform::new()
        .with("compiler.version", "12")
        .with("arch", "9.5");
    assert!(condition.matches(&platform));
}

#[rstest]
fn test_apply_to_requirements() {
    let rule = PlatformRule::default()
        .remove_requirement("gtest")
        .add_requirement(Requirement::new("catch2", "3.1.0", Visibility::Private))
        .remove_option("fPIC");
    let mut reqs = RequirementSpec::from(vec![
        Requirement::new("llvm-core", "13.0.0", Visibility::Private),
        Requirement::new("gtest", "1.11.0", Visibility::Private),
    ]);

    rule.apply_to_requirements("pkg", &mut reqs);
    rule.apply_to_requirements("pkg", &mut reqs);

    assert_eq!(reqs.names().collect::<Vec<_>>(), vec!["llvm-core", "catch2"]);
}
