// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Binary package identifiers.

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::requirement::RequirementSpec;
use crate::resolve::ResolvedConfiguration;
use crate::spec::PackageDescriptor;

#[cfg(test)]
#[path = "./package_id_test.rs"]
mod package_id_test;

/// Compute the identifier of the binary built from one resolution.
///
/// The id is the SHA-256 of [`package_info`], so it depends only on values,
/// never on the order options were declared or overridden in.
pub fn package_id(
    descriptor: &PackageDescriptor,
    configuration: &ResolvedConfiguration,
    requirements: &RequirementSpec,
) -> String {
    let info = package_info(descriptor, configuration, requirements);
    format!("{:x}", Sha256::digest(info.as_bytes()))
}

/// Canonical text rendering of everything that affects the binary.
pub fn package_info(
    descriptor: &PackageDescriptor,
    configuration: &ResolvedConfiguration,
    requirements: &RequirementSpec,
) -> String {
    let mut info = String::new();
    // writing into a String cannot fail
    let _ = writeln!(info, "[package]\n{}", descriptor.reference());

    info.push_str("[settings]\n");
    for (setting, value) in configuration.settings.iter() {
        let _ = writeln!(info, "{setting}={value}");
    }

    info.push_str("[options]\n");
    let mut options: Vec<_> = configuration.options.iter().collect();
    options.sort_by(|a, b| a.0.cmp(b.0));
    for (option, value) in options {
        let _ = writeln!(info, "{option}={value}");
    }

    info.push_str("[requires]\n");
    for requirement in requirements {
        let _ = writeln!(
            info,
            "{} {}",
            requirement.reference(),
            requirement.visibility
        );
    }
    info
}
