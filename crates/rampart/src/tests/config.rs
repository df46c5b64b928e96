// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for ProtectionConfig.

use std::path::Path;

use rampart_test_utils::run_test_as_subprocess;

use crate::config::{ProtectionConfig, parse_byte};
use crate::error::{ProtectError, TerminationCode};

#[test]
fn test_builtin_targets_jdwp() {
    let config = ProtectionConfig::builtin();

    assert_eq!(config.target_fragment, "jdwp");
    assert_eq!(config.maps_path, Path::new("/proc/self/maps"));
    assert_eq!(config.pattern_byte, 0x55);
    assert_eq!(config.replacement_byte, 0xC3);
    assert_eq!(config.return_opcode, 0xC3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_fragment() {
    let config = ProtectionConfig::builtin().with_target_fragment("");

    let result = config.validate();

    assert!(matches!(result, Err(ProtectError::InvalidConfig(_))));
    assert_eq!(
        result.map_err(|e| e.termination_code()),
        Err(TerminationCode::InvalidConfig)
    );
}

#[test]
fn test_validate_rejects_replacement_equal_to_pattern() {
    let config = ProtectionConfig {
        replacement_byte: 0x55,
        ..ProtectionConfig::builtin()
    };

    assert!(matches!(
        config.validate(),
        Err(ProtectError::InvalidConfig(_))
    ));
}

#[test]
fn test_builders_override_fields() {
    let config = ProtectionConfig::builtin()
        .with_target_fragment("frida")
        .with_maps_path("/tmp/maps");

    assert_eq!(config.target_fragment, "frida");
    assert_eq!(config.maps_path, Path::new("/tmp/maps"));
}

#[test]
fn test_parse_byte_accepts_hex_and_decimal() {
    assert_eq!(parse_byte("0x55"), Some(0x55));
    assert_eq!(parse_byte("0XC3"), Some(0xC3));
    assert_eq!(parse_byte(" 85 "), Some(85));
    assert_eq!(parse_byte("0x100"), None);
    assert_eq!(parse_byte("push"), None);
    assert_eq!(parse_byte(""), None);
}

#[test]
fn test_default_is_builtin() {
    assert_eq!(ProtectionConfig::default(), ProtectionConfig::builtin());
}

// =============================================================================
// Environment overrides (subprocess: the environment is process-global)
// =============================================================================

fn set_env(vars: &[(&str, &str)]) {
    for (name, value) in vars {
        // SAFETY: runs in a dedicated single-test subprocess.
        unsafe { std::env::set_var(name, value) };
    }
}

#[test]
#[ignore]
fn subprocess_test_from_env_applies_overrides() {
    set_env(&[
        ("RAMPART_TARGET_FRAGMENT", "  frida-agent  "),
        ("RAMPART_MAPS_PATH", "/proc/1/maps"),
        ("RAMPART_PATTERN_BYTE", "0x90"),
        ("RAMPART_REPLACEMENT_BYTE", "204"),
        ("RAMPART_RETURN_OPCODE", "0XCC"),
    ]);

    let config = ProtectionConfig::from_env();

    assert_eq!(config.target_fragment, "frida-agent");
    assert_eq!(config.maps_path, Path::new("/proc/1/maps"));
    assert_eq!(config.pattern_byte, 0x90);
    assert_eq!(config.replacement_byte, 0xCC);
    assert_eq!(config.return_opcode, 0xCC);
    assert_eq!(ProtectionConfig::default(), ProtectionConfig::builtin());
}

#[test]
fn test_from_env_applies_overrides() {
    let exit_code =
        run_test_as_subprocess("tests::config::subprocess_test_from_env_applies_overrides");

    assert_eq!(exit_code, Some(0));
}

#[test]
#[ignore]
fn subprocess_test_from_env_falls_back_on_unusable_values() {
    set_env(&[
        ("RAMPART_TARGET_FRAGMENT", "   "),
        ("RAMPART_MAPS_PATH", ""),
        ("RAMPART_PATTERN_BYTE", "push"),
        ("RAMPART_REPLACEMENT_BYTE", "0x1C3"),
        ("RAMPART_RETURN_OPCODE", "-1"),
    ]);

    assert_eq!(ProtectionConfig::from_env(), ProtectionConfig::builtin());
}

#[test]
fn test_from_env_falls_back_on_unusable_values() {
    let exit_code = run_test_as_subprocess(
        "tests::config::subprocess_test_from_env_falls_back_on_unusable_values",
    );

    assert_eq!(exit_code, Some(0));
}
