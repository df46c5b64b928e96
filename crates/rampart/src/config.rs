// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::path::PathBuf;

use rampart_maps::ProcMaps;
use rampart_patch::{PUSH_RBP, RETURN_OPCODE};

use crate::error::ProtectError;

/// What to look for and what to write.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProtectionConfig {
    /// Substring of the target module's backing path.
    pub target_fragment: String,
    /// Memory map to read.
    pub maps_path: PathBuf,
    /// Prologue byte the targeted strategy looks for.
    pub pattern_byte: u8,
    /// Byte the targeted strategy writes over each match.
    pub replacement_byte: u8,
    /// Byte the blanket strategy writes over the whole region.
    pub return_opcode: u8,
}

impl ProtectionConfig {
    /// Default fragment: the JDWP agent library.
    pub const DEFAULT_TARGET_FRAGMENT: &'static str = "jdwp";

    /// Built-in defaults, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            target_fragment: Self::DEFAULT_TARGET_FRAGMENT.to_owned(),
            maps_path: PathBuf::from(ProcMaps::SELF_MAPS),
            pattern_byte: PUSH_RBP,
            replacement_byte: RETURN_OPCODE,
            return_opcode: RETURN_OPCODE,
        }
    }

    /// Built-in defaults overridden by `RAMPART_*` environment variables.
    ///
    /// Opt-in only: whoever launches the process controls its environment,
    /// so the host entry points never call this.
    pub fn from_env() -> Self {
        let builtin = Self::builtin();

        Self {
            target_fragment: env_string("RAMPART_TARGET_FRAGMENT", builtin.target_fragment),
            maps_path: std::env::var_os("RAMPART_MAPS_PATH")
                .filter(|raw| !raw.is_empty())
                .map(PathBuf::from)
                .unwrap_or(builtin.maps_path),
            pattern_byte: env_byte("RAMPART_PATTERN_BYTE", builtin.pattern_byte),
            replacement_byte: env_byte("RAMPART_REPLACEMENT_BYTE", builtin.replacement_byte),
            return_opcode: env_byte("RAMPART_RETURN_OPCODE", builtin.return_opcode),
        }
    }

    /// Sets the target fragment.
    pub fn with_target_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.target_fragment = fragment.into();
        self
    }

    /// Sets the map path.
    pub fn with_maps_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.maps_path = path.into();
        self
    }

    /// Checks that the configuration can be applied.
    pub fn validate(&self) -> Result<(), ProtectError> {
        if self.target_fragment.is_empty() {
            return Err(ProtectError::InvalidConfig("target fragment is empty"));
        }

        if self.pattern_byte == self.replacement_byte {
            return Err(ProtectError::InvalidConfig(
                "replacement byte equals pattern byte",
            ));
        }

        Ok(())
    }
}

impl Default for ProtectionConfig {
    /// Same as [`ProtectionConfig::builtin`]. The environment is never read.
    fn default() -> Self {
        Self::builtin()
    }
}

fn env_string(name: &str, default: String) -> String {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().to_owned(),
        _ => default,
    }
}

fn env_byte(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|raw| parse_byte(&raw))
        .unwrap_or(default)
}

/// Parses `0x55`, `0X55` or `85`.
pub(crate) fn parse_byte(raw: &str) -> Option<u8> {
    let raw = raw.trim();

    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => raw.parse::<u8>().ok(),
    }
}
