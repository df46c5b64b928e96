// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use rampart_patch::PatchReport;

use crate::error::{ProtectError, TerminationCode};

/// Result of one protection attempt.
#[derive(Debug)]
pub enum ProtectionOutcome {
    /// The target module is not mapped.
    NotPresent,
    /// The target module is mapped; the presence check does not patch.
    Detected,
    /// The target was patched. One report per executable region.
    Disabled(Vec<PatchReport>),
    /// The target is mapped but could not be disabled, or the map was
    /// unreadable.
    Failed(ProtectError),
}

impl ProtectionOutcome {
    /// Exit status the host must terminate with, or `None` if it may continue.
    pub fn termination_code(&self) -> Option<TerminationCode> {
        match self {
            Self::NotPresent | Self::Disabled(_) => None,
            Self::Detected => Some(TerminationCode::DebuggerDetected),
            Self::Failed(err) => Some(err.termination_code()),
        }
    }

    /// Returns true if the host may keep running.
    pub fn is_safe_to_continue(&self) -> bool {
        self.termination_code().is_none()
    }
}
