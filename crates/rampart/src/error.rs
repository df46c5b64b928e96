// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for rampart.

use rampart_maps::MapsError;
use rampart_patch::PatchError;
use thiserror::Error;

/// Exit status used when protection terminates the host.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum TerminationCode {
    /// The target module is mapped (presence check).
    DebuggerDetected = 1,
    /// The memory map could not be read.
    EnvironmentUnavailable = 2,
    /// A permission change failed.
    PermissionChangeFailed = 3,
    /// The target is mapped but nothing was patched.
    PatchNotApplied = 4,
    /// The configuration cannot be applied.
    InvalidConfig = 5,
}

impl TerminationCode {
    /// Process exit status.
    pub const fn status(self) -> i32 {
        self as i32
    }
}

/// Errors that fail a protection attempt.
#[derive(Debug, Error)]
pub enum ProtectError {
    /// The memory map could not be read.
    #[error(transparent)]
    EnvironmentUnavailable(#[from] MapsError),

    /// Patching a region failed.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// The target is mapped but no byte of it was patched.
    #[error("target `{fragment}` is mapped but no entry point was patched")]
    PatchNotApplied {
        /// Fragment the target was located by.
        fragment: String,
    },

    /// The configuration cannot be applied.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl ProtectError {
    /// Exit status for this failure.
    pub fn termination_code(&self) -> TerminationCode {
        match self {
            Self::EnvironmentUnavailable(_) => TerminationCode::EnvironmentUnavailable,
            Self::Patch(PatchError::PermissionChangeFailed { .. }) => {
                TerminationCode::PermissionChangeFailed
            }
            Self::Patch(PatchError::ReplacementMatchesPattern(_)) | Self::InvalidConfig(_) => {
                TerminationCode::InvalidConfig
            }
            Self::Patch(PatchError::InvalidWindow { .. } | PatchError::OutOfBounds { .. })
            | Self::PatchNotApplied { .. } => TerminationCode::PatchNotApplied,
        }
    }
}
