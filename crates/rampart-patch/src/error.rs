// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for rampart-patch.

use core::fmt;

use thiserror::Error;

/// OS error code reported by a failed permission change.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Errno(pub i32);

impl Errno {
    /// Reads `errno` of the calling thread.
    pub fn last() -> Self {
        Self(std::io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, std::io::Error::from_raw_os_error(self.0))
    }
}

/// Step of a patch cycle that changes page permissions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProtectionStage {
    /// Raising the range to `rwx` before writing.
    Escalate,
    /// Lowering the range back after writing.
    Restore,
}

impl fmt::Display for ProtectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Escalate => f.write_str("escalate"),
            Self::Restore => f.write_str("restore"),
        }
    }
}

/// Errors that can occur while patching a region.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum PatchError {
    /// `mprotect` failed. Fatal: memory may be over-permissioned or unpatched.
    #[error("permission change failed during {stage}: errno {errno}")]
    PermissionChangeFailed {
        /// Which step failed.
        stage: ProtectionStage,
        /// OS error code.
        errno: Errno,
    },

    /// The address range cannot describe live memory.
    #[error("invalid memory window {base:#x}+{len:#x}")]
    InvalidWindow {
        /// Requested base address.
        base: usize,
        /// Requested length.
        len: usize,
    },

    /// An access fell outside the window.
    #[error("offset {offset:#x} outside window of {len:#x} bytes")]
    OutOfBounds {
        /// Offending offset.
        offset: usize,
        /// Window length.
        len: usize,
    },

    /// A targeted patch whose replacement equals the pattern would never converge.
    #[error("replacement byte {0:#04x} equals the pattern byte")]
    ReplacementMatchesPattern(u8),
}
