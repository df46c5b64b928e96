// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! CodePatcher - Escalate, mutate, restore.
//!
//! Per call: `Escalating -> Patching -> Restoring -> Done`. Escalation or
//! restoration failures end the call with
//! [`PatchError::PermissionChangeFailed`]; there is no retry.

use rampart_maps::{Permissions, TargetRegion};

use crate::error::PatchError;
use crate::protect::PageProtector;
use crate::scanner::SignatureScanner;
use crate::scope::ProtectionScope;
use crate::window::MemoryWindow;

/// `ret` on x86-64.
pub const RETURN_OPCODE: u8 = 0xC3;

/// What a patch writes.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PatchMode {
    /// Every byte of the region becomes `opcode`. Original permissions are
    /// restored afterwards.
    Blanket {
        /// Byte written over the whole region.
        opcode: u8,
    },
    /// Only bytes equal to `pattern_byte` become `replacement_byte`. The
    /// region is left `r-x` afterwards.
    PatternTriggered {
        /// Prologue byte to look for.
        pattern_byte: u8,
        /// Byte written over each match.
        replacement_byte: u8,
    },
}

impl PatchMode {
    /// Blanket patch with [`RETURN_OPCODE`].
    pub const fn blanket() -> Self {
        Self::Blanket {
            opcode: RETURN_OPCODE,
        }
    }

    /// Targeted patch. Rejects a replacement equal to the pattern.
    pub fn pattern_triggered(pattern_byte: u8, replacement_byte: u8) -> Result<Self, PatchError> {
        if pattern_byte == replacement_byte {
            return Err(PatchError::ReplacementMatchesPattern(replacement_byte));
        }

        Ok(Self::PatternTriggered {
            pattern_byte,
            replacement_byte,
        })
    }
}

/// One region and how to patch it.
#[derive(Debug, Clone, Copy)]
pub struct PatchPlan<'r> {
    /// Region to patch.
    pub region: &'r TargetRegion,
    /// Patch to apply.
    pub mode: PatchMode,
}

/// What a patch did.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PatchReport {
    /// First address of the patched region.
    pub start: usize,
    /// One past the last address of the patched region.
    pub end: usize,
    /// Applied mode.
    pub mode: PatchMode,
    /// Permissions left on the region.
    pub restored_to: Permissions,
    /// Number of bytes overwritten.
    pub bytes_written: usize,
    /// Offsets that matched the pattern (targeted mode only).
    pub matched_offsets: Vec<usize>,
}

impl PatchReport {
    /// Returns true if at least one byte was overwritten.
    pub fn applied(&self) -> bool {
        self.bytes_written > 0
    }
}

/// Applies patches through a [`PageProtector`].
#[derive(Debug, Clone, Default)]
pub struct CodePatcher<P> {
    protector: P,
}

impl<P: PageProtector> CodePatcher<P> {
    /// Creates a patcher using `protector` for permission changes.
    pub fn new(protector: P) -> Self {
        Self { protector }
    }

    /// The permission primitive in use.
    pub fn protector(&self) -> &P {
        &self.protector
    }

    /// Applies `plan`.
    ///
    /// # Safety
    ///
    /// `plan.region` must describe a current mapping of this process, and no
    /// Rust reference may alias it. Threads executing inside the region race
    /// with the patch.
    pub unsafe fn apply(&self, plan: &PatchPlan<'_>) -> Result<PatchReport, PatchError> {
        match plan.mode {
            PatchMode::Blanket { opcode } => unsafe { self.blanket(plan.region, opcode) },
            PatchMode::PatternTriggered {
                pattern_byte,
                replacement_byte,
            } => unsafe { self.apply_targeted(plan.region, pattern_byte, replacement_byte) },
        }
    }

    /// Overwrites the whole region with [`RETURN_OPCODE`] and restores the
    /// permissions recorded in the region.
    ///
    /// # Safety
    ///
    /// See [`CodePatcher::apply`].
    pub unsafe fn apply_blanket(&self, region: &TargetRegion) -> Result<PatchReport, PatchError> {
        unsafe { self.blanket(region, RETURN_OPCODE) }
    }

    /// Overwrites every `pattern_byte` in the region with `replacement_byte`
    /// and leaves the region `r-x`.
    ///
    /// A report with no matches is not an error here; the caller decides.
    ///
    /// # Safety
    ///
    /// See [`CodePatcher::apply`].
    pub unsafe fn apply_targeted(
        &self,
        region: &TargetRegion,
        pattern_byte: u8,
        replacement_byte: u8,
    ) -> Result<PatchReport, PatchError> {
        let mode = PatchMode::pattern_triggered(pattern_byte, replacement_byte)?;
        let restore_to = Permissions::READ_EXECUTE;

        let window = unsafe { MemoryWindow::from_region(region) }?;
        let mut scope = unsafe { ProtectionScope::acquire(&self.protector, window, restore_to) }?;

        let matched_offsets: Vec<usize> = SignatureScanner::new(pattern_byte)
            .entry_points(scope.window())
            .collect();

        for &offset in &matched_offsets {
            scope.window_mut().write(offset, replacement_byte)?;
        }

        scope.release()?;

        tracing::debug!(
            start = region.start(),
            end = region.end(),
            matches = matched_offsets.len(),
            "targeted patch applied"
        );

        Ok(PatchReport {
            start: region.start(),
            end: region.end(),
            mode,
            restored_to: restore_to,
            bytes_written: matched_offsets.len(),
            matched_offsets,
        })
    }

    unsafe fn blanket(&self, region: &TargetRegion, opcode: u8) -> Result<PatchReport, PatchError> {
        let restore_to = region.permissions();

        let window = unsafe { MemoryWindow::from_region(region) }?;
        let mut scope = unsafe { ProtectionScope::acquire(&self.protector, window, restore_to) }?;

        scope.window_mut().fill(opcode);
        let bytes_written = scope.window().len();

        scope.release()?;

        tracing::debug!(
            start = region.start(),
            end = region.end(),
            bytes_written,
            "blanket patch applied"
        );

        Ok(PatchReport {
            start: region.start(),
            end: region.end(),
            mode: PatchMode::Blanket { opcode },
            restored_to: restore_to,
            bytes_written,
            matched_offsets: Vec::new(),
        })
    }
}
