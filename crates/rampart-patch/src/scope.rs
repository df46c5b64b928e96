// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ProtectionScope - Escalate on acquire, restore on release or drop.
//!
//! ```text
//! acquire ──(rwx ok)──> window()/window_mut() ──> release() ──> restored
//!    │                                 │
//!    └──(rwx failed)──> Err, no byte touched
//!                                      └──(early return / panic)──> Drop restores
//! ```

use rampart_maps::Permissions;

use crate::error::{PatchError, ProtectionStage};
use crate::protect::PageProtector;
use crate::window::MemoryWindow;

/// Holds a window at `rwx` until released.
pub struct ProtectionScope<'p, P: PageProtector + ?Sized> {
    protector: &'p P,
    window: MemoryWindow,
    restore_to: Permissions,
    restored: bool,
}

impl<'p, P: PageProtector + ?Sized> ProtectionScope<'p, P> {
    /// Escalates the window to `rwx`.
    ///
    /// On failure the window is dropped untouched.
    ///
    /// # Safety
    ///
    /// The window's range must satisfy [`PageProtector::change`] for both the
    /// escalation and the later restoration to `restore_to`.
    pub unsafe fn acquire(
        protector: &'p P,
        window: MemoryWindow,
        restore_to: Permissions,
    ) -> Result<Self, PatchError> {
        tracing::debug!(
            base = window.base(),
            len = window.len(),
            "escalating range to rwx"
        );

        unsafe {
            protector.change(
                window.base(),
                window.len(),
                Permissions::READ_WRITE_EXECUTE,
            )
        }
        .map_err(|errno| PatchError::PermissionChangeFailed {
            stage: ProtectionStage::Escalate,
            errno,
        })?;

        Ok(Self {
            protector,
            window,
            restore_to,
            restored: false,
        })
    }

    /// The escalated window.
    pub fn window(&self) -> &MemoryWindow {
        &self.window
    }

    /// The escalated window, writable.
    pub fn window_mut(&mut self) -> &mut MemoryWindow {
        &mut self.window
    }

    /// Permissions applied on release.
    pub fn restore_to(&self) -> Permissions {
        self.restore_to
    }

    /// Restores the permissions and ends the scope.
    pub fn release(mut self) -> Result<(), PatchError> {
        self.restored = true;
        self.restore()
    }

    fn restore(&self) -> Result<(), PatchError> {
        tracing::debug!(
            base = self.window.base(),
            len = self.window.len(),
            permissions = %self.restore_to,
            "restoring range permissions"
        );

        // SAFETY: guaranteed by the caller of `acquire`.
        unsafe {
            self.protector
                .change(self.window.base(), self.window.len(), self.restore_to)
        }
        .map_err(|errno| PatchError::PermissionChangeFailed {
            stage: ProtectionStage::Restore,
            errno,
        })
    }
}

impl<P: PageProtector + ?Sized> Drop for ProtectionScope<'_, P> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }

        tracing::warn!(
            base = self.window.base(),
            len = self.window.len(),
            "scope dropped before release, restoring permissions"
        );

        if let Err(err) = self.restore() {
            tracing::warn!(error = %err, "restore from drop failed");
        }
    }
}

impl<P: PageProtector + ?Sized> core::fmt::Debug for ProtectionScope<'_, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProtectionScope")
            .field("window", &self.window)
            .field("restore_to", &self.restore_to)
            .field("restored", &self.restored)
            .finish_non_exhaustive()
    }
}
