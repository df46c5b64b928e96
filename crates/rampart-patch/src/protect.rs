// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! PageProtector - The page-permission primitive consumed by the patcher.

use rampart_maps::Permissions;

use crate::error::Errno;

/// Changes the access permissions of an address range.
pub trait PageProtector {
    /// Sets `base..base + len` to exactly `permissions`.
    ///
    /// # Safety
    ///
    /// The range must be mapped in the calling process and no live Rust
    /// reference may rely on an access the new permissions revoke.
    unsafe fn change(&self, base: usize, len: usize, permissions: Permissions) -> Result<(), Errno>;
}

impl<P: PageProtector + ?Sized> PageProtector for &P {
    unsafe fn change(&self, base: usize, len: usize, permissions: Permissions) -> Result<(), Errno> {
        unsafe { (**self).change(base, len, permissions) }
    }
}

/// `mprotect(2)`.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Mprotect;

#[cfg(unix)]
impl Mprotect {
    /// Translates flags into `PROT_*` bits.
    pub fn prot_bits(permissions: Permissions) -> libc::c_int {
        let mut prot = libc::PROT_NONE;
        if permissions.read {
            prot |= libc::PROT_READ;
        }
        if permissions.write {
            prot |= libc::PROT_WRITE;
        }
        if permissions.execute {
            prot |= libc::PROT_EXEC;
        }
        prot
    }
}

#[cfg(unix)]
impl PageProtector for Mprotect {
    unsafe fn change(&self, base: usize, len: usize, permissions: Permissions) -> Result<(), Errno> {
        let failed = unsafe {
            libc::mprotect(
                base as *mut libc::c_void,
                len,
                Self::prot_bits(permissions),
            )
        } != 0;

        if failed {
            return Err(Errno::last());
        }

        Ok(())
    }
}
