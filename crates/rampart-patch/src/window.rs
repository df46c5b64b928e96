// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! MemoryWindow - Bounds-checked view over a live address range.
//!
//! Addresses come from parsed map text. This is the only place where such an
//! integer becomes a pointer.

use core::ptr::NonNull;

use rampart_maps::TargetRegion;

use crate::error::PatchError;

/// A `(base, len)` range of the current address space.
///
/// All accesses are volatile so the compiler can neither elide nor reorder
/// them around permission changes.
#[derive(Debug)]
pub struct MemoryWindow {
    base: NonNull<u8>,
    len: usize,
}

impl MemoryWindow {
    /// Creates a window over `base..base + len`.
    ///
    /// # Safety
    ///
    /// For the whole lifetime of the window:
    /// - the range must be mapped in the calling process,
    /// - it must be readable whenever [`read`](Self::read) is called and
    ///   writable whenever [`write`](Self::write) or [`fill`](Self::fill) is
    ///   called,
    /// - no Rust reference may alias the range.
    pub unsafe fn new(base: usize, len: usize) -> Result<Self, PatchError> {
        let invalid = PatchError::InvalidWindow { base, len };

        if len == 0 || base.checked_add(len).is_none() {
            return Err(invalid);
        }

        let base = NonNull::new(base as *mut u8).ok_or(invalid)?;

        Ok(Self { base, len })
    }

    /// Creates a window covering a whole target region.
    ///
    /// # Safety
    ///
    /// Same contract as [`MemoryWindow::new`]. `region` must describe a
    /// current mapping of this process.
    pub unsafe fn from_region(region: &TargetRegion) -> Result<Self, PatchError> {
        unsafe { Self::new(region.start(), region.len()) }
    }

    /// First address of the window.
    pub fn base(&self) -> usize {
        self.base.as_ptr() as usize
    }

    /// Size of the window in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: empty windows are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads the byte at `offset`, or `None` past the end.
    pub fn read(&self, offset: usize) -> Option<u8> {
        if offset >= self.len {
            return None;
        }

        // SAFETY: offset is in bounds; readability is the constructor's contract.
        Some(unsafe { self.base.as_ptr().add(offset).read_volatile() })
    }

    /// Writes `byte` at `offset`.
    pub fn write(&mut self, offset: usize, byte: u8) -> Result<(), PatchError> {
        if offset >= self.len {
            return Err(PatchError::OutOfBounds {
                offset,
                len: self.len,
            });
        }

        // SAFETY: offset is in bounds; writability is the constructor's contract.
        unsafe { self.base.as_ptr().add(offset).write_volatile(byte) };

        Ok(())
    }

    /// Overwrites every byte of the window with `byte`.
    pub fn fill(&mut self, byte: u8) {
        for offset in 0..self.len {
            // SAFETY: offset < len; writability is the constructor's contract.
            unsafe { self.base.as_ptr().add(offset).write_volatile(byte) };
        }
    }

    /// Iterates over the bytes of the window.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).filter_map(|offset| self.read(offset))
    }
}
