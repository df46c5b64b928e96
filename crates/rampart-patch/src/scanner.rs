// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SignatureScanner - Single-byte function prologue heuristic.
//!
//! Stripped modules carry no symbols, but most x86-64 functions open with
//! `push rbp` (`0x55`). Every occurrence of the pattern byte is reported,
//! including the ones that sit mid-instruction or in embedded data, and
//! functions built without a frame pointer are missed. No second opcode is
//! cross-checked.

use crate::window::MemoryWindow;

/// `push rbp` on x86-64.
pub const PUSH_RBP: u8 = 0x55;

/// Scans windows for a fixed pattern byte.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SignatureScanner {
    pattern: u8,
}

impl SignatureScanner {
    /// Creates a scanner for `pattern`.
    pub const fn new(pattern: u8) -> Self {
        Self { pattern }
    }

    /// The byte this scanner looks for.
    pub const fn pattern(&self) -> u8 {
        self.pattern
    }

    /// Lazily yields every offset of `window` holding the pattern byte.
    pub fn entry_points<'w>(&self, window: &'w MemoryWindow) -> EntryPoints<'w> {
        EntryPoints {
            window,
            pattern: self.pattern,
            next: 0,
        }
    }
}

impl Default for SignatureScanner {
    fn default() -> Self {
        Self::new(PUSH_RBP)
    }
}

/// Offsets of a window that hold the pattern byte, in ascending order.
#[derive(Debug)]
pub struct EntryPoints<'w> {
    window: &'w MemoryWindow,
    pattern: u8,
    next: usize,
}

impl Iterator for EntryPoints<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(byte) = self.window.read(self.next) {
            let offset = self.next;
            self.next += 1;

            if byte == self.pattern {
                return Some(offset);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.window.len().saturating_sub(self.next)))
    }
}

/// Shorthand for `SignatureScanner::new(pattern_byte).entry_points(window)`.
pub fn find_entry_points(window: &MemoryWindow, pattern_byte: u8) -> EntryPoints<'_> {
    SignatureScanner::new(pattern_byte).entry_points(window)
}
