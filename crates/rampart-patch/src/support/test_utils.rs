// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! RecordingProtector - A PageProtector that never touches the kernel.

use core::cell::RefCell;

use rampart_maps::Permissions;

use crate::error::Errno;
use crate::protect::PageProtector;

/// One recorded permission change.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ProtectCall {
    /// Requested base address.
    pub base: usize,
    /// Requested length.
    pub len: usize,
    /// Requested permissions.
    pub permissions: Permissions,
}

/// Records every call and optionally fails one of them.
///
/// Calls are numbered from 0 in the order they are made, the failing call
/// included.
#[derive(Debug, Default)]
pub struct RecordingProtector {
    calls: RefCell<Vec<ProtectCall>>,
    fail_at: Option<(usize, Errno)>,
}

impl RecordingProtector {
    /// A protector where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A protector whose `index`-th call fails with `errno`.
    pub fn failing_at(index: usize, errno: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_at: Some((index, Errno(errno))),
        }
    }

    /// Calls made so far.
    pub fn calls(&self) -> Vec<ProtectCall> {
        self.calls.borrow().clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl PageProtector for RecordingProtector {
    unsafe fn change(&self, base: usize, len: usize, permissions: Permissions) -> Result<(), Errno> {
        let mut calls = self.calls.borrow_mut();
        let index = calls.len();

        calls.push(ProtectCall {
            base,
            len,
            permissions,
        });

        match self.fail_at {
            Some((fail_index, errno)) if fail_index == index => Err(errno),
            _ => Ok(()),
        }
    }
}

/// Formats a map line for a code mapping over `bytes`.
pub fn code_mapping_line(bytes: &mut [u8], permissions: &str, path: &str) -> String {
    let start = bytes.as_mut_ptr() as usize;
    let end = start + bytes.len();
    format!("{start:x}-{end:x} {permissions} 00000000 08:01 4242 {path}")
}
