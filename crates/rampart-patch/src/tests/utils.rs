// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Shared helpers for rampart-patch tests.

use rampart_maps::{MappingRecord, TargetRegion};

use crate::support::test_utils::code_mapping_line;
use crate::window::MemoryWindow;

/// Builds a target region whose addresses are those of `bytes`.
pub fn region_over(bytes: &mut [u8], permissions: &str) -> TargetRegion {
    let record: MappingRecord = code_mapping_line(bytes, permissions, "/lib/libjdwp.so")
        .parse()
        .expect("Failed to parse()");

    TargetRegion::try_from(record).expect("Failed to try_from(..)")
}

/// Builds a window over `bytes`.
pub fn window_over(bytes: &mut [u8]) -> MemoryWindow {
    // SAFETY: the buffer outlives every window built in these tests and is
    // not otherwise borrowed while the window is in use.
    unsafe { MemoryWindow::new(bytes.as_mut_ptr() as usize, bytes.len()) }
        .expect("Failed to new(..)")
}
