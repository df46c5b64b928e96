// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for CodePatcher against a recording protector.

use proptest::prelude::*;

use rampart_maps::Permissions;

use crate::error::{Errno, PatchError, ProtectionStage};
use crate::patcher::{CodePatcher, PatchMode, PatchPlan, RETURN_OPCODE};
use crate::support::test_utils::{ProtectCall, RecordingProtector};

use super::utils::region_over;

// =============================================================================
// apply_blanket()
// =============================================================================

#[test]
fn test_blanket_escalates_once_fills_and_restores_original() {
    let mut bytes = [0x55u8, 0x48, 0x89, 0xe5, 0x5d, 0xc3, 0x90, 0x00];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    let report = unsafe { patcher.apply_blanket(&region) }.expect("Failed to apply_blanket(..)");

    assert_eq!(
        patcher.protector().calls(),
        vec![
            ProtectCall {
                base: region.start(),
                len: 8,
                permissions: Permissions::READ_WRITE_EXECUTE
            },
            ProtectCall {
                base: region.start(),
                len: 8,
                permissions: Permissions::READ_EXECUTE
            },
        ]
    );
    assert!(bytes.iter().all(|&b| b == RETURN_OPCODE));
    assert_eq!(report.bytes_written, 8);
    assert_eq!(report.restored_to, Permissions::READ_EXECUTE);
    assert!(report.matched_offsets.is_empty());
    assert!(report.applied());
}

#[test]
fn test_blanket_restores_flags_bit_for_bit() {
    let mut bytes = [0x90u8; 16];
    let region = region_over(&mut bytes, "rwxp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    let report = unsafe { patcher.apply_blanket(&region) }.expect("Failed to apply_blanket(..)");

    let calls = patcher.protector().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].permissions, Permissions::READ_WRITE_EXECUTE);
    assert_eq!(calls[1].permissions.bits(), 7);
    assert_eq!(report.restored_to, Permissions::READ_WRITE_EXECUTE);
}

#[test]
fn test_blanket_execute_only_region_restored_without_read() {
    let mut bytes = [0x90u8; 4];
    let region = region_over(&mut bytes, "--xp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    unsafe { patcher.apply_blanket(&region) }.expect("Failed to apply_blanket(..)");

    let calls = patcher.protector().calls();
    assert_eq!(calls[1].permissions.bits(), Permissions::EXECUTE_BIT);
}

#[test]
fn test_blanket_escalation_failure_leaves_memory_untouched() {
    let mut bytes = [0x55u8, 0x48, 0x55, 0x90];
    let before = bytes;
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::failing_at(0, libc::EPERM));

    let result = unsafe { patcher.apply_blanket(&region) };

    assert_eq!(
        result,
        Err(PatchError::PermissionChangeFailed {
            stage: ProtectionStage::Escalate,
            errno: Errno(libc::EPERM)
        })
    );
    assert_eq!(bytes, before);
    assert_eq!(patcher.protector().call_count(), 1);
}

#[test]
fn test_blanket_restore_failure_is_reported() {
    let mut bytes = [0x55u8; 4];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::failing_at(1, libc::ENOMEM));

    let result = unsafe { patcher.apply_blanket(&region) };

    assert!(matches!(
        result,
        Err(PatchError::PermissionChangeFailed {
            stage: ProtectionStage::Restore,
            ..
        })
    ));
}

#[test]
fn test_blanket_is_idempotent() {
    let mut bytes = [0x55u8, 0x48, 0x55, 0x90];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    unsafe { patcher.apply_blanket(&region) }.expect("Failed to apply_blanket(..)");
    let once = bytes;
    unsafe { patcher.apply_blanket(&region) }.expect("Failed to apply_blanket(..)");

    assert_eq!(bytes, once);
}

// =============================================================================
// apply_targeted()
// =============================================================================

#[test]
fn test_targeted_replaces_prologue_bytes() {
    let mut bytes = [0x55u8, 0x48, 0x55, 0x90];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    let report = unsafe { patcher.apply_targeted(&region, 0x55, 0xC3) }
        .expect("Failed to apply_targeted(..)");

    assert_eq!(bytes, [0xC3, 0x48, 0xC3, 0x90]);
    assert_eq!(report.matched_offsets, vec![0, 2]);
    assert_eq!(report.bytes_written, 2);
    assert_eq!(
        report.mode,
        PatchMode::PatternTriggered {
            pattern_byte: 0x55,
            replacement_byte: 0xC3
        }
    );
}

#[test]
fn test_targeted_restores_read_execute_even_from_rwx() {
    let mut bytes = [0x55u8, 0x90];
    let region = region_over(&mut bytes, "rwxp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    let report = unsafe { patcher.apply_targeted(&region, 0x55, 0xC3) }
        .expect("Failed to apply_targeted(..)");

    let calls = patcher.protector().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].permissions, Permissions::READ_WRITE_EXECUTE);
    assert_eq!(calls[1].permissions, Permissions::READ_EXECUTE);
    assert_eq!(report.restored_to, Permissions::READ_EXECUTE);
}

#[test]
fn test_targeted_without_matches_still_restores() {
    let mut bytes = [0x48u8, 0x89, 0xe5];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    let report = unsafe { patcher.apply_targeted(&region, 0x55, 0xC3) }
        .expect("Failed to apply_targeted(..)");

    assert!(!report.applied());
    assert!(report.matched_offsets.is_empty());
    assert_eq!(patcher.protector().call_count(), 2);
    assert_eq!(bytes, [0x48, 0x89, 0xe5]);
}

#[test]
fn test_targeted_escalation_failure_leaves_memory_untouched() {
    let mut bytes = [0x55u8, 0x48, 0x55, 0x90];
    let before = bytes;
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::failing_at(0, libc::EPERM));

    let result = unsafe { patcher.apply_targeted(&region, 0x55, 0xC3) };

    assert!(matches!(
        result,
        Err(PatchError::PermissionChangeFailed {
            stage: ProtectionStage::Escalate,
            ..
        })
    ));
    assert_eq!(bytes, before);
}

#[test]
fn test_targeted_restore_failure_is_reported() {
    let mut bytes = [0x55u8, 0x48];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::failing_at(1, libc::EACCES));

    let result = unsafe { patcher.apply_targeted(&region, 0x55, 0xC3) };

    assert_eq!(
        result,
        Err(PatchError::PermissionChangeFailed {
            stage: ProtectionStage::Restore,
            errno: Errno(libc::EACCES)
        })
    );
}

#[test]
fn test_targeted_rejects_replacement_equal_to_pattern() {
    let mut bytes = [0x55u8, 0x48];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    let result = unsafe { patcher.apply_targeted(&region, 0x55, 0x55) };

    assert_eq!(result, Err(PatchError::ReplacementMatchesPattern(0x55)));
    assert_eq!(patcher.protector().call_count(), 0);
}

#[test]
fn test_targeted_twice_equals_once() {
    let mut bytes = [0x55u8, 0x48, 0x55, 0x90, 0x55];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    unsafe { patcher.apply_targeted(&region, 0x55, 0xC3) }.expect("Failed to apply_targeted(..)");
    let once = bytes;

    let second = unsafe { patcher.apply_targeted(&region, 0x55, 0xC3) }
        .expect("Failed to apply_targeted(..)");

    assert_eq!(bytes, once);
    assert!(second.matched_offsets.is_empty());
}

// =============================================================================
// apply()
// =============================================================================

#[test]
fn test_apply_dispatches_on_mode() {
    let mut bytes = [0x55u8, 0x48];
    let region = region_over(&mut bytes, "r-xp");
    let patcher = CodePatcher::new(RecordingProtector::new());

    let plan = PatchPlan {
        region: &region,
        mode: PatchMode::pattern_triggered(0x55, 0xCC).expect("Failed to pattern_triggered(..)"),
    };
    unsafe { patcher.apply(&plan) }.expect("Failed to apply(..)");
    assert_eq!(bytes, [0xCC, 0x48]);

    let plan = PatchPlan {
        region: &region,
        mode: PatchMode::Blanket { opcode: 0x90 },
    };
    unsafe { patcher.apply(&plan) }.expect("Failed to apply(..)");
    assert_eq!(bytes, [0x90, 0x90]);
}

#[test]
fn test_blanket_mode_defaults_to_return_opcode() {
    assert_eq!(PatchMode::blanket(), PatchMode::Blanket { opcode: 0xC3 });
}

proptest! {
    #[test]
    fn test_targeted_touches_exactly_the_matches(
        mut bytes in proptest::collection::vec(any::<u8>(), 1..256),
        pattern in any::<u8>(),
        replacement in any::<u8>()
    ) {
        prop_assume!(pattern != replacement);

        let before = bytes.clone();
        let expected: Vec<usize> = before
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == pattern)
            .map(|(i, _)| i)
            .collect();

        let region = region_over(&mut bytes, "r-xp");
        let patcher = CodePatcher::new(RecordingProtector::new());

        let report = unsafe { patcher.apply_targeted(&region, pattern, replacement) }
            .expect("Failed to apply_targeted(..)");

        prop_assert_eq!(&report.matched_offsets, &expected);
        for (i, (old, new)) in before.iter().zip(bytes.iter()).enumerate() {
            if expected.contains(&i) {
                prop_assert_eq!(*new, replacement);
            } else {
                prop_assert_eq!(new, old);
            }
        }
    }
}
