// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::io;

use rampart_maps::MapsError;
use rampart_patch::{Errno, PatchError, ProtectionStage};

use crate::error::{ProtectError, TerminationCode};

#[test]
fn test_termination_status_values() {
    assert_eq!(TerminationCode::DebuggerDetected.status(), 1);
    assert_eq!(TerminationCode::EnvironmentUnavailable.status(), 2);
    assert_eq!(TerminationCode::PermissionChangeFailed.status(), 3);
    assert_eq!(TerminationCode::PatchNotApplied.status(), 4);
    assert_eq!(TerminationCode::InvalidConfig.status(), 5);
}

#[test]
fn test_termination_code_mapping() {
    let unavailable = ProtectError::from(MapsError::EnvironmentUnavailable {
        path: "/proc/self/maps".into(),
        source: io::Error::from(io::ErrorKind::NotFound),
    });
    assert_eq!(
        unavailable.termination_code(),
        TerminationCode::EnvironmentUnavailable
    );

    let cases = [
        (
            PatchError::PermissionChangeFailed {
                stage: ProtectionStage::Restore,
                errno: Errno(1),
            },
            TerminationCode::PermissionChangeFailed,
        ),
        (
            PatchError::InvalidWindow { base: 0, len: 0 },
            TerminationCode::PatchNotApplied,
        ),
        (
            PatchError::OutOfBounds { offset: 8, len: 4 },
            TerminationCode::PatchNotApplied,
        ),
        (
            PatchError::ReplacementMatchesPattern(0x55),
            TerminationCode::InvalidConfig,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(ProtectError::from(err).termination_code(), expected, "{err:?}");
    }

    let not_applied = ProtectError::PatchNotApplied {
        fragment: "jdwp".to_owned(),
    };
    assert_eq!(
        not_applied.termination_code(),
        TerminationCode::PatchNotApplied
    );
}
