// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for rampart-maps.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a whole scan.
#[derive(Debug, Error)]
pub enum MapsError {
    /// The process-information source could not be opened.
    #[error("memory map source {} is unavailable: {source}", path.display())]
    EnvironmentUnavailable {
        /// Path of the source that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors from parsing a single map line.
///
/// Never surfaced by [`crate::MappingReader`]: the offending line is skipped.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ParseError {
    /// The line ended before the named field.
    #[error("missing {0} field")]
    MissingField(&'static str),

    /// The address range is not `start-end` in hex.
    #[error("invalid address range")]
    InvalidAddress,

    /// `start` is not below `end`.
    #[error("empty address range {start:#x}-{end:#x}")]
    EmptyRange {
        /// Parsed start address.
        start: usize,
        /// Parsed end address.
        end: usize,
    },

    /// The permission field is not exactly four flag characters.
    #[error("invalid permission flags")]
    InvalidPermissions,

    /// The named numeric field is not valid hex or decimal.
    #[error("invalid {0} field")]
    InvalidNumber(&'static str),

    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}
