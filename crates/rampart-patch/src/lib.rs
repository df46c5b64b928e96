// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! rampart_patch - In-place patching of executable memory.
//!
//! # Building blocks
//!
//! - [`MemoryWindow`]: a `(base, len)` view over live memory. Creating one is
//!   `unsafe`; every byte access through it is bounds-checked. No other code
//!   in the workspace does raw address arithmetic.
//! - [`PageProtector`]: the page-permission primitive (`mprotect` on Unix,
//!   [`Mprotect`]).
//! - [`ProtectionScope`]: escalates a window to `rwx` on acquisition and
//!   restores the requested permissions on release, or on drop if release
//!   was never reached.
//! - [`SignatureScanner`]: finds offsets of a single-byte function prologue
//!   (`push rbp`, `0x55`, on x86-64).
//! - [`CodePatcher`]: blanket (fill the whole region with `ret`) and
//!   targeted (replace every prologue byte with `ret`) patches.
//!
//! # Ordering
//!
//! Escalation must succeed before any byte is touched. If it fails, the
//! patch aborts with [`PatchError::PermissionChangeFailed`] and memory is left
//! untouched. Restoration is attempted on every path, including a patch that
//! matched nothing.
//!
//! # Concurrency
//!
//! Other threads executing inside the patched range are not synchronized
//! with. Patching is meant for code that is idle at the time of the call.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

#[cfg(any(test, feature = "test-utils"))]
pub mod support;

mod error;
mod patcher;
mod protect;
mod scanner;
mod scope;
mod window;

pub use error::{Errno, PatchError, ProtectionStage};
pub use patcher::{CodePatcher, PatchMode, PatchPlan, PatchReport, RETURN_OPCODE};
#[cfg(unix)]
pub use protect::Mprotect;
pub use protect::PageProtector;
pub use scanner::{EntryPoints, PUSH_RBP, SignatureScanner, find_entry_points};
pub use scope::ProtectionScope;
pub use window::MemoryWindow;
