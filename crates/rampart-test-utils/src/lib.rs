// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for Rampart crates.
//!
//! ## License
//!
//! GPL-3.0-only

#[cfg(target_os = "linux")]
mod fake_module;
#[cfg(target_os = "linux")]
mod seccomp;
mod subprocess;

#[cfg(target_os = "linux")]
pub use fake_module::FakeModule;
#[cfg(target_os = "linux")]
pub use seccomp::{block_mprotect, is_seccomp_available};
pub use subprocess::run_test_as_subprocess;
