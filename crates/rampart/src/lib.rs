// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! rampart - In-process defence against debugging agents.
//!
//! Detects whether a debugging agent (by default the JDWP agent,
//! `libjdwp.so`) is mapped into the current process and, depending on the
//! chosen [`Strategy`], terminates the process or disables the agent by
//! patching its code in place.
//!
//! # Strategies
//!
//! | strategy                    | on detection                                          |
//! |-----------------------------|-------------------------------------------------------|
//! | [`Strategy::PresenceCheck`] | terminate                                             |
//! | [`Strategy::Blanket`]       | overwrite every executable byte with `ret`            |
//! | [`Strategy::Targeted`]      | overwrite every `push rbp` with `ret`; terminate if none was found |
//!
//! Non-executable mappings of the agent are never modified.
//!
//! # Host entry points
//!
//! [`presence_protection`], [`blanket_protection`] and
//! [`targeted_protection`] take no arguments and return nothing. Returning
//! means "safe to continue". Any other result terminates the process with a
//! nonzero [`TerminationCode`]: continuing with an uncertain protection state
//! is considered worse than stopping.
//!
//! # Testing without touching memory
//!
//! [`Protector`] accepts any [`MapsSource`](rampart_maps::MapsSource) and
//! [`PageProtector`](rampart_patch::PageProtector) and reports a
//! [`ProtectionOutcome`] instead of exiting.
//!
//! ```
//! use rampart::{ProtectionConfig, ProtectionOutcome, Protector, Strategy};
//! use rampart_maps::StaticMaps;
//! use rampart_patch::Mprotect;
//!
//! let maps = StaticMaps::from_lines([
//!     "00400000-00452000 r-xp 00000000 08:02 173521 /usr/bin/java",
//! ]);
//!
//! // SAFETY: the source reports no mapping of the target, nothing is patched.
//! let protector = unsafe { Protector::new(maps, Mprotect, ProtectionConfig::builtin()) }.unwrap();
//!
//! assert!(matches!(
//!     protector.evaluate(Strategy::Targeted),
//!     ProtectionOutcome::NotPresent
//! ));
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod config;
#[cfg(unix)]
mod entry;
mod error;
mod outcome;
mod protector;

pub use config::ProtectionConfig;
#[cfg(unix)]
pub use entry::{
    blanket_protection, enforce, enforce_with, presence_protection, targeted_protection, terminate,
};
pub use error::{ProtectError, TerminationCode};
pub use outcome::ProtectionOutcome;
pub use protector::{Protector, Strategy};
