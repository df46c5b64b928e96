// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! rampart_maps - Memory map introspection for the calling process.
//!
//! Reads the kernel-provided map of the current address space
//! (`/proc/self/maps` on Linux) as a lazy sequence of [`MappingRecord`]s and
//! locates the mappings that belong to a given module.
//!
//! The map is re-opened and re-read on every call. Nothing is cached: modules
//! can be loaded or unloaded between two scans.
//!
//! # Malformed lines
//!
//! A line that cannot be parsed is skipped and the scan continues. One bad
//! record never hides the records after it.
//!
//! # Example
//!
//! ```
//! use rampart_maps::{StaticMaps, TargetLocator};
//!
//! let maps = StaticMaps::from_lines([
//!     "7f0000-7f1000 r-xp 00000000 08:01 1234 /lib/libjdwp.so",
//!     "7f1000-7f2000 rw-p 00001000 08:01 1234 /lib/libjdwp.so",
//! ]);
//!
//! let locator = TargetLocator::new(&maps);
//!
//! assert!(locator.is_present("jdwp").unwrap());
//!
//! let regions = locator.executable_regions_of("jdwp").unwrap();
//! assert_eq!(regions.len(), 1);
//! assert_eq!(regions[0].start(), 0x7f0000);
//! ```

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod error;
mod locator;
mod reader;
mod record;

pub use error::{MapsError, ParseError};
pub use locator::{MatchingRecords, TargetLocator, TargetMappings, TargetRegion};
pub use reader::{MappingReader, MapsSource, ProcMaps, StaticMaps, read_mappings};
pub use record::{MappingRecord, Permissions};
