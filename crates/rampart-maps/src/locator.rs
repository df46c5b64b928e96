// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! TargetLocator - Finds the mappings of a module by name fragment.
//!
//! Only executable mappings become [`TargetRegion`]s. Read-only data,
//! writable data and zero-permission guard mappings of the same module are
//! reported separately and must never be patched: touching a `---p` guard
//! mapping beyond one page raises SIGBUS.

use crate::error::MapsError;
use crate::reader::{MappingReader, MapsSource, read_mappings};
use crate::record::{MappingRecord, Permissions};

/// An executable mapping that belongs to the target module.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TargetRegion(MappingRecord);

impl TargetRegion {
    /// The underlying record.
    pub fn record(&self) -> &MappingRecord {
        &self.0
    }

    /// First address of the region.
    pub fn start(&self) -> usize {
        self.0.start()
    }

    /// One past the last address of the region.
    pub fn end(&self) -> usize {
        self.0.end()
    }

    /// Size of the region in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, see [`MappingRecord::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Permissions observed when the region was read from the map.
    pub fn permissions(&self) -> Permissions {
        self.0.permissions()
    }

    /// Backing path of the region.
    pub fn backing_path(&self) -> Option<&str> {
        self.0.backing_path()
    }
}

impl TryFrom<MappingRecord> for TargetRegion {
    type Error = MappingRecord;

    /// Accepts executable records only; hands back the record otherwise.
    fn try_from(record: MappingRecord) -> Result<Self, Self::Error> {
        if record.is_executable() {
            Ok(Self(record))
        } else {
            Err(record)
        }
    }
}

/// All mappings of a target from one scan, split by execute permission.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TargetMappings {
    /// Code mappings, safe to hand to a patcher.
    pub executable: Vec<TargetRegion>,
    /// Present but non-executable mappings. Never patched.
    pub non_executable: Vec<MappingRecord>,
}

impl TargetMappings {
    /// Returns true if any mapping of the target was seen.
    pub fn is_present(&self) -> bool {
        !self.executable.is_empty() || !self.non_executable.is_empty()
    }
}

/// Records of one scan whose backing path contains a fragment.
#[derive(Debug)]
pub struct MatchingRecords<'f, R> {
    records: MappingReader<R>,
    fragment: &'f str,
}

impl<R: std::io::BufRead> Iterator for MatchingRecords<'_, R> {
    type Item = MappingRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let fragment = self.fragment;
        self.records.find(|record| record.belongs_to(fragment))
    }
}

/// Locates the mappings of a module in a [`MapsSource`].
///
/// Every query performs a fresh scan.
#[derive(Debug)]
pub struct TargetLocator<'s, S: ?Sized> {
    source: &'s S,
}

impl<'s, S: MapsSource + ?Sized + 's> TargetLocator<'s, S> {
    /// Creates a locator over `source`.
    pub fn new(source: &'s S) -> Self {
        Self { source }
    }

    /// Lazily yields the records whose backing path contains `fragment`.
    pub fn records_of<'f>(
        &self,
        fragment: &'f str,
    ) -> Result<MatchingRecords<'f, S::Reader<'s>>, MapsError> {
        Ok(MatchingRecords {
            records: read_mappings(self.source)?,
            fragment,
        })
    }

    /// Returns true as soon as one mapping of the target is seen.
    pub fn is_present(&self, fragment: &str) -> Result<bool, MapsError> {
        let found = self.records_of(fragment)?.next();

        if let Some(record) = &found {
            tracing::debug!(
                fragment,
                start = record.start(),
                end = record.end(),
                "target mapping found"
            );
        }

        Ok(found.is_some())
    }

    /// Collects every mapping of the target, split by execute permission.
    pub fn classify(&self, fragment: &str) -> Result<TargetMappings, MapsError> {
        let mut mappings = TargetMappings::default();

        for record in self.records_of(fragment)? {
            tracing::debug!(
                fragment,
                start = record.start(),
                end = record.end(),
                permissions = %record.permissions(),
                "target mapping found"
            );

            match TargetRegion::try_from(record) {
                Ok(region) => mappings.executable.push(region),
                Err(record) => mappings.non_executable.push(record),
            }
        }

        Ok(mappings)
    }

    /// Executable mappings of the target only.
    pub fn executable_regions_of(&self, fragment: &str) -> Result<Vec<TargetRegion>, MapsError> {
        Ok(self.classify(fragment)?.executable)
    }
}
