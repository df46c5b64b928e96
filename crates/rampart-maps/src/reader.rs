// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! MappingReader - Lazy, forward-only scan over a memory map source.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::error::{MapsError, ParseError};
use crate::record::MappingRecord;

/// A source of memory map text, re-opened on every scan.
pub trait MapsSource {
    /// Reader over the map text.
    type Reader<'a>: BufRead
    where
        Self: 'a;

    /// Opens the source for a fresh scan.
    fn open(&self) -> Result<Self::Reader<'_>, MapsError>;
}

/// The kernel's live map of the current process.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProcMaps {
    path: PathBuf,
}

impl ProcMaps {
    /// Default location of the current process map.
    pub const SELF_MAPS: &'static str = "/proc/self/maps";

    /// Source reading `/proc/self/maps`.
    pub fn current() -> Self {
        Self::at(Self::SELF_MAPS)
    }

    /// Source reading a map file at an arbitrary path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ProcMaps {
    fn default() -> Self {
        Self::current()
    }
}

impl MapsSource for ProcMaps {
    type Reader<'a>
        = BufReader<File>
    where
        Self: 'a;

    fn open(&self) -> Result<Self::Reader<'_>, MapsError> {
        let file = File::open(&self.path).map_err(|source| MapsError::EnvironmentUnavailable {
            path: self.path.clone(),
            source,
        })?;

        Ok(BufReader::new(file))
    }
}

/// Map text held in memory, mostly for tests and replay.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StaticMaps {
    contents: String,
}

impl StaticMaps {
    /// Wraps raw map text.
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }

    /// Joins individual lines into map text.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut contents = String::new();
        for line in lines {
            contents.push_str(line.as_ref());
            contents.push('\n');
        }
        Self { contents }
    }

    /// Raw map text.
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl MapsSource for StaticMaps {
    type Reader<'a>
        = Cursor<&'a [u8]>
    where
        Self: 'a;

    fn open(&self) -> Result<Self::Reader<'_>, MapsError> {
        Ok(Cursor::new(self.contents.as_bytes()))
    }
}

/// Iterator over the records of one scan.
///
/// Malformed lines are skipped. A read error ends the scan.
#[derive(Debug)]
pub struct MappingReader<R> {
    lines: io::Split<R>,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> MappingReader<R> {
    /// Wraps a reader positioned at the start of the map text.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.split(b'\n'),
            line_number: 0,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for MappingReader<R> {
    type Item = MappingRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => {
                    tracing::warn!(
                        line = self.line_number + 1,
                        error = %err,
                        "memory map read failed, ending scan"
                    );
                    self.finished = true;
                    return None;
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };

            self.line_number += 1;

            match parse_line(&line) {
                Ok(record) => return Some(record),
                Err(err) => {
                    tracing::warn!(
                        line = self.line_number,
                        error = %err,
                        "skipping malformed memory map line"
                    );
                }
            }
        }

        None
    }
}

fn parse_line(line: &[u8]) -> Result<MappingRecord, ParseError> {
    let line = core::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;
    line.parse()
}

/// Opens `source` and returns a lazy scan over its records.
pub fn read_mappings<S: MapsSource + ?Sized>(
    source: &S,
) -> Result<MappingReader<S::Reader<'_>>, MapsError> {
    Ok(MappingReader::new(source.open()?))
}
