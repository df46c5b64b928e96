// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! MappingRecord - One parsed line of the memory map.
//!
//! Line format (fields separated by runs of spaces):
//!
//! ```text
//! start-end perms offset dev inode [path]
//! 7f0000-7f1000 r-xp 00000000 08:01 1234 /lib/libjdwp.so
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::ParseError;

/// Access flags of a mapping.
///
/// Only the first three flag characters are meaningful. The fourth
/// (private/shared) is validated but not retained.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Permissions {
    /// `r` flag.
    pub read: bool,
    /// `w` flag.
    pub write: bool,
    /// `x` flag.
    pub execute: bool,
}

impl Permissions {
    /// Bit set when `read` is granted.
    pub const READ_BIT: u8 = 1;
    /// Bit set when `write` is granted.
    pub const WRITE_BIT: u8 = 2;
    /// Bit set when `execute` is granted.
    pub const EXECUTE_BIT: u8 = 4;

    /// No access (`---`).
    pub const NONE: Self = Self::new(false, false, false);
    /// `r-x`, the usual code page.
    pub const READ_EXECUTE: Self = Self::new(true, false, true);
    /// `rwx`, required while patching code.
    pub const READ_WRITE_EXECUTE: Self = Self::new(true, true, true);

    /// Creates permissions from individual flags.
    pub const fn new(read: bool, write: bool, execute: bool) -> Self {
        Self {
            read,
            write,
            execute,
        }
    }

    /// Parses a four-character flag string such as `r-xp`.
    ///
    /// A flag is granted only when its letter is present at its position;
    /// any other printable character means "not granted".
    pub fn parse(flags: &str) -> Result<Self, ParseError> {
        let bytes = flags.as_bytes();

        if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_graphic) {
            return Err(ParseError::InvalidPermissions);
        }

        Ok(Self::new(bytes[0] == b'r', bytes[1] == b'w', bytes[2] == b'x'))
    }

    /// Returns the flags as a bitmask (`r` = 1, `w` = 2, `x` = 4).
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.read {
            bits |= Self::READ_BIT;
        }
        if self.write {
            bits |= Self::WRITE_BIT;
        }
        if self.execute {
            bits |= Self::EXECUTE_BIT;
        }
        bits
    }

    /// Rebuilds flags from a bitmask produced by [`Permissions::bits`].
    pub const fn from_bits(bits: u8) -> Self {
        Self::new(
            bits & Self::READ_BIT != 0,
            bits & Self::WRITE_BIT != 0,
            bits & Self::EXECUTE_BIT != 0,
        )
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |granted: bool, c: char| if granted { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(self.read, 'r'),
            flag(self.write, 'w'),
            flag(self.execute, 'x')
        )
    }
}

/// A single mapped region of the address space.
///
/// Invariant: `start < end`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MappingRecord {
    start: usize,
    end: usize,
    permissions: Permissions,
    offset: u64,
    device: String,
    inode: u64,
    backing_path: Option<String>,
}

impl MappingRecord {
    /// First address of the mapping.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last address of the mapping.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Size of the mapping in bytes. Never zero.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false: records with an empty range are rejected at parse time.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Access flags reported for the mapping.
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Returns true if the mapping carries the `x` flag.
    pub fn is_executable(&self) -> bool {
        self.permissions.execute
    }

    /// Offset into the backing object.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Device of the backing object (`major:minor`).
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Inode of the backing object, 0 for anonymous mappings.
    pub fn inode(&self) -> u64 {
        self.inode
    }

    /// File or pseudo-name backing the mapping, if any.
    pub fn backing_path(&self) -> Option<&str> {
        self.backing_path.as_deref()
    }

    /// Returns true if the backing path contains `fragment`.
    ///
    /// An empty fragment never matches.
    pub fn belongs_to(&self, fragment: &str) -> bool {
        !fragment.is_empty()
            && self
                .backing_path
                .as_deref()
                .is_some_and(|path| path.contains(fragment))
    }
}

impl FromStr for MappingRecord {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (range, rest) = next_field(line).ok_or(ParseError::MissingField("address range"))?;
        let (perms, rest) = next_field(rest).ok_or(ParseError::MissingField("permissions"))?;
        let (offset, rest) = next_field(rest).ok_or(ParseError::MissingField("offset"))?;
        let (device, rest) = next_field(rest).ok_or(ParseError::MissingField("device"))?;
        let (inode, rest) = next_field(rest).ok_or(ParseError::MissingField("inode"))?;

        let (start, end) = range.split_once('-').ok_or(ParseError::InvalidAddress)?;
        let start = usize::from_str_radix(start, 16).map_err(|_| ParseError::InvalidAddress)?;
        let end = usize::from_str_radix(end, 16).map_err(|_| ParseError::InvalidAddress)?;

        if start >= end {
            return Err(ParseError::EmptyRange { start, end });
        }

        let permissions = Permissions::parse(perms)?;
        let offset =
            u64::from_str_radix(offset, 16).map_err(|_| ParseError::InvalidNumber("offset"))?;

        if !device.contains(':') {
            return Err(ParseError::InvalidNumber("device"));
        }

        let inode = inode
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidNumber("inode"))?;

        // The path is the remainder of the line and may contain spaces.
        let path = rest.trim();
        let backing_path = (!path.is_empty()).then(|| path.to_owned());

        Ok(Self {
            start,
            end,
            permissions,
            offset,
            device: device.to_owned(),
            inode,
            backing_path,
        })
    }
}

/// Splits off the next whitespace-delimited field.
fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }

    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some(s.split_at(end))
}
