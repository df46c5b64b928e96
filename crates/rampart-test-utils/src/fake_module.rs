// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! FakeModule - A named executable mapping for end-to-end tests.
//!
//! Backed by a memfd so the kernel map shows a path
//! (`/memfd:<name> (deleted)`) that a fragment can match.

use std::ffi::CString;
use std::io;

/// An `r-x` shared mapping of a memfd holding test "code".
#[derive(Debug)]
pub struct FakeModule {
    base: *mut u8,
    len: usize,
    fd: libc::c_int,
}

impl FakeModule {
    /// Maps `code` at the start of a fresh page-aligned `r-x` mapping.
    ///
    /// Bytes past `code` are zero.
    pub fn new(name: &str, code: &[u8]) -> io::Result<Self> {
        let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
        let len = code.len().div_ceil(page).max(1) * page;
        let name = CString::new(name)?;

        let fd = unsafe { libc::memfd_create(name.as_ptr(), libc::MFD_CLOEXEC) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        if unsafe { libc::ftruncate(fd, len as libc::off_t) } != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(err);
        }

        let ptr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(err);
        }

        let module = Self {
            base: ptr as *mut u8,
            len,
            fd,
        };

        unsafe { core::ptr::copy_nonoverlapping(code.as_ptr(), module.base, code.len()) };

        let failed = unsafe {
            libc::mprotect(ptr, len, libc::PROT_READ | libc::PROT_EXEC)
        } != 0;

        if failed {
            return Err(io::Error::last_os_error());
        }

        Ok(module)
    }

    /// First address of the mapping.
    pub fn base(&self) -> usize {
        self.base as usize
    }

    /// Size of the mapping in bytes (whole pages).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies the current contents of the mapping.
    ///
    /// The mapping must still be readable.
    pub fn snapshot(&self) -> Vec<u8> {
        (0..self.len)
            .map(|offset| unsafe { self.base.add(offset).read_volatile() })
            .collect()
    }

    /// Permission string the kernel currently reports for the mapping.
    pub fn current_permissions(&self) -> Option<String> {
        let maps = std::fs::read_to_string("/proc/self/maps").ok()?;
        let start = format!("{:08x}-", self.base());

        maps.lines()
            .find(|line| line.starts_with(&start))
            .and_then(|line| line.split_whitespace().nth(1))
            .map(str::to_owned)
    }
}

impl Drop for FakeModule {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.base as *mut libc::c_void, self.len);
            libc::close(self.fd);
        }
    }
}
