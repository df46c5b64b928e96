// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use libseccomp::{ScmpAction, ScmpFilterContext, ScmpSyscall};

/// Check if seccomp is available by forking a child process that attempts to load a filter.
/// Returns true if seccomp works, false if running under QEMU or seccomp is unavailable.
pub fn is_seccomp_available() -> bool {
    match unsafe { libc::fork() } {
        -1 => {
            eprintln!("Failed to fork for seccomp check");
            false
        }
        0 => {
            let result = ScmpFilterContext::new(ScmpAction::Allow).and_then(|filter| filter.load());

            // Skip the parent's atexit handlers.
            unsafe { libc::_exit(if result.is_ok() { 0 } else { 1 }) }
        }
        child_pid => {
            let mut status: libc::c_int = 0;
            unsafe {
                libc::waitpid(child_pid, &mut status, 0);
            }

            libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0
        }
    }
}

fn block_syscall(name: &str) {
    let mut filter = ScmpFilterContext::new(ScmpAction::Allow).expect("Failed to create filter");
    filter
        .add_rule(
            ScmpAction::Errno(libc::EPERM),
            ScmpSyscall::from_name(name).expect("Failed to from_name(..)"),
        )
        .expect("Failed to add rule");
    filter.load().expect("Failed to load seccomp filter");
}

/// Makes every later `mprotect` in this process fail with `EPERM`.
pub fn block_mprotect() {
    block_syscall("mprotect");
}
