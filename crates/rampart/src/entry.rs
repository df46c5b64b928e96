// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Host entry points.
//!
//! Each entry point either returns (safe to continue) or terminates the
//! process. There is no error value for the host to inspect.

use crate::config::ProtectionConfig;
use crate::error::TerminationCode;
use crate::protector::{Protector, Strategy};

/// Terminates the process if the JDWP agent is mapped.
pub fn presence_protection() {
    enforce(Strategy::PresenceCheck);
}

/// Overwrites the target's code with `ret`; terminates on failure.
pub fn blanket_protection() {
    enforce(Strategy::Blanket);
}

/// Overwrites the target's function prologues with `ret`; terminates on
/// failure or if no prologue was found.
pub fn targeted_protection() {
    enforce(Strategy::Targeted);
}

/// Runs `strategy` with [`ProtectionConfig::builtin`].
pub fn enforce(strategy: Strategy) {
    enforce_with(strategy, ProtectionConfig::builtin());
}

/// Runs `strategy` with `config` against the live process.
pub fn enforce_with(strategy: Strategy, config: ProtectionConfig) {
    let protector = match Protector::current_process(config) {
        Ok(protector) => protector,
        Err(err) => {
            tracing::error!(error = %err, "protection cannot start");
            terminate(err.termination_code());
        }
    };

    let outcome = protector.evaluate(strategy);

    if let Some(code) = outcome.termination_code() {
        tracing::error!(
            ?strategy,
            ?outcome,
            status = code.status(),
            "protection failed, terminating"
        );
        terminate(code);
    }
}

/// Exits the process with `code`.
pub fn terminate(code: TerminationCode) -> ! {
    std::process::exit(code.status())
}
