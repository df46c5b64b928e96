// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Protector - Detect-and-respond over one fresh scan of the memory map.
//!
//! All three strategies share one locator; they differ only in what they
//! do once the target is found.

use rampart_maps::{MapsSource, TargetLocator, TargetMappings};
use rampart_patch::{CodePatcher, PageProtector, PatchMode, PatchPlan, PatchReport};

use crate::config::ProtectionConfig;
use crate::error::ProtectError;
use crate::outcome::ProtectionOutcome;

/// Response to a detected target.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// Report the target's presence; never patch.
    PresenceCheck,
    /// Overwrite every executable byte of the target.
    Blanket,
    /// Overwrite only the prologue bytes of the target. Patching nothing is
    /// a failure.
    Targeted,
}

/// Runs strategies against a map source and a page protector.
#[derive(Debug)]
pub struct Protector<S, P> {
    source: S,
    patcher: CodePatcher<P>,
    config: ProtectionConfig,
}

#[cfg(unix)]
impl Protector<rampart_maps::ProcMaps, rampart_patch::Mprotect> {
    /// Protector over the live map of this process, using `mprotect`.
    pub fn current_process(config: ProtectionConfig) -> Result<Self, ProtectError> {
        let source = rampart_maps::ProcMaps::at(config.maps_path.clone());

        // SAFETY: regions are taken from the kernel's map of this very
        // process, re-read right before each patch.
        unsafe { Self::new(source, rampart_patch::Mprotect, config) }
    }
}

impl<S: MapsSource, P: PageProtector> Protector<S, P> {
    /// Creates a protector after validating `config`.
    ///
    /// # Safety
    ///
    /// Every executable mapping `source` reports for the configured fragment
    /// must be a live mapping of the calling process that no Rust reference
    /// aliases. The patch strategies write to those addresses.
    pub unsafe fn new(
        source: S,
        protector: P,
        config: ProtectionConfig,
    ) -> Result<Self, ProtectError> {
        config.validate()?;

        Ok(Self {
            source,
            patcher: CodePatcher::new(protector),
            config,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ProtectionConfig {
        &self.config
    }

    /// The patcher, and through it the page protector.
    pub fn patcher(&self) -> &CodePatcher<P> {
        &self.patcher
    }

    /// Runs `strategy` once. Failures are folded into
    /// [`ProtectionOutcome::Failed`].
    pub fn evaluate(&self, strategy: Strategy) -> ProtectionOutcome {
        let result = match strategy {
            Strategy::PresenceCheck => self.check_presence(),
            Strategy::Blanket => self.disable_blanket(),
            Strategy::Targeted => self.disable_targeted(),
        };

        result.unwrap_or_else(ProtectionOutcome::Failed)
    }

    fn check_presence(&self) -> Result<ProtectionOutcome, ProtectError> {
        let fragment = self.config.target_fragment.as_str();

        if TargetLocator::new(&self.source).is_present(fragment)? {
            tracing::warn!(fragment, "debugging agent is mapped");
            return Ok(ProtectionOutcome::Detected);
        }

        Ok(ProtectionOutcome::NotPresent)
    }

    fn disable_blanket(&self) -> Result<ProtectionOutcome, ProtectError> {
        let mode = PatchMode::Blanket {
            opcode: self.config.return_opcode,
        };

        match self.disable(mode)? {
            Some(reports) => Ok(ProtectionOutcome::Disabled(reports)),
            None => Ok(ProtectionOutcome::NotPresent),
        }
    }

    fn disable_targeted(&self) -> Result<ProtectionOutcome, ProtectError> {
        let mode = PatchMode::pattern_triggered(
            self.config.pattern_byte,
            self.config.replacement_byte,
        )?;

        let Some(reports) = self.disable(mode)? else {
            return Ok(ProtectionOutcome::NotPresent);
        };

        // Checked over all regions: a module is disabled if any of its code was hit.
        if !reports.iter().any(PatchReport::applied) {
            return Err(ProtectError::PatchNotApplied {
                fragment: self.config.target_fragment.clone(),
            });
        }

        Ok(ProtectionOutcome::Disabled(reports))
    }

    /// Patches every executable region of the target with `mode`.
    ///
    /// Returns `None` if the target is not mapped.
    fn disable(&self, mode: PatchMode) -> Result<Option<Vec<PatchReport>>, ProtectError> {
        let fragment = self.config.target_fragment.as_str();
        let TargetMappings {
            executable,
            non_executable,
        } = TargetLocator::new(&self.source).classify(fragment)?;

        if executable.is_empty() && non_executable.is_empty() {
            return Ok(None);
        }

        for record in &non_executable {
            tracing::debug!(
                start = record.start(),
                end = record.end(),
                permissions = %record.permissions(),
                "skipping non-executable target mapping"
            );
        }

        if executable.is_empty() {
            tracing::warn!(fragment, "target is mapped without executable regions");
        }

        let mut reports = Vec::with_capacity(executable.len());

        for region in &executable {
            let plan = PatchPlan { region, mode };

            // SAFETY: guaranteed by the caller of `Protector::new`.
            reports.push(unsafe { self.patcher.apply(&plan) }?);
        }

        Ok(Some(reports))
    }
}
