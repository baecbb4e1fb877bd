//! CLI command implementations.

pub mod check;
pub mod list;
pub mod show;
pub mod template;

use anyhow::{bail, Result};

use cpumap_boards::{ProfileId, ACTIVE_LIMIT_TRIGGER, ACTIVE_PROFILE};
use cpumap_core::TriggerEdge;

/// Profile named on the command line, or the compiled-in one.
pub(crate) fn profile_or_active(name: Option<&str>) -> Result<ProfileId> {
    let Some(name) = name else {
        return Ok(ACTIVE_PROFILE);
    };
    match ProfileId::from_name(name) {
        Some(profile) => Ok(profile),
        None => bail!("unknown profile: '{name}'. Use 'cpumap list' to see available profiles."),
    }
}

/// Trigger edge named on the command line, or the compiled-in one.
pub(crate) fn trigger_or_active(name: Option<&str>) -> Result<TriggerEdge> {
    let Some(name) = name else {
        return Ok(ACTIVE_LIMIT_TRIGGER);
    };
    match TriggerEdge::from_name(name) {
        Some(trigger) => Ok(trigger),
        None => bail!(
            "unknown trigger edge: '{name}' (expected any-edge, falling-edge or rising-edge)"
        ),
    }
}
