//! Build-time profile selection.
//!
//! The active profile and limit trigger edge come from Cargo features. Each
//! has to be selected exactly once; the table below is resolved during
//! compilation, so a missing, conflicting or inconsistent selection stops the
//! build instead of producing a firmware table.

use std::fmt;

use serde::{Deserialize, Serialize};

use cpumap_core::{resolve, BoardMap, ConfigError, ResolvedTable, TriggerEdge};

use crate::mega2560;

/// A supported board profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProfileId {
    #[serde(rename = "cpu-map-2560-initial")]
    Mega2560Initial,
}

impl ProfileId {
    pub const ALL: [ProfileId; 1] = [ProfileId::Mega2560Initial];

    /// Name of the profile; also the name of its Cargo feature.
    pub const fn name(self) -> &'static str {
        match self {
            ProfileId::Mega2560Initial => mega2560::NAME,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ProfileId::Mega2560Initial => "Arduino Mega 2560, initial pin layout",
        }
    }

    pub fn from_name(name: &str) -> Option<ProfileId> {
        ProfileId::ALL.into_iter().find(|p| p.name() == name)
    }

    pub const fn board_map(self, limit_trigger: TriggerEdge) -> BoardMap<'static> {
        match self {
            ProfileId::Mega2560Initial => mega2560::board_map(limit_trigger),
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the single enabled profile.
///
/// Selection happens in constant evaluation, so an empty or conflicting
/// feature set stops the build:
///
/// ```compile_fail
/// use cpumap_boards::{select_profile, ProfileId};
///
/// const NONE_ENABLED: ProfileId = match select_profile(&[]) {
///     Ok(profile) => profile,
///     Err(err) => panic!("{}", err.summary()),
/// };
///
/// fn main() {
///     let _ = NONE_ENABLED;
/// }
/// ```
pub const fn select_profile(enabled: &[ProfileId]) -> Result<ProfileId, ConfigError> {
    match enabled {
        [profile] => Ok(*profile),
        [] => Err(ConfigError::NothingSelected { axis: "profile" }),
        _ => Err(ConfigError::ConflictingSelection {
            axis: "profile",
            count: enabled.len(),
        }),
    }
}

/// Pick the single enabled limit trigger edge.
pub const fn select_trigger(enabled: &[TriggerEdge]) -> Result<TriggerEdge, ConfigError> {
    match enabled {
        [trigger] => Ok(*trigger),
        [] => Err(ConfigError::NothingSelected {
            axis: "limit trigger",
        }),
        _ => Err(ConfigError::ConflictingSelection {
            axis: "limit trigger",
            count: enabled.len(),
        }),
    }
}

const ENABLED_PROFILES: &[ProfileId] = &[
    #[cfg(feature = "cpu-map-2560-initial")]
    ProfileId::Mega2560Initial,
];

const ENABLED_TRIGGERS: &[TriggerEdge] = &[
    #[cfg(feature = "limit-any-edge")]
    TriggerEdge::AnyEdge,
    #[cfg(feature = "limit-falling-edge")]
    TriggerEdge::FallingEdge,
    #[cfg(feature = "limit-rising-edge")]
    TriggerEdge::RisingEdge,
];

/// Profile selected by Cargo features.
pub const ACTIVE_PROFILE: ProfileId = match select_profile(ENABLED_PROFILES) {
    Ok(profile) => profile,
    Err(err) => panic!("{}", err.summary()),
};

/// Limit trigger edge selected by Cargo features.
pub const ACTIVE_LIMIT_TRIGGER: TriggerEdge = match select_trigger(ENABLED_TRIGGERS) {
    Ok(trigger) => trigger,
    Err(err) => panic!("{}", err.summary()),
};

pub const ACTIVE_MAP: BoardMap<'static> = ACTIVE_PROFILE.board_map(ACTIVE_LIMIT_TRIGGER);

/// The binding table the firmware is built against.
///
/// Any inconsistency in the selected map is a compile error:
///
/// ```
/// use cpumap_boards::ProfileId;
/// use cpumap_core::{resolve, BoardMap, ResolvedTable, TriggerEdge};
///
/// const MAP: BoardMap<'static> = ProfileId::Mega2560Initial.board_map(TriggerEdge::RisingEdge);
/// const TABLE: ResolvedTable<'static> = match resolve(&MAP) {
///     Ok(table) => table,
///     Err(err) => panic!("{}", err.summary()),
/// };
///
/// fn main() {
///     assert_eq!(TABLE.spindle_pwm.tccrb_init, 0x1A);
/// }
/// ```
///
/// ```compile_fail
/// use cpumap_boards::ProfileId;
/// use cpumap_core::{resolve, BoardMap, ResolvedTable, TriggerEdge};
///
/// const NO_PWM: BoardMap<'static> = BoardMap {
///     spindle_pwm: None,
///     ..ProfileId::Mega2560Initial.board_map(TriggerEdge::AnyEdge)
/// };
/// const TABLE: ResolvedTable<'static> = match resolve(&NO_PWM) {
///     Ok(table) => table,
///     Err(err) => panic!("{}", err.summary()),
/// };
///
/// fn main() {
///     let _ = TABLE.name;
/// }
/// ```
pub const ACTIVE_TABLE: ResolvedTable<'static> = match resolve(&ACTIVE_MAP) {
    Ok(table) => table,
    Err(err) => panic!("{}", err.summary()),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_profile() {
        assert_eq!(
            select_profile(&[ProfileId::Mega2560Initial]),
            Ok(ProfileId::Mega2560Initial)
        );
        assert_eq!(
            select_profile(&[]),
            Err(ConfigError::NothingSelected { axis: "profile" })
        );
        assert_eq!(
            select_profile(&[ProfileId::Mega2560Initial, ProfileId::Mega2560Initial]),
            Err(ConfigError::ConflictingSelection {
                axis: "profile",
                count: 2
            })
        );
    }

    #[test]
    fn exactly_one_trigger() {
        assert_eq!(
            select_trigger(&[TriggerEdge::RisingEdge]),
            Ok(TriggerEdge::RisingEdge)
        );
        assert!(matches!(
            select_trigger(&[]),
            Err(ConfigError::NothingSelected { .. })
        ));
        assert!(matches!(
            select_trigger(&[TriggerEdge::AnyEdge, TriggerEdge::FallingEdge]),
            Err(ConfigError::ConflictingSelection { count: 2, .. })
        ));
    }

    #[test]
    fn selection_works_in_constant_evaluation() {
        const NONE: bool = select_profile(&[]).is_err();
        assert!(NONE);
    }

    #[test]
    fn active_selection_matches_enabled_features() {
        assert_eq!(ENABLED_PROFILES, &[ACTIVE_PROFILE]);
        assert_eq!(ENABLED_TRIGGERS, &[ACTIVE_LIMIT_TRIGGER]);
        assert_eq!(ACTIVE_TABLE.name, ACTIVE_PROFILE.name());
    }

    #[test]
    fn names_round_trip() {
        for profile in ProfileId::ALL {
            assert_eq!(ProfileId::from_name(profile.name()), Some(profile));
            assert_eq!(profile.to_string(), profile.name());
        }
        assert_eq!(ProfileId::from_name("cpu-map-uno"), None);
    }
}
