//! Logical machine-control signals and the groups they belong to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether the firmware drives a signal or reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalDirection {
    Output,
    Input,
}

/// A logical machine-control line that must be bound to a physical pin.
///
/// The set is closed: a profile is complete only when every variant has a
/// binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Signal {
    XStep,
    YStep,
    ZStep,
    XDirection,
    YDirection,
    ZDirection,
    /// Stepper driver enable line (drivers are disabled while it is set).
    StepperEnable,
    XLimit,
    YLimit,
    ZLimit,
    SpindleEnable,
    SpindleDirection,
    SpindlePwm,
    CoolantFlood,
    CoolantMist,
    Reset,
    FeedHold,
    CycleStart,
    SafetyDoor,
    Probe,
}

impl Signal {
    /// Number of required signals.
    pub const COUNT: usize = 20;

    /// Every signal, in declaration order.
    pub const ALL: [Signal; Signal::COUNT] = [
        Signal::XStep,
        Signal::YStep,
        Signal::ZStep,
        Signal::XDirection,
        Signal::YDirection,
        Signal::ZDirection,
        Signal::StepperEnable,
        Signal::XLimit,
        Signal::YLimit,
        Signal::ZLimit,
        Signal::SpindleEnable,
        Signal::SpindleDirection,
        Signal::SpindlePwm,
        Signal::CoolantFlood,
        Signal::CoolantMist,
        Signal::Reset,
        Signal::FeedHold,
        Signal::CycleStart,
        Signal::SafetyDoor,
        Signal::Probe,
    ];

    /// Position of this signal in [`Signal::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn same(self, other: Signal) -> bool {
        self as u8 == other as u8
    }

    /// Kebab-case name, as used in board description files.
    pub const fn name(self) -> &'static str {
        match self {
            Signal::XStep => "x-step",
            Signal::YStep => "y-step",
            Signal::ZStep => "z-step",
            Signal::XDirection => "x-direction",
            Signal::YDirection => "y-direction",
            Signal::ZDirection => "z-direction",
            Signal::StepperEnable => "stepper-enable",
            Signal::XLimit => "x-limit",
            Signal::YLimit => "y-limit",
            Signal::ZLimit => "z-limit",
            Signal::SpindleEnable => "spindle-enable",
            Signal::SpindleDirection => "spindle-direction",
            Signal::SpindlePwm => "spindle-pwm",
            Signal::CoolantFlood => "coolant-flood",
            Signal::CoolantMist => "coolant-mist",
            Signal::Reset => "reset",
            Signal::FeedHold => "feed-hold",
            Signal::CycleStart => "cycle-start",
            Signal::SafetyDoor => "safety-door",
            Signal::Probe => "probe",
        }
    }

    /// Look up a signal by its kebab-case name.
    pub fn from_name(name: &str) -> Option<Signal> {
        Signal::ALL.into_iter().find(|s| s.name() == name)
    }

    pub const fn direction(self) -> SignalDirection {
        match self {
            Signal::XLimit
            | Signal::YLimit
            | Signal::ZLimit
            | Signal::Reset
            | Signal::FeedHold
            | Signal::CycleStart
            | Signal::SafetyDoor
            | Signal::Probe => SignalDirection::Input,
            _ => SignalDirection::Output,
        }
    }

    /// The group this signal is accessed with, if any.
    pub const fn group(self) -> Option<GroupKind> {
        match self {
            Signal::XStep | Signal::YStep | Signal::ZStep => Some(GroupKind::Step),
            Signal::XDirection | Signal::YDirection | Signal::ZDirection => {
                Some(GroupKind::Direction)
            }
            Signal::XLimit | Signal::YLimit | Signal::ZLimit => Some(GroupKind::Limit),
            Signal::Reset | Signal::FeedHold | Signal::CycleStart | Signal::SafetyDoor => {
                Some(GroupKind::Control)
            }
            _ => None,
        }
    }

    /// Whether this signal is a member of `group`.
    pub const fn in_group(self, group: GroupKind) -> bool {
        match self.group() {
            Some(g) => g.same(group),
            None => false,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of signals read or written together with one register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum GroupKind {
    Step,
    Direction,
    Limit,
    Control,
}

impl GroupKind {
    pub const COUNT: usize = 4;

    pub const ALL: [GroupKind; GroupKind::COUNT] = [
        GroupKind::Step,
        GroupKind::Direction,
        GroupKind::Limit,
        GroupKind::Control,
    ];

    /// Largest member count of any group.
    pub const MAX_MEMBERS: usize = 4;

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn same(self, other: GroupKind) -> bool {
        self as u8 == other as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            GroupKind::Step => "step",
            GroupKind::Direction => "direction",
            GroupKind::Limit => "limit",
            GroupKind::Control => "control",
        }
    }

    pub const fn members(self) -> &'static [Signal] {
        match self {
            GroupKind::Step => &[Signal::XStep, Signal::YStep, Signal::ZStep],
            GroupKind::Direction => &[Signal::XDirection, Signal::YDirection, Signal::ZDirection],
            GroupKind::Limit => &[Signal::XLimit, Signal::YLimit, Signal::ZLimit],
            GroupKind::Control => &[
                Signal::Reset,
                Signal::FeedHold,
                Signal::CycleStart,
                Signal::SafetyDoor,
            ],
        }
    }

    /// Input groups serviced by an interrupt handler.
    pub const fn interrupt_capable(self) -> bool {
        matches!(self, GroupKind::Limit | GroupKind::Control)
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, signal) in Signal::ALL.iter().enumerate() {
            assert_eq!(signal.index(), i);
        }
    }

    #[test]
    fn names_round_trip() {
        for signal in Signal::ALL {
            assert_eq!(Signal::from_name(signal.name()), Some(signal));
        }
        assert_eq!(Signal::from_name("w-step"), None);
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&Signal::SpindlePwm).unwrap();
        assert_eq!(json, "\"spindle-pwm\"");
        assert_eq!(Signal::SpindlePwm.to_string(), "spindle-pwm");
    }

    #[test]
    fn group_membership_is_consistent() {
        for group in GroupKind::ALL {
            assert!(group.members().len() <= GroupKind::MAX_MEMBERS);
            for member in group.members() {
                assert_eq!(member.group(), Some(group));
            }
        }
        let grouped: usize = GroupKind::ALL.iter().map(|g| g.members().len()).sum();
        let ungrouped = Signal::ALL.iter().filter(|s| s.group().is_none()).count();
        assert_eq!(grouped + ungrouped, Signal::COUNT);
    }

    #[test]
    fn input_groups_are_interrupt_capable() {
        for group in GroupKind::ALL {
            let inputs = group
                .members()
                .iter()
                .all(|s| s.direction() == SignalDirection::Input);
            assert_eq!(group.interrupt_capable(), inputs);
        }
    }

    #[test]
    fn probe_is_an_ungrouped_input() {
        assert_eq!(Signal::Probe.direction(), SignalDirection::Input);
        assert_eq!(Signal::Probe.group(), None);
        assert!(!Signal::Probe.in_group(GroupKind::Control));
    }
}
