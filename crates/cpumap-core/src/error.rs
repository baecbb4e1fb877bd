//! Configuration errors raised while resolving a board profile.

use crate::interrupt::{InterruptVector, TriggerEdge};
use crate::mcu::Channel;
use crate::port::{PinId, PortId};
use crate::signal::{GroupKind, Signal};

/// A board profile that cannot produce a correct pin map.
///
/// Every variant is fatal: there is no fallback binding. The type is `Copy`
/// so it can be returned from constant evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no {axis} selected")]
    NothingSelected { axis: &'static str },

    #[error("{count} {axis} options selected, exactly one is required")]
    ConflictingSelection { axis: &'static str, count: usize },

    #[error("signal {signal} has no pin binding")]
    MissingSignal { signal: Signal },

    #[error("signal {signal} is bound more than once")]
    DuplicateBinding { signal: Signal },

    #[error("signal {signal} is bound to port {port}, which this MCU does not have")]
    UnknownPort { signal: Signal, port: PortId },

    #[error("signal {signal} uses bit {bit}, outside the {width}-bit port register")]
    BitOutOfRange { signal: Signal, bit: u8, width: u8 },

    #[error("signals {first} and {second} are both bound to {pin}")]
    PinConflict {
        first: Signal,
        second: Signal,
        pin: PinId,
    },

    #[error("signal {signal} does not belong to the {group} group")]
    ForeignSignal { group: GroupKind, signal: Signal },

    #[error("{group} group has no members")]
    EmptyGroup { group: GroupKind },

    #[error("{group} group member {signal} is not on the group's port")]
    PortMismatch { group: GroupKind, signal: Signal },

    #[error("{group} group members {first} and {second} share bit {bit}")]
    SharedBit {
        group: GroupKind,
        first: Signal,
        second: Signal,
        bit: u8,
    },

    #[error("{first} and {second} inputs share port {port}")]
    SharedInputPort {
        first: GroupKind,
        second: GroupKind,
        port: PortId,
    },

    #[error("{group} group has no interrupt binding")]
    MissingInterrupt { group: GroupKind },

    #[error("{group} group interrupt has no trigger edge")]
    MissingTrigger { group: GroupKind },

    #[error("signal {signal} has no external interrupt line")]
    MissingInterruptLine { signal: Signal },

    #[error("external interrupt line {line} is assigned more than once")]
    SharedInterruptLine { line: u8 },

    #[error("external interrupt line {line} does not exist on this MCU")]
    UnknownInterruptLine { line: u8 },

    #[error("signal {signal} is not on the pin served by {vector}")]
    InterruptPinMismatch {
        signal: Signal,
        vector: InterruptVector,
    },

    #[error("pin-change bank {bank} does not exist on this MCU")]
    UnknownPinChangeBank { bank: u8 },

    #[error("pin-change bank {bank} does not cover the {group} group's port")]
    PinChangePortMismatch { group: GroupKind, bank: u8 },

    #[error("{group} group uses a pin-change interrupt, which cannot be limited to {trigger}")]
    UnsupportedTrigger {
        group: GroupKind,
        trigger: TriggerEdge,
    },

    #[error("spindle PWM has no timer binding")]
    MissingPwm,

    #[error("timer {timer} does not exist on this MCU")]
    UnknownTimer { timer: u8 },

    #[error("timer {timer} has no compare channel {channel}")]
    UnknownTimerChannel { timer: u8, channel: Channel },

    #[error("timer {timer} channel {channel} does not drive the spindle PWM pin")]
    PwmPinMismatch { timer: u8, channel: Channel },

    #[error("timer {timer} channel A holds the counter top and cannot drive the PWM output")]
    PwmChannelIsTop { timer: u8 },

    #[error("PWM min value must be greater than zero")]
    PwmMinNotPositive,

    #[error("PWM max value {max} must exceed min value {min}")]
    PwmRangeEmpty { min: u16, max: u16 },

    #[error("PWM off value must be zero, got {off}")]
    PwmOffNonZero { off: u16 },

    #[error("PWM counter top {top} does not match max value {max}")]
    PwmTopMismatch { top: u16, max: u16 },

    #[error("USART {usart} does not exist on this MCU")]
    UnknownUsart { usart: u8 },
}

impl ConfigError {
    /// Static description of the failure class.
    ///
    /// Constant evaluation can only panic with a plain string, so this is
    /// what a failed build reports.
    pub const fn summary(&self) -> &'static str {
        match self {
            ConfigError::NothingSelected { .. } => "configuration error: nothing selected",
            ConfigError::ConflictingSelection { .. } => {
                "configuration error: more than one option selected"
            }
            ConfigError::MissingSignal { .. } => "configuration error: signal without binding",
            ConfigError::DuplicateBinding { .. } => "configuration error: signal bound twice",
            ConfigError::UnknownPort { .. } => "configuration error: port not on this MCU",
            ConfigError::BitOutOfRange { .. } => "configuration error: bit outside port register",
            ConfigError::PinConflict { .. } => "configuration error: two signals on one pin",
            ConfigError::ForeignSignal { .. } => "configuration error: signal outside its group",
            ConfigError::EmptyGroup { .. } => "configuration error: empty signal group",
            ConfigError::PortMismatch { .. } => "configuration error: group spans several ports",
            ConfigError::SharedBit { .. } => "configuration error: group members share a bit",
            ConfigError::SharedInputPort { .. } => {
                "configuration error: control and limit inputs share a port"
            }
            ConfigError::MissingInterrupt { .. } => "configuration error: group has no interrupt",
            ConfigError::MissingTrigger { .. } => "configuration error: interrupt has no trigger",
            ConfigError::MissingInterruptLine { .. } => {
                "configuration error: signal has no interrupt line"
            }
            ConfigError::SharedInterruptLine { .. } => {
                "configuration error: interrupt line assigned twice"
            }
            ConfigError::UnknownInterruptLine { .. } => {
                "configuration error: interrupt line not on this MCU"
            }
            ConfigError::InterruptPinMismatch { .. } => {
                "configuration error: interrupt line serves another pin"
            }
            ConfigError::UnknownPinChangeBank { .. } => {
                "configuration error: pin-change bank not on this MCU"
            }
            ConfigError::PinChangePortMismatch { .. } => {
                "configuration error: pin-change bank covers another port"
            }
            ConfigError::UnsupportedTrigger { .. } => {
                "configuration error: pin-change interrupts only trigger on any edge"
            }
            ConfigError::MissingPwm => "configuration error: spindle PWM has no timer",
            ConfigError::UnknownTimer { .. } => "configuration error: timer not on this MCU",
            ConfigError::UnknownTimerChannel { .. } => {
                "configuration error: timer channel not on this MCU"
            }
            ConfigError::PwmPinMismatch { .. } => {
                "configuration error: timer channel does not drive the spindle PWM pin"
            }
            ConfigError::PwmChannelIsTop { .. } => {
                "configuration error: PWM channel is the counter top register"
            }
            ConfigError::PwmMinNotPositive => "configuration error: PWM min value must be positive",
            ConfigError::PwmRangeEmpty { .. } => "configuration error: PWM max must exceed min",
            ConfigError::PwmOffNonZero { .. } => "configuration error: PWM off value must be zero",
            ConfigError::PwmTopMismatch { .. } => "configuration error: PWM top differs from max",
            ConfigError::UnknownUsart { .. } => "configuration error: USART not on this MCU",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_signal() {
        let err = ConfigError::MissingSignal {
            signal: Signal::FeedHold,
        };
        assert_eq!(err.to_string(), "signal feed-hold has no pin binding");
    }

    #[test]
    fn display_names_the_pin() {
        let err = ConfigError::PinConflict {
            first: Signal::Probe,
            second: Signal::StepperEnable,
            pin: PinId::new(PortId::C, 0),
        };
        assert_eq!(
            err.to_string(),
            "signals probe and stepper-enable are both bound to PC0"
        );
    }

    #[test]
    fn display_names_the_vector() {
        let err = ConfigError::InterruptPinMismatch {
            signal: Signal::YLimit,
            vector: InterruptVector::External(5),
        };
        assert_eq!(
            err.to_string(),
            "signal y-limit is not on the pin served by INT5_vect"
        );
    }

    #[test]
    fn summary_is_static() {
        const SUMMARY: &str = ConfigError::PwmMinNotPositive.summary();
        assert!(SUMMARY.contains("PWM min"));
    }
}
