//! Arduino Mega 2560, initial pin layout.
//!
//! | Group / signal     | Pins          | Notes                        |
//! | ------------------ | ------------- | ---------------------------- |
//! | Step X/Y/Z         | PA2, PA3, PA4 |                              |
//! | Direction X/Y/Z    | PC7, PC6, PC5 |                              |
//! | Stepper enable     | PC4           |                              |
//! | Limit X/Y/Z        | PE5, PE6, PE7 | `INT5`..`INT7`               |
//! | Spindle enable/dir | PF0, PF1      |                              |
//! | Coolant flood/mist | PF2, PF3      |                              |
//! | Control inputs     | PB4..PB7      | `PCINT0`, any edge           |
//! | Probe              | PC0           |                              |
//! | Spindle PWM        | PE4           | `OC3B`, fast PWM, 1/8 clock  |
//!
//! Serial runs on USART0.

use cpumap_core::{
    BoardMap, Channel, GroupInterrupt, InterruptSource, PinBinding, PinId, PortId, Prescaler,
    PwmConfig, Signal, SignalLine, TriggerEdge, WaveformMode,
};

use crate::mcu::ATMEGA2560;

pub const NAME: &str = "cpu-map-2560-initial";

const fn pin(signal: Signal, port: PortId, bit: u8) -> PinBinding {
    PinBinding {
        signal,
        pin: PinId::new(port, bit),
    }
}

const BINDINGS: [PinBinding; Signal::COUNT] = [
    pin(Signal::XStep, PortId::A, 2),
    pin(Signal::YStep, PortId::A, 3),
    pin(Signal::ZStep, PortId::A, 4),
    pin(Signal::XDirection, PortId::C, 7),
    pin(Signal::YDirection, PortId::C, 6),
    pin(Signal::ZDirection, PortId::C, 5),
    pin(Signal::StepperEnable, PortId::C, 4),
    pin(Signal::XLimit, PortId::E, 5),
    pin(Signal::YLimit, PortId::E, 6),
    pin(Signal::ZLimit, PortId::E, 7),
    pin(Signal::SpindleEnable, PortId::F, 0),
    pin(Signal::SpindleDirection, PortId::F, 1),
    pin(Signal::SpindlePwm, PortId::E, 4),
    pin(Signal::CoolantFlood, PortId::F, 2),
    pin(Signal::CoolantMist, PortId::F, 3),
    pin(Signal::Reset, PortId::B, 4),
    pin(Signal::FeedHold, PortId::B, 5),
    pin(Signal::CycleStart, PortId::B, 6),
    pin(Signal::SafetyDoor, PortId::B, 7),
    pin(Signal::Probe, PortId::C, 0),
];

const LIMIT_LINES: [SignalLine; 3] = [
    SignalLine {
        signal: Signal::XLimit,
        line: 5,
    },
    SignalLine {
        signal: Signal::YLimit,
        line: 6,
    },
    SignalLine {
        signal: Signal::ZLimit,
        line: 7,
    },
];

/// About 1.9 kHz at 16 MHz.
const SPINDLE_PWM: PwmConfig = PwmConfig {
    timer: 3,
    channel: Channel::B,
    mode: WaveformMode::FastPwmOcrTop,
    prescaler: Prescaler::Div8,
    max: 1024,
    min: 1,
    off: 0,
    top: 0x0400,
};

/// Board map with the limit switches triggering on `limit_trigger`.
pub const fn board_map(limit_trigger: TriggerEdge) -> BoardMap<'static> {
    BoardMap {
        name: NAME,
        mcu: &ATMEGA2560,
        serial: 0,
        bindings: &BINDINGS,
        limit_interrupt: Some(GroupInterrupt {
            source: InterruptSource::External(&LIMIT_LINES),
            trigger: Some(limit_trigger),
        }),
        control_interrupt: Some(GroupInterrupt {
            source: InterruptSource::PinChange(0),
            trigger: Some(TriggerEdge::AnyEdge),
        }),
        spindle_pwm: Some(SPINDLE_PWM),
    }
}
