//! Test MCU and a complete board map laid out like a Mega2560 CNC shield.

use crate::interrupt::{GroupInterrupt, InterruptSource, SignalLine, TriggerEdge};
use crate::mcu::{Channel, ExternalLine, McuModel, PinChangeBank, Timer, TimerChannel};
use crate::port::{PinId, Port, PortId, RegisterAddr};
use crate::pwm::{Prescaler, PwmConfig, WaveformMode};
use crate::signal::Signal;
use crate::table::{BoardMap, PinBinding};

const fn gpio(id: PortId, pin: u16) -> Port {
    Port {
        id,
        ddr: RegisterAddr(pin + 1),
        output: RegisterAddr(pin + 2),
        input: RegisterAddr(pin),
    }
}

pub const TEST_PORT_A: Port = gpio(PortId::A, 0x20);

pub const TEST_MCU: McuModel = McuModel {
    name: "test-mcu",
    ports: &[
        TEST_PORT_A,
        gpio(PortId::B, 0x23),
        gpio(PortId::C, 0x26),
        gpio(PortId::D, 0x29),
        gpio(PortId::E, 0x2C),
        gpio(PortId::F, 0x2F),
    ],
    external_lines: &[
        ExternalLine {
            line: 4,
            pin: PinId::new(PortId::E, 4),
        },
        ExternalLine {
            line: 5,
            pin: PinId::new(PortId::E, 5),
        },
        ExternalLine {
            line: 6,
            pin: PinId::new(PortId::E, 6),
        },
        ExternalLine {
            line: 7,
            pin: PinId::new(PortId::E, 7),
        },
    ],
    pin_change_banks: &[PinChangeBank {
        bank: 0,
        port: PortId::B,
        enable_bit: 0,
        mask_register: RegisterAddr(0x6B),
    }],
    timers: &[Timer {
        index: 3,
        tccra: RegisterAddr(0x90),
        tccrb: RegisterAddr(0x91),
        icr: RegisterAddr(0x96),
        channels: &[
            TimerChannel {
                channel: Channel::A,
                compare: RegisterAddr(0x98),
                output: PinId::new(PortId::E, 3),
            },
            TimerChannel {
                channel: Channel::B,
                compare: RegisterAddr(0x9A),
                output: PinId::new(PortId::E, 4),
            },
            TimerChannel {
                channel: Channel::C,
                compare: RegisterAddr(0x9C),
                output: PinId::new(PortId::E, 5),
            },
        ],
    }],
    usart_count: 1,
};

pub fn port(id: PortId) -> Port {
    TEST_MCU.port(id).expect("fixture port")
}

const fn bind(signal: Signal, port: PortId, bit: u8) -> PinBinding {
    PinBinding {
        signal,
        pin: PinId::new(port, bit),
    }
}

pub const BINDINGS: &[PinBinding] = &[
    bind(Signal::XStep, PortId::A, 2),
    bind(Signal::YStep, PortId::A, 3),
    bind(Signal::ZStep, PortId::A, 4),
    bind(Signal::XDirection, PortId::C, 7),
    bind(Signal::YDirection, PortId::C, 6),
    bind(Signal::ZDirection, PortId::C, 5),
    bind(Signal::StepperEnable, PortId::C, 4),
    bind(Signal::XLimit, PortId::E, 5),
    bind(Signal::YLimit, PortId::E, 6),
    bind(Signal::ZLimit, PortId::E, 7),
    bind(Signal::SpindleEnable, PortId::F, 0),
    bind(Signal::SpindleDirection, PortId::F, 1),
    bind(Signal::CoolantFlood, PortId::F, 2),
    bind(Signal::CoolantMist, PortId::F, 3),
    bind(Signal::Reset, PortId::B, 4),
    bind(Signal::FeedHold, PortId::B, 5),
    bind(Signal::CycleStart, PortId::B, 6),
    bind(Signal::SafetyDoor, PortId::B, 7),
    bind(Signal::Probe, PortId::C, 0),
    bind(Signal::SpindlePwm, PortId::E, 4),
];

pub const LIMIT_LINES: &[SignalLine] = &[
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

pub const PWM: PwmConfig = PwmConfig {
    timer: 3,
    channel: Channel::B,
    mode: WaveformMode::FastPwmOcrTop,
    prescaler: Prescaler::Div8,
    max: 1024,
    min: 1,
    off: 0,
    top: 0x0400,
};

pub const MAP: BoardMap<'static> = BoardMap {
    name: "fixture",
    mcu: &TEST_MCU,
    serial: 0,
    bindings: BINDINGS,
    limit_interrupt: Some(GroupInterrupt {
        source: InterruptSource::External(LIMIT_LINES),
        trigger: Some(TriggerEdge::AnyEdge),
    }),
    control_interrupt: Some(GroupInterrupt {
        source: InterruptSource::PinChange(0),
        trigger: Some(TriggerEdge::AnyEdge),
    }),
    spindle_pwm: Some(PWM),
};

/// Copy of [`BINDINGS`] with one signal moved to another pin.
pub fn rebind(signal: Signal, port: PortId, bit: u8) -> Vec<PinBinding> {
    BINDINGS
        .iter()
        .map(|b| {
            if b.signal == signal {
                bind(signal, port, bit)
            } else {
                *b
            }
        })
        .collect()
}
