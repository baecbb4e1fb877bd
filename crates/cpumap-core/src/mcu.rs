//! Capability model of a microcontroller family.
//!
//! A [`McuModel`] lists the ports, interrupt sources, timers and serial units
//! a chip provides. Board profiles bind signals to these resources; the
//! resolver rejects any binding the chip cannot honour.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::port::{PinId, Port, PortId, RegisterAddr};

/// Output-compare channel of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Channel {
    A,
    B,
    C,
}

impl Channel {
    pub const fn same(self, other: Channel) -> bool {
        self as u8 == other as u8
    }

    /// Bit position of `COMnx1` in `TCCRnA` (non-inverting output).
    pub const fn com_bit(self) -> u8 {
        match self {
            Channel::A => 7,
            Channel::B => 5,
            Channel::C => 3,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Channel::A => 'A',
            Channel::B => 'B',
            Channel::C => 'C',
        };
        write!(f, "{c}")
    }
}

/// One compare channel and the pin it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerChannel {
    pub channel: Channel,
    /// Output compare register (`OCRnx`).
    pub compare: RegisterAddr,
    /// Pin driven by the compare output (`OCnx`).
    pub output: PinId,
}

/// A 16-bit timer/counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timer {
    pub index: u8,
    pub tccra: RegisterAddr,
    pub tccrb: RegisterAddr,
    /// Input capture register (`ICRn`), usable as counter top.
    pub icr: RegisterAddr,
    pub channels: &'static [TimerChannel],
}

impl Timer {
    pub const fn channel(&self, channel: Channel) -> Option<TimerChannel> {
        let mut i = 0;
        while i < self.channels.len() {
            if self.channels[i].channel.same(channel) {
                return Some(self.channels[i]);
            }
            i += 1;
        }
        None
    }
}

/// External interrupt line `INTn`, hard-wired to one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExternalLine {
    pub line: u8,
    pub pin: PinId,
}

/// Pin-change interrupt bank `PCINTn` covering all bits of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PinChangeBank {
    pub bank: u8,
    pub port: PortId,
    /// Bit of `PCIEn` in `PCICR`.
    pub enable_bit: u8,
    /// Pin change mask register (`PCMSKn`).
    pub mask_register: RegisterAddr,
}

/// Resources of one microcontroller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct McuModel {
    pub name: &'static str,
    pub ports: &'static [Port],
    pub external_lines: &'static [ExternalLine],
    pub pin_change_banks: &'static [PinChangeBank],
    pub timers: &'static [Timer],
    pub usart_count: u8,
}

impl McuModel {
    pub const fn port(&self, id: PortId) -> Option<Port> {
        let mut i = 0;
        while i < self.ports.len() {
            if self.ports[i].id.same(id) {
                return Some(self.ports[i]);
            }
            i += 1;
        }
        None
    }

    pub const fn external_line(&self, line: u8) -> Option<ExternalLine> {
        let mut i = 0;
        while i < self.external_lines.len() {
            if self.external_lines[i].line == line {
                return Some(self.external_lines[i]);
            }
            i += 1;
        }
        None
    }

    pub const fn pin_change_bank(&self, bank: u8) -> Option<PinChangeBank> {
        let mut i = 0;
        while i < self.pin_change_banks.len() {
            if self.pin_change_banks[i].bank == bank {
                return Some(self.pin_change_banks[i]);
            }
            i += 1;
        }
        None
    }

    pub const fn timer(&self, index: u8) -> Option<Timer> {
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].index == index {
                return Some(self.timers[i]);
            }
            i += 1;
        }
        None
    }
}
