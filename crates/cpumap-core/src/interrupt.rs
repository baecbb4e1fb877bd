//! Interrupt vectors and trigger-edge binding for input groups.
//!
//! Limit switches use one external interrupt line per signal; operator
//! controls share one pin-change bank. The trigger edge is always taken from
//! the profile, never inferred from what a signal means.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mcu::McuModel;
use crate::port::{Pin, PortMask, RegisterAddr};
use crate::signal::{GroupKind, Signal};

/// Edge on which an input interrupt fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum TriggerEdge {
    /// Either edge. Matches the legacy pin-change behaviour.
    AnyEdge,
    /// High-to-low; for switches with external pull-ups.
    FallingEdge,
    /// Low-to-high; for switches with external pull-downs.
    RisingEdge,
}

impl TriggerEdge {
    pub const ALL: [TriggerEdge; 3] = [
        TriggerEdge::AnyEdge,
        TriggerEdge::FallingEdge,
        TriggerEdge::RisingEdge,
    ];

    pub const fn same(self, other: TriggerEdge) -> bool {
        self as u8 == other as u8
    }

    /// Interrupt sense control bits `ISCn1:ISCn0`.
    pub const fn sense_bits(self) -> u8 {
        match self {
            TriggerEdge::AnyEdge => 0b01,
            TriggerEdge::FallingEdge => 0b10,
            TriggerEdge::RisingEdge => 0b11,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TriggerEdge::AnyEdge => "any-edge",
            TriggerEdge::FallingEdge => "falling-edge",
            TriggerEdge::RisingEdge => "rising-edge",
        }
    }

    pub fn from_name(name: &str) -> Option<TriggerEdge> {
        TriggerEdge::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for TriggerEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An interrupt vector of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterruptVector {
    /// `INTn_vect`
    External(u8),
    /// `PCINTn_vect`
    PinChange(u8),
    /// `USARTn_RX_vect`
    UsartRx(u8),
    /// `USARTn_UDRE_vect`
    UsartUdre(u8),
}

impl fmt::Display for InterruptVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptVector::External(n) => write!(f, "INT{n}_vect"),
            InterruptVector::PinChange(n) => write!(f, "PCINT{n}_vect"),
            InterruptVector::UsartRx(n) => write!(f, "USART{n}_RX_vect"),
            InterruptVector::UsartUdre(n) => write!(f, "USART{n}_UDRE_vect"),
        }
    }
}

/// External interrupt line assigned to one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalLine {
    pub signal: Signal,
    pub line: u8,
}

/// Where a group's interrupt comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptSource<'a> {
    /// One `INTn` line per member signal.
    External(&'a [SignalLine]),
    /// A single pin-change bank for the whole group.
    PinChange(u8),
}

/// Interrupt declaration of a group, as written in a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInterrupt<'a> {
    pub source: InterruptSource<'a>,
    pub trigger: Option<TriggerEdge>,
}

impl GroupInterrupt<'_> {
    /// Vector serving `signal`, if this declaration covers it.
    pub const fn vector_for(&self, signal: Signal) -> Option<InterruptVector> {
        match self.source {
            InterruptSource::External(lines) => {
                let mut i = 0;
                while i < lines.len() {
                    if lines[i].signal.same(signal) {
                        return Some(InterruptVector::External(lines[i].line));
                    }
                    i += 1;
                }
                None
            }
            InterruptSource::PinChange(bank) => Some(InterruptVector::PinChange(bank)),
        }
    }
}

/// Register values that enable a group's interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterruptRegisters {
    External {
        /// Sense bits for lines 0-3.
        eicra: u8,
        /// Sense bits for lines 4-7.
        eicrb: u8,
        /// Enable mask.
        eimsk: u8,
    },
    PinChange {
        bank: u8,
        /// `PCIEn` bit to set in `PCICR`.
        pcicr: u8,
        pcmsk: RegisterAddr,
        /// Pins to unmask in `pcmsk`.
        pcmsk_bits: u8,
    },
}

/// Resolved interrupt binding of an input group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct InterruptBinding {
    pub group: GroupKind,
    pub trigger: TriggerEdge,
    pub registers: InterruptRegisters,
}

impl InterruptBinding {
    /// Vectors the firmware must provide handlers for, in line order.
    pub fn vectors(&self) -> Vec<InterruptVector> {
        match self.registers {
            InterruptRegisters::External { eimsk, .. } => (0..8u8)
                .filter(|line| eimsk & (1 << line) != 0)
                .map(InterruptVector::External)
                .collect(),
            InterruptRegisters::PinChange { bank, .. } => vec![InterruptVector::PinChange(bank)],
        }
    }
}

/// Bind `group`'s interrupt declaration against the MCU.
pub(crate) const fn bind_interrupt(
    mcu: &McuModel,
    group: GroupKind,
    decl: Option<GroupInterrupt<'_>>,
    mask: &PortMask,
    pins: &[Pin; Signal::COUNT],
) -> Result<InterruptBinding, ConfigError> {
    let decl = match decl {
        Some(d) => d,
        None => return Err(ConfigError::MissingInterrupt { group }),
    };
    let trigger = match decl.trigger {
        Some(t) => t,
        None => return Err(ConfigError::MissingTrigger { group }),
    };
    let registers = match decl.source {
        InterruptSource::External(lines) => {
            const_try!(bind_external(mcu, group, lines, trigger, pins))
        }
        InterruptSource::PinChange(bank) => {
            const_try!(bind_pin_change(mcu, group, bank, trigger, mask))
        }
    };
    Ok(InterruptBinding {
        group,
        trigger,
        registers,
    })
}

const fn bind_external(
    mcu: &McuModel,
    group: GroupKind,
    lines: &[SignalLine],
    trigger: TriggerEdge,
    pins: &[Pin; Signal::COUNT],
) -> Result<InterruptRegisters, ConfigError> {
    let mut eicra = 0u8;
    let mut eicrb = 0u8;
    let mut eimsk = 0u8;
    let mut i = 0;
    while i < lines.len() {
        let entry = lines[i];
        if !entry.signal.in_group(group) {
            return Err(ConfigError::ForeignSignal {
                group,
                signal: entry.signal,
            });
        }
        let line = match mcu.external_line(entry.line) {
            Some(line) if line.line < 8 => line,
            _ => return Err(ConfigError::UnknownInterruptLine { line: entry.line }),
        };
        let mut j = 0;
        while j < i {
            if lines[j].signal.same(entry.signal) {
                return Err(ConfigError::DuplicateBinding {
                    signal: entry.signal,
                });
            }
            if lines[j].line == entry.line {
                return Err(ConfigError::SharedInterruptLine { line: entry.line });
            }
            j += 1;
        }
        if !line.pin.same(&pins[entry.signal.index()].id()) {
            return Err(ConfigError::InterruptPinMismatch {
                signal: entry.signal,
                vector: InterruptVector::External(entry.line),
            });
        }
        let sense = trigger.sense_bits() << (2 * (entry.line % 4));
        if entry.line < 4 {
            eicra |= sense;
        } else {
            eicrb |= sense;
        }
        eimsk |= 1 << entry.line;
        i += 1;
    }

    let members = group.members();
    let mut m = 0;
    while m < members.len() {
        let decl = GroupInterrupt {
            source: InterruptSource::External(lines),
            trigger: Some(trigger),
        };
        if decl.vector_for(members[m]).is_none() {
            return Err(ConfigError::MissingInterruptLine { signal: members[m] });
        }
        m += 1;
    }

    Ok(InterruptRegisters::External {
        eicra,
        eicrb,
        eimsk,
    })
}

const fn bind_pin_change(
    mcu: &McuModel,
    group: GroupKind,
    bank: u8,
    trigger: TriggerEdge,
    mask: &PortMask,
) -> Result<InterruptRegisters, ConfigError> {
    let pcint = match mcu.pin_change_bank(bank) {
        Some(b) => b,
        None => return Err(ConfigError::UnknownPinChangeBank { bank }),
    };
    if !pcint.port.same(mask.port().id) {
        return Err(ConfigError::PinChangePortMismatch { group, bank });
    }
    if !trigger.same(TriggerEdge::AnyEdge) {
        return Err(ConfigError::UnsupportedTrigger { group, trigger });
    }
    Ok(InterruptRegisters::PinChange {
        bank,
        pcicr: 1 << pcint.enable_bit,
        pcmsk: pcint.mask_register,
        pcmsk_bits: mask.bits(),
    })
}
