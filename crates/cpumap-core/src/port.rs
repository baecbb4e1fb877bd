//! GPIO ports, pins and validated port masks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::signal::Signal;

/// Width in bits of every GPIO port register.
pub const PORT_WIDTH: u8 = 8;

/// Port letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PortId {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    K,
    L,
}

impl PortId {
    pub const ALL: [PortId; 11] = [
        PortId::A,
        PortId::B,
        PortId::C,
        PortId::D,
        PortId::E,
        PortId::F,
        PortId::G,
        PortId::H,
        PortId::J,
        PortId::K,
        PortId::L,
    ];

    pub const fn same(self, other: PortId) -> bool {
        self as u8 == other as u8
    }

    pub const fn letter(self) -> char {
        match self {
            PortId::A => 'A',
            PortId::B => 'B',
            PortId::C => 'C',
            PortId::D => 'D',
            PortId::E => 'E',
            PortId::F => 'F',
            PortId::G => 'G',
            PortId::H => 'H',
            PortId::J => 'J',
            PortId::K => 'K',
            PortId::L => 'L',
        }
    }

    pub fn from_letter(letter: char) -> Option<PortId> {
        let letter = letter.to_ascii_uppercase();
        PortId::ALL.into_iter().find(|p| p.letter() == letter)
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Data-space address of a memory-mapped register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterAddr(pub u16);

impl fmt::Display for RegisterAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// A GPIO port with its data-direction, output and input registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Port {
    pub id: PortId,
    /// Data direction register (`DDRx`).
    pub ddr: RegisterAddr,
    /// Output latch (`PORTx`).
    pub output: RegisterAddr,
    /// Input pins (`PINx`).
    pub input: RegisterAddr,
}

impl Port {
    /// Structural equality, usable in constant evaluation.
    pub const fn same_as(&self, other: &Port) -> bool {
        self.id.same(other.id)
            && self.ddr.0 == other.ddr.0
            && self.output.0 == other.output.0
            && self.input.0 == other.input.0
    }
}

/// A pin as written in a profile: port letter and bit, e.g. `PA2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId {
    pub port: PortId,
    pub bit: u8,
}

impl PinId {
    pub const fn new(port: PortId, bit: u8) -> Self {
        Self { port, bit }
    }

    pub const fn same(&self, other: &PinId) -> bool {
        self.port.same(other.port) && self.bit == other.bit
    }

    /// Parse a `P<letter><bit>` name such as `PE4`. The bit is a single digit.
    pub fn parse(name: &str) -> Option<PinId> {
        let rest = name.trim().strip_prefix(['P', 'p'])?;
        let mut chars = rest.chars();
        let port = PortId::from_letter(chars.next()?)?;
        let bit = match (chars.next(), chars.next()) {
            (Some(digit), None) => digit.to_digit(10)?,
            _ => return None,
        };
        Some(PinId {
            port,
            bit: bit as u8,
        })
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port, self.bit)
    }
}

/// A resolved pin: a bit on a port whose registers are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pin {
    pub port: Port,
    pub bit: u8,
}

impl Pin {
    pub const fn id(&self) -> PinId {
        PinId::new(self.port.id, self.bit)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id(), f)
    }
}

/// A set of bits on a single port.
///
/// Only constructed through validating functions, so every mask refers to
/// bits inside the port register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PortMask {
    port: Port,
    bits: u8,
}

impl PortMask {
    /// Mask of a single signal's pin.
    pub const fn single(signal: Signal, pin: Pin) -> Result<PortMask, ConfigError> {
        if pin.bit >= PORT_WIDTH {
            return Err(ConfigError::BitOutOfRange {
                signal,
                bit: pin.bit,
                width: PORT_WIDTH,
            });
        }
        Ok(PortMask {
            port: pin.port,
            bits: 1 << pin.bit,
        })
    }

    /// Caller guarantees `bits` came from validated pins on `port`.
    pub(crate) const fn from_validated(port: Port, bits: u8) -> PortMask {
        PortMask { port, bits }
    }

    pub const fn port(&self) -> Port {
        self.port
    }

    pub const fn bits(&self) -> u8 {
        self.bits
    }

    pub const fn contains(&self, bit: u8) -> bool {
        bit < PORT_WIDTH && self.bits & (1 << bit) != 0
    }

    pub const fn len(&self) -> u32 {
        self.bits.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl fmt::Display for PortMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PORT{} 0b{:08b}", self.port.id, self.bits)
    }
}
