//! Built-in microcontroller models.

use cpumap_core::{
    Channel, ExternalLine, McuModel, PinChangeBank, PinId, Port, PortId, RegisterAddr, Timer,
    TimerChannel,
};

/// GPIO port whose `PINx`, `DDRx` and `PORTx` registers are consecutive.
const fn gpio(id: PortId, pin: u16) -> Port {
    Port {
        id,
        ddr: RegisterAddr(pin + 1),
        output: RegisterAddr(pin + 2),
        input: RegisterAddr(pin),
    }
}

const fn int(line: u8, port: PortId, bit: u8) -> ExternalLine {
    ExternalLine {
        line,
        pin: PinId::new(port, bit),
    }
}

/// 16-bit timer whose control registers start at `base`.
const fn timer16(index: u8, base: u16, channels: &'static [TimerChannel; 3]) -> Timer {
    Timer {
        index,
        tccra: RegisterAddr(base),
        tccrb: RegisterAddr(base + 1),
        icr: RegisterAddr(base + 6),
        channels,
    }
}

const fn compare(channel: Channel, ocr: u16, port: PortId, bit: u8) -> TimerChannel {
    TimerChannel {
        channel,
        compare: RegisterAddr(ocr),
        output: PinId::new(port, bit),
    }
}

const TIMER1_CHANNELS: [TimerChannel; 3] = [
    compare(Channel::A, 0x88, PortId::B, 5),
    compare(Channel::B, 0x8A, PortId::B, 6),
    compare(Channel::C, 0x8C, PortId::B, 7),
];
const TIMER3_CHANNELS: [TimerChannel; 3] = [
    compare(Channel::A, 0x98, PortId::E, 3),
    compare(Channel::B, 0x9A, PortId::E, 4),
    compare(Channel::C, 0x9C, PortId::E, 5),
];
const TIMER4_CHANNELS: [TimerChannel; 3] = [
    compare(Channel::A, 0xA8, PortId::H, 3),
    compare(Channel::B, 0xAA, PortId::H, 4),
    compare(Channel::C, 0xAC, PortId::H, 5),
];
const TIMER5_CHANNELS: [TimerChannel; 3] = [
    compare(Channel::A, 0x128, PortId::L, 3),
    compare(Channel::B, 0x12A, PortId::L, 4),
    compare(Channel::C, 0x12C, PortId::L, 5),
];

/// ATmega2560 (Arduino Mega 2560). Addresses are data-space addresses.
pub const ATMEGA2560: McuModel = McuModel {
    name: "atmega2560",
    ports: &[
        gpio(PortId::A, 0x20),
        gpio(PortId::B, 0x23),
        gpio(PortId::C, 0x26),
        gpio(PortId::D, 0x29),
        gpio(PortId::E, 0x2C),
        gpio(PortId::F, 0x2F),
        gpio(PortId::G, 0x32),
        gpio(PortId::H, 0x100),
        gpio(PortId::J, 0x103),
        gpio(PortId::K, 0x106),
        gpio(PortId::L, 0x109),
    ],
    external_lines: &[
        int(0, PortId::D, 0),
        int(1, PortId::D, 1),
        int(2, PortId::D, 2),
        int(3, PortId::D, 3),
        int(4, PortId::E, 4),
        int(5, PortId::E, 5),
        int(6, PortId::E, 6),
        int(7, PortId::E, 7),
    ],
    // PCINT1 spans PE0 and PJ0-6 and cannot serve a whole port.
    pin_change_banks: &[
        PinChangeBank {
            bank: 0,
            port: PortId::B,
            enable_bit: 0,
            mask_register: RegisterAddr(0x6B),
        },
        PinChangeBank {
            bank: 2,
            port: PortId::K,
            enable_bit: 2,
            mask_register: RegisterAddr(0x6D),
        },
    ],
    timers: &[
        timer16(1, 0x80, &TIMER1_CHANNELS),
        timer16(3, 0x90, &TIMER3_CHANNELS),
        timer16(4, 0xA0, &TIMER4_CHANNELS),
        timer16(5, 0x120, &TIMER5_CHANNELS),
    ],
    usart_count: 4,
};

/// Every MCU model known to this crate.
pub const MCUS: &[&McuModel] = &[&ATMEGA2560];

/// Look up an MCU model by name, ignoring case.
pub fn by_name(name: &str) -> Option<&'static McuModel> {
    MCUS.iter()
        .copied()
        .find(|mcu| mcu.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mega_port_registers() {
        let a = ATMEGA2560.port(PortId::A).unwrap();
        assert_eq!(a.input, RegisterAddr(0x20));
        assert_eq!(a.ddr, RegisterAddr(0x21));
        assert_eq!(a.output, RegisterAddr(0x22));
        let h = ATMEGA2560.port(PortId::H).unwrap();
        assert_eq!(h.output, RegisterAddr(0x102));
        assert_eq!(ATMEGA2560.ports.len(), PortId::ALL.len());
    }

    #[test]
    fn timer3_matches_datasheet() {
        let t3 = ATMEGA2560.timer(3).unwrap();
        assert_eq!(t3.tccra, RegisterAddr(0x90));
        assert_eq!(t3.tccrb, RegisterAddr(0x91));
        assert_eq!(t3.icr, RegisterAddr(0x96));
        let b = t3.channel(Channel::B).unwrap();
        assert_eq!(b.compare, RegisterAddr(0x9A));
        assert_eq!(b.output, PinId::new(PortId::E, 4));
        assert!(ATMEGA2560.timer(0).is_none());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("ATmega2560"), Some(&ATMEGA2560));
        assert!(by_name("atmega328p").is_none());
    }
}
