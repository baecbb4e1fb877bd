//! `cpumap show`: print a resolved binding table.

use std::fmt;

use anyhow::Result;

use cpumap_boards::ACTIVE_TABLE;
use cpumap_core::{InterruptBinding, InterruptRegisters, ResolvedTable};

use super::{profile_or_active, trigger_or_active};

pub fn run(profile: Option<&str>, limit_trigger: Option<&str>, json: bool) -> Result<()> {
    let table = if profile.is_none() && limit_trigger.is_none() {
        ACTIVE_TABLE
    } else {
        let profile = profile_or_active(profile)?;
        let trigger = trigger_or_active(limit_trigger)?;
        tracing::debug!(%profile, %trigger, "resolving built-in profile");
        profile.board_map(trigger).resolve()?
    };
    print(&table, json)
}

/// Print a table as text or JSON.
pub(crate) fn print(table: &ResolvedTable<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
    } else {
        print!("{}", Report(table));
    }
    Ok(())
}

/// Human-readable rendering of a table.
pub(crate) struct Report<'t, 'a>(pub &'t ResolvedTable<'a>);

impl fmt::Display for Report<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;
        writeln!(f, "=== Board: {} ({}) ===", table.name, table.mcu)?;
        writeln!(f)?;

        writeln!(f, "--- Signals ---")?;
        for (signal, resource) in table.resources() {
            let port = resource.pin.port;
            write!(
                f,
                "  {:<18} {:<4} {:?}  PORT {}  DDR {}  PIN {}",
                signal.name(),
                resource.pin.to_string(),
                signal.direction(),
                port.output,
                port.ddr,
                port.input,
            )?;
            if let Some(vector) = resource.interrupt {
                write!(f, "  {vector}")?;
            }
            if let Some(timer) = resource.timer {
                write!(f, "  timer {} channel {}", timer.timer, timer.channel)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        writeln!(f, "--- Group masks ---")?;
        for (group, mask) in table.masks() {
            writeln!(f, "  {:<10} {mask}", group.name())?;
        }
        writeln!(f)?;

        writeln!(f, "--- Interrupts ---")?;
        write_interrupt(f, &table.limit_interrupt)?;
        write_interrupt(f, &table.control_interrupt)?;
        writeln!(f)?;

        let pwm = &table.spindle_pwm;
        writeln!(f, "--- Spindle PWM ---")?;
        writeln!(
            f,
            "  timer {} channel {}, {:?}, clk/{}",
            pwm.timer,
            pwm.channel,
            pwm.mode,
            pwm.prescaler.divisor()
        )?;
        writeln!(
            f,
            "  max {}  min {}  off {}  range {}",
            pwm.max, pwm.min, pwm.off, pwm.range
        )?;
        writeln!(f, "  TCCRA {} = 0x{:02X}", pwm.tccra, pwm.tccra_init)?;
        writeln!(f, "  TCCRB {} = 0x{:02X}", pwm.tccrb, pwm.tccrb_init)?;
        writeln!(f, "  OCR   {}  COM 0x{:02X}", pwm.compare, pwm.com_mask)?;
        match pwm.top_register {
            Some(top) => writeln!(f, "  TOP   {top} = 0x{:04X}", pwm.top_value)?,
            None => writeln!(f, "  TOP   fixed 0x{:04X}", pwm.top_value)?,
        }
        writeln!(f)?;

        writeln!(f, "--- Serial ---")?;
        writeln!(
            f,
            "  USART{}  {}  {}",
            table.serial.usart,
            table.serial.rx_vector(),
            table.serial.udre_vector()
        )
    }
}

fn write_interrupt(f: &mut fmt::Formatter<'_>, binding: &InterruptBinding) -> fmt::Result {
    let vectors: Vec<String> = binding.vectors().iter().map(ToString::to_string).collect();
    write!(
        f,
        "  {:<8} {:<13} {}",
        binding.group.name(),
        binding.trigger.name(),
        vectors.join(", ")
    )?;
    match binding.registers {
        InterruptRegisters::External {
            eicra,
            eicrb,
            eimsk,
        } => writeln!(
            f,
            "  EICRA 0x{eicra:02X}  EICRB 0x{eicrb:02X}  EIMSK 0x{eimsk:02X}"
        ),
        InterruptRegisters::PinChange {
            pcicr,
            pcmsk,
            pcmsk_bits,
            ..
        } => writeln!(
            f,
            "  PCICR 0x{pcicr:02X}  PCMSK {pcmsk} = 0x{pcmsk_bits:02X}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpumap_boards::ProfileId;
    use cpumap_core::TriggerEdge;

    #[test]
    fn report_lists_masks_and_registers() {
        let text = Report(&ACTIVE_TABLE).to_string();
        assert!(text.contains("=== Board: cpu-map-2560-initial (atmega2560) ==="));
        assert!(text.contains("step       PORTA 0b00011100"));
        assert!(text.contains("INT5_vect, INT6_vect, INT7_vect"));
        assert!(text.contains("PCINT0_vect  PCICR 0x01"));
        assert!(text.contains("timer 3 channel B, FastPwmOcrTop, clk/8"));
        assert!(text.contains("TCCRB 0x0091 = 0x1A"));
        assert!(text.contains("USART0_RX_vect"));
    }

    #[test]
    fn report_shows_the_chosen_edge() {
        let table = ProfileId::Mega2560Initial
            .board_map(TriggerEdge::RisingEdge)
            .resolve()
            .unwrap();
        let text = Report(&table).to_string();
        assert!(text.contains("rising-edge"));
        assert!(text.contains("EICRB 0xFC"));
    }

    #[test]
    fn show_variants_succeed() {
        assert!(run(None, None, false).is_ok());
        assert!(run(None, Some("falling-edge"), true).is_ok());
        assert!(run(Some("cpu-map-2560-initial"), None, false).is_ok());
        assert!(run(Some("nope"), None, false).is_err());
    }
}
