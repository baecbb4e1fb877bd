//! Board descriptions: a profile written as data instead of code.
//!
//! A [`BoardDescription`] is the serde form of a board map, stored in
//! `.board.toml` files. It is lowered into an owned [`LoweredBoard`], which
//! lends out a [`BoardMap`] for resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cpumap_core::{
    BoardMap, GroupInterrupt, GroupKind, InterruptSource, McuModel, PinBinding, PinId, PwmConfig,
    ResolvedTable, Signal, SignalLine, TriggerEdge,
};

use crate::error::{BoardError, Result};
use crate::mcu;

/// A complete board description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BoardDescription {
    /// Board name.
    pub name: String,
    /// MCU model name (e.g. "atmega2560").
    pub mcu: String,
    /// USART used by the serial protocol.
    pub serial: u8,
    /// Pin name per signal, e.g. `x-step = "PA2"`.
    pub pins: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_interrupt: Option<InterruptDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_interrupt: Option<InterruptDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spindle_pwm: Option<PwmConfig>,
}

/// Interrupt declaration of one input group.
///
/// Give either `lines` (one external line per signal) or `pin-change-bank`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InterruptDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_change_bank: Option<u8>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lines: BTreeMap<String, u8>,
}

impl BoardDescription {
    /// Describe an existing board map.
    pub fn from_map(map: &BoardMap<'_>) -> Self {
        Self {
            name: map.name.to_string(),
            mcu: map.mcu.name.to_string(),
            serial: map.serial,
            pins: map
                .bindings
                .iter()
                .map(|b| (b.signal.name().to_string(), b.pin.to_string()))
                .collect(),
            limit_interrupt: map.limit_interrupt.as_ref().map(InterruptDescription::from_decl),
            control_interrupt: map
                .control_interrupt
                .as_ref()
                .map(InterruptDescription::from_decl),
            spindle_pwm: map.spindle_pwm,
        }
    }

    /// Check names and pins and convert into an owned board.
    ///
    /// Only syntax is checked here; hardware consistency is left to
    /// [`LoweredBoard::resolve`].
    pub fn lower(&self) -> Result<LoweredBoard> {
        let mcu = mcu::by_name(&self.mcu).ok_or_else(|| BoardError::UnknownMcu {
            name: self.mcu.clone(),
        })?;

        let mut bindings = Vec::with_capacity(self.pins.len());
        for (name, pin_name) in &self.pins {
            let signal = parse_signal(name)?;
            let pin = PinId::parse(pin_name).ok_or_else(|| BoardError::InvalidPin {
                signal,
                name: pin_name.clone(),
            })?;
            bindings.push(PinBinding { signal, pin });
        }
        // Declaration order, so errors name signals the same way built-in profiles do.
        bindings.sort_by_key(|b| b.signal);

        let limit = lower_interrupt(GroupKind::Limit, self.limit_interrupt.as_ref())?;
        let control = lower_interrupt(GroupKind::Control, self.control_interrupt.as_ref())?;

        tracing::debug!(
            board = %self.name,
            mcu = mcu.name,
            pins = bindings.len(),
            "lowered board description"
        );
        Ok(LoweredBoard {
            name: self.name.clone(),
            mcu,
            serial: self.serial,
            bindings,
            limit,
            control,
            spindle_pwm: self.spindle_pwm,
        })
    }
}

impl InterruptDescription {
    fn from_decl(decl: &GroupInterrupt<'_>) -> Self {
        let mut out = InterruptDescription {
            trigger: decl.trigger,
            ..Default::default()
        };
        match decl.source {
            InterruptSource::External(lines) => {
                out.lines = lines
                    .iter()
                    .map(|l| (l.signal.name().to_string(), l.line))
                    .collect();
            }
            InterruptSource::PinChange(bank) => out.pin_change_bank = Some(bank),
        }
        out
    }
}

fn parse_signal(name: &str) -> Result<Signal> {
    Signal::from_name(name).ok_or_else(|| BoardError::UnknownSignal {
        name: name.to_string(),
    })
}

fn lower_interrupt(
    group: GroupKind,
    desc: Option<&InterruptDescription>,
) -> Result<Option<LoweredInterrupt>> {
    let Some(desc) = desc else {
        return Ok(None);
    };
    let source = match (desc.pin_change_bank, desc.lines.is_empty()) {
        (Some(_), false) => return Err(BoardError::AmbiguousInterrupt { group }),
        (Some(bank), true) => LoweredSource::PinChange(bank),
        (None, false) => {
            let mut lines = Vec::with_capacity(desc.lines.len());
            for (name, &line) in &desc.lines {
                lines.push(SignalLine {
                    signal: parse_signal(name)?,
                    line,
                });
            }
            lines.sort_by_key(|l| l.signal);
            LoweredSource::External(lines)
        }
        (None, true) => return Ok(None),
    };
    Ok(Some(LoweredInterrupt {
        source,
        trigger: desc.trigger,
    }))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoweredSource {
    External(Vec<SignalLine>),
    PinChange(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LoweredInterrupt {
    source: LoweredSource,
    trigger: Option<TriggerEdge>,
}

impl LoweredInterrupt {
    fn declaration(&self) -> GroupInterrupt<'_> {
        let source = match &self.source {
            LoweredSource::External(lines) => InterruptSource::External(lines),
            LoweredSource::PinChange(bank) => InterruptSource::PinChange(*bank),
        };
        GroupInterrupt {
            source,
            trigger: self.trigger,
        }
    }
}

/// A board description with names parsed, ready to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweredBoard {
    name: String,
    mcu: &'static McuModel,
    serial: u8,
    bindings: Vec<PinBinding>,
    limit: Option<LoweredInterrupt>,
    control: Option<LoweredInterrupt>,
    spindle_pwm: Option<PwmConfig>,
}

impl LoweredBoard {
    pub fn board_map(&self) -> BoardMap<'_> {
        BoardMap {
            name: &self.name,
            mcu: self.mcu,
            serial: self.serial,
            bindings: &self.bindings,
            limit_interrupt: self.limit.as_ref().map(LoweredInterrupt::declaration),
            control_interrupt: self.control.as_ref().map(LoweredInterrupt::declaration),
            spindle_pwm: self.spindle_pwm,
        }
    }

    pub fn resolve(&self) -> Result<ResolvedTable<'_>> {
        Ok(self.board_map().resolve()?)
    }
}
