//! Board maps and the resolved resource table.
//!
//! A [`BoardMap`] is what a profile declares: the MCU, a pin per signal and
//! the interrupt, PWM and serial choices. [`resolve`] checks all of it and
//! produces a [`ResolvedTable`]. It is a `const fn`, so a built-in profile
//! resolves during compilation and a bad one fails the build.

use serde::{Serialize, Serializer};

use crate::error::ConfigError;
use crate::group::derive_group_masks;
use crate::interrupt::{bind_interrupt, GroupInterrupt, InterruptBinding, InterruptVector};
use crate::mcu::{Channel, McuModel};
use crate::port::{Pin, PinId, PortMask, PORT_WIDTH};
use crate::pwm::{bind_pwm, PwmBinding, PwmConfig};
use crate::signal::{GroupKind, Signal};

/// Pin declared for one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinBinding {
    pub signal: Signal,
    pub pin: PinId,
}

/// Everything a profile declares about one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardMap<'a> {
    pub name: &'a str,
    pub mcu: &'a McuModel,
    /// USART used by the serial protocol.
    pub serial: u8,
    pub bindings: &'a [PinBinding],
    pub limit_interrupt: Option<GroupInterrupt<'a>>,
    pub control_interrupt: Option<GroupInterrupt<'a>>,
    pub spindle_pwm: Option<PwmConfig>,
}

impl<'a> BoardMap<'a> {
    /// Interrupt declaration of a group. Groups that are not interrupt
    /// capable never carry one.
    pub const fn interrupt_for(&self, group: GroupKind) -> Option<GroupInterrupt<'a>> {
        if !group.interrupt_capable() {
            return None;
        }
        match group {
            GroupKind::Limit => self.limit_interrupt,
            GroupKind::Control => self.control_interrupt,
            _ => None,
        }
    }

    /// Resolve at load time, logging the outcome.
    pub fn resolve(&self) -> Result<ResolvedTable<'a>, ConfigError> {
        let span = tracing::debug_span!("resolve", board = self.name, mcu = self.mcu.name);
        let _entered = span.entered();
        match resolve(self) {
            Ok(table) => {
                tracing::debug!(
                    step = %table.mask(GroupKind::Step),
                    limit = %table.mask(GroupKind::Limit),
                    "board map resolved"
                );
                Ok(table)
            }
            Err(err) => {
                tracing::warn!(error = %err, "board map rejected");
                Err(err)
            }
        }
    }
}

/// Timer channel driving a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimerRef {
    pub timer: u8,
    pub channel: Channel,
}

/// Physical resource bound to one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resource {
    pub pin: Pin,
    pub interrupt: Option<InterruptVector>,
    pub timer: Option<TimerRef>,
}

/// USART handed to the serial protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SerialBinding {
    pub usart: u8,
}

impl SerialBinding {
    pub const fn rx_vector(&self) -> InterruptVector {
        InterruptVector::UsartRx(self.usart)
    }

    pub const fn udre_vector(&self) -> InterruptVector {
        InterruptVector::UsartUdre(self.usart)
    }
}

/// The resolved, immutable binding table of one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedTable<'a> {
    pub name: &'a str,
    pub mcu: &'static str,
    #[serde(serialize_with = "serialize_resources")]
    resources: [Resource; Signal::COUNT],
    #[serde(serialize_with = "serialize_masks")]
    masks: [PortMask; GroupKind::COUNT],
    pub spindle_pwm: PwmBinding,
    pub limit_interrupt: InterruptBinding,
    pub control_interrupt: InterruptBinding,
    pub serial: SerialBinding,
}

impl ResolvedTable<'_> {
    pub const fn resource(&self, signal: Signal) -> &Resource {
        &self.resources[signal.index()]
    }

    pub const fn pin(&self, signal: Signal) -> Pin {
        self.resources[signal.index()].pin
    }

    /// Combined mask of a group.
    pub const fn mask(&self, group: GroupKind) -> PortMask {
        self.masks[group.index()]
    }

    /// One-bit mask of a single signal.
    pub const fn signal_mask(&self, signal: Signal) -> PortMask {
        let pin = self.pin(signal);
        PortMask::from_validated(pin.port, 1 << pin.bit)
    }

    pub const fn interrupt(&self, group: GroupKind) -> Option<&InterruptBinding> {
        if !group.interrupt_capable() {
            return None;
        }
        match group {
            GroupKind::Limit => Some(&self.limit_interrupt),
            GroupKind::Control => Some(&self.control_interrupt),
            _ => None,
        }
    }

    pub fn resources(&self) -> impl Iterator<Item = (Signal, &Resource)> + '_ {
        Signal::ALL.into_iter().zip(self.resources.iter())
    }

    pub fn masks(&self) -> impl Iterator<Item = (GroupKind, PortMask)> + '_ {
        GroupKind::ALL.into_iter().zip(self.masks.iter().copied())
    }

    /// Every interrupt vector the firmware has to implement.
    pub fn vectors(&self) -> Vec<InterruptVector> {
        let mut vectors = self.limit_interrupt.vectors();
        vectors.extend(self.control_interrupt.vectors());
        vectors.push(self.serial.rx_vector());
        vectors.push(self.serial.udre_vector());
        vectors
    }
}

fn serialize_resources<S: Serializer>(
    resources: &[Resource; Signal::COUNT],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(Signal::ALL.iter().zip(resources.iter()))
}

fn serialize_masks<S: Serializer>(
    masks: &[PortMask; GroupKind::COUNT],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(GroupKind::ALL.iter().zip(masks.iter()))
}

/// Interrupt-capable groups must sit on distinct ports.
const fn check_input_ports(masks: &[PortMask; GroupKind::COUNT]) -> Result<(), ConfigError> {
    let mut i = 0;
    while i < GroupKind::COUNT {
        let first = GroupKind::ALL[i];
        let mut j = i + 1;
        while first.interrupt_capable() && j < GroupKind::COUNT {
            let second = GroupKind::ALL[j];
            let port = masks[i].port().id;
            if second.interrupt_capable() && port.same(masks[j].port().id) {
                return Err(ConfigError::SharedInputPort {
                    first,
                    second,
                    port,
                });
            }
            j += 1;
        }
        i += 1;
    }
    Ok(())
}

/// Resolve a board map into its binding table.
///
/// Checks run in a fixed order (pins, groups, input ports, interrupts, PWM,
/// serial) and the first failure is returned.
pub const fn resolve<'a>(map: &BoardMap<'a>) -> Result<ResolvedTable<'a>, ConfigError> {
    let pins = const_try!(bind_signals(map.mcu, map.bindings));
    let masks = const_try!(derive_group_masks(&pins));

    const_try!(check_input_ports(&masks));

    let limit_interrupt = const_try!(bind_interrupt(
        map.mcu,
        GroupKind::Limit,
        map.interrupt_for(GroupKind::Limit),
        &masks[GroupKind::Limit.index()],
        &pins
    ));
    let control_interrupt = const_try!(bind_interrupt(
        map.mcu,
        GroupKind::Control,
        map.interrupt_for(GroupKind::Control),
        &masks[GroupKind::Control.index()],
        &pins
    ));
    let spindle_pwm = const_try!(bind_pwm(
        map.mcu,
        map.spindle_pwm,
        pins[Signal::SpindlePwm.index()]
    ));
    if map.serial >= map.mcu.usart_count {
        return Err(ConfigError::UnknownUsart { usart: map.serial });
    }

    let mut resources = [Resource {
        pin: pins[0],
        interrupt: None,
        timer: None,
    }; Signal::COUNT];
    let mut i = 0;
    while i < Signal::COUNT {
        let signal = Signal::ALL[i];
        let declared = match signal.group() {
            Some(group) => map.interrupt_for(group),
            None => None,
        };
        let interrupt = match declared {
            Some(decl) => decl.vector_for(signal),
            None => None,
        };
        let timer = if signal.same(Signal::SpindlePwm) {
            Some(TimerRef {
                timer: spindle_pwm.timer,
                channel: spindle_pwm.channel,
            })
        } else {
            None
        };
        resources[i] = Resource {
            pin: pins[i],
            interrupt,
            timer,
        };
        i += 1;
    }

    Ok(ResolvedTable {
        name: map.name,
        mcu: map.mcu.name,
        resources,
        masks,
        spindle_pwm,
        limit_interrupt,
        control_interrupt,
        serial: SerialBinding { usart: map.serial },
    })
}

/// Resolve every declared pin against the MCU's ports.
///
/// Each signal must be bound exactly once and no two signals may share a pin.
pub(crate) const fn bind_signals(
    mcu: &McuModel,
    bindings: &[PinBinding],
) -> Result<[Pin; Signal::COUNT], ConfigError> {
    let mut slots: [Option<Pin>; Signal::COUNT] = [None; Signal::COUNT];
    let mut i = 0;
    while i < bindings.len() {
        let PinBinding { signal, pin } = bindings[i];
        let port = match mcu.port(pin.port) {
            Some(p) => p,
            None => {
                return Err(ConfigError::UnknownPort {
                    signal,
                    port: pin.port,
                })
            }
        };
        if pin.bit >= PORT_WIDTH {
            return Err(ConfigError::BitOutOfRange {
                signal,
                bit: pin.bit,
                width: PORT_WIDTH,
            });
        }
        if slots[signal.index()].is_some() {
            return Err(ConfigError::DuplicateBinding { signal });
        }
        let mut j = 0;
        while j < i {
            if bindings[j].pin.same(&pin) {
                return Err(ConfigError::PinConflict {
                    first: bindings[j].signal,
                    second: signal,
                    pin,
                });
            }
            j += 1;
        }
        slots[signal.index()] = Some(Pin {
            port,
            bit: pin.bit,
        });
        i += 1;
    }

    let first = match slots[0] {
        Some(p) => p,
        None => {
            return Err(ConfigError::MissingSignal {
                signal: Signal::ALL[0],
            })
        }
    };
    let mut pins = [first; Signal::COUNT];
    let mut s = 1;
    while s < Signal::COUNT {
        pins[s] = match slots[s] {
            Some(p) => p,
            None => {
                return Err(ConfigError::MissingSignal {
                    signal: Signal::ALL[s],
                })
            }
        };
        s += 1;
    }
    Ok(pins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{rebind, BINDINGS, MAP, TEST_MCU};
    use crate::interrupt::{InterruptRegisters, TriggerEdge};
    use crate::port::PortId;

    fn with_bindings(bindings: &[PinBinding]) -> Result<ResolvedTable<'_>, ConfigError> {
        resolve(&BoardMap { bindings, ..MAP })
    }

    #[test]
    fn fixture_resolves() {
        let table = MAP.resolve().unwrap();
        assert_eq!(table.name, "fixture");
        assert_eq!(table.mcu, "test-mcu");
        assert_eq!(table.mask(GroupKind::Step).bits(), 28);
        assert_eq!(table.mask(GroupKind::Direction).bits(), 0b1110_0000);
        assert_eq!(table.mask(GroupKind::Limit).bits(), 0b1110_0000);
        assert_eq!(table.mask(GroupKind::Control).bits(), 0b1111_0000);
        assert_eq!(table.signal_mask(Signal::Probe).bits(), 0b0000_0001);
        assert_eq!(table.signal_mask(Signal::StepperEnable).bits(), 0b0001_0000);
        assert_eq!(table.pin(Signal::SpindlePwm).id(), PinId::new(PortId::E, 4));
        assert_eq!(table.spindle_pwm.range, 1023);
    }

    #[test]
    fn resources_carry_vectors_and_timers() {
        let table = resolve(&MAP).unwrap();
        assert_eq!(
            table.resource(Signal::YLimit).interrupt,
            Some(InterruptVector::External(6))
        );
        assert_eq!(
            table.resource(Signal::SafetyDoor).interrupt,
            Some(InterruptVector::PinChange(0))
        );
        assert_eq!(table.resource(Signal::XStep).interrupt, None);
        assert_eq!(
            table.resource(Signal::SpindlePwm).timer,
            Some(TimerRef {
                timer: 3,
                channel: Channel::B
            })
        );
        assert_eq!(table.resource(Signal::Probe).timer, None);
        assert_eq!(table.resources().count(), Signal::COUNT);
    }

    #[test]
    fn interrupts_per_group() {
        let table = resolve(&MAP).unwrap();
        let limit = table.interrupt(GroupKind::Limit).unwrap();
        assert_eq!(limit.trigger, TriggerEdge::AnyEdge);
        assert!(matches!(
            limit.registers,
            InterruptRegisters::External { eimsk: 0xE0, .. }
        ));
        assert!(table.interrupt(GroupKind::Step).is_none());
        assert_eq!(
            table.vectors(),
            vec![
                InterruptVector::External(5),
                InterruptVector::External(6),
                InterruptVector::External(7),
                InterruptVector::PinChange(0),
                InterruptVector::UsartRx(0),
                InterruptVector::UsartUdre(0),
            ]
        );
    }

    #[test]
    fn only_input_groups_declare_interrupts() {
        for group in GroupKind::ALL {
            assert_eq!(
                MAP.interrupt_for(group).is_some(),
                group.interrupt_capable()
            );
        }
        assert_eq!(MAP.interrupt_for(GroupKind::Limit), MAP.limit_interrupt);
        assert_eq!(MAP.interrupt_for(GroupKind::Control), MAP.control_interrupt);
    }

    #[test]
    fn resolving_twice_is_identical() {
        assert_eq!(resolve(&MAP), resolve(&MAP));
    }

    #[test]
    fn resolves_in_constant_evaluation() {
        const TABLE: Result<ResolvedTable<'static>, ConfigError> = resolve(&MAP);
        const STEP: u8 = match &TABLE {
            Ok(table) => table.mask(GroupKind::Step).bits(),
            Err(_) => 0,
        };
        assert_eq!(STEP, 28);
    }

    #[test]
    fn missing_signal_yields_no_table() {
        let partial: Vec<PinBinding> = BINDINGS
            .iter()
            .copied()
            .filter(|b| b.signal != Signal::Probe)
            .collect();
        assert_eq!(
            with_bindings(&partial).unwrap_err(),
            ConfigError::MissingSignal {
                signal: Signal::Probe
            }
        );
    }

    #[test]
    fn duplicate_binding() {
        let mut doubled = BINDINGS.to_vec();
        doubled.push(PinBinding {
            signal: Signal::CoolantMist,
            pin: PinId::new(PortId::D, 1),
        });
        assert_eq!(
            with_bindings(&doubled).unwrap_err(),
            ConfigError::DuplicateBinding {
                signal: Signal::CoolantMist
            }
        );
    }

    #[test]
    fn pin_conflict_across_groups() {
        let bindings = rebind(Signal::Probe, PortId::A, 2);
        assert_eq!(
            with_bindings(&bindings).unwrap_err(),
            ConfigError::PinConflict {
                first: Signal::XStep,
                second: Signal::Probe,
                pin: PinId::new(PortId::A, 2),
            }
        );
    }

    #[test]
    fn port_must_exist_and_bit_must_fit() {
        let bindings = rebind(Signal::CoolantMist, PortId::G, 0);
        assert_eq!(
            with_bindings(&bindings).unwrap_err(),
            ConfigError::UnknownPort {
                signal: Signal::CoolantMist,
                port: PortId::G
            }
        );
        let bindings = rebind(Signal::CoolantMist, PortId::F, 8);
        assert!(matches!(
            with_bindings(&bindings).unwrap_err(),
            ConfigError::BitOutOfRange { bit: 8, .. }
        ));
    }

    #[test]
    fn step_bit_collision_fails() {
        let bindings = rebind(Signal::ZStep, PortId::A, 2);
        assert!(matches!(
            with_bindings(&bindings).unwrap_err(),
            ConfigError::PinConflict { .. }
        ));
        let bindings = rebind(Signal::ZStep, PortId::D, 4);
        assert_eq!(
            with_bindings(&bindings).unwrap_err(),
            ConfigError::PortMismatch {
                group: GroupKind::Step,
                signal: Signal::ZStep
            }
        );
    }

    #[test]
    fn control_and_limit_need_separate_ports() {
        let mut bindings = BINDINGS.to_vec();
        for (signal, bit) in [
            (Signal::Reset, 0),
            (Signal::FeedHold, 1),
            (Signal::CycleStart, 2),
            (Signal::SafetyDoor, 3),
        ] {
            for b in bindings.iter_mut().filter(|b| b.signal == signal) {
                b.pin = PinId::new(PortId::E, bit);
            }
        }
        bindings.retain(|b| b.signal != Signal::SpindlePwm);
        bindings.push(PinBinding {
            signal: Signal::SpindlePwm,
            pin: PinId::new(PortId::D, 0),
        });
        assert_eq!(
            with_bindings(&bindings).unwrap_err(),
            ConfigError::SharedInputPort {
                first: GroupKind::Limit,
                second: GroupKind::Control,
                port: PortId::E,
            }
        );
    }

    #[test]
    fn missing_interrupt_and_pwm() {
        let err = resolve(&BoardMap {
            limit_interrupt: None,
            ..MAP
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingInterrupt {
                group: GroupKind::Limit
            }
        );
        let err = resolve(&BoardMap {
            spindle_pwm: None,
            ..MAP
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingPwm);
    }

    #[test]
    fn serial_usart_must_exist() {
        let err = resolve(&BoardMap { serial: 1, ..MAP }).unwrap_err();
        assert_eq!(err, ConfigError::UnknownUsart { usart: 1 });
        assert_eq!(TEST_MCU.usart_count, 1);
    }

    #[test]
    fn serializes_by_name() {
        let table = resolve(&MAP).unwrap();
        let json = serde_json::to_value(table).unwrap();
        assert_eq!(json["resources"]["x-step"]["pin"]["bit"], 2);
        assert_eq!(json["masks"]["step"]["bits"], 28);
        assert_eq!(json["spindle-pwm"]["range"], 1023);
        assert_eq!(json["limit-interrupt"]["trigger"], "any-edge");
    }
}
