//! Group mask derivation.
//!
//! Signals in a group are written or sampled with one register access, which
//! is only atomic when they share a port. Deriving the mask proves that and
//! rejects overlapping bits.

use crate::error::ConfigError;
use crate::port::{Pin, PortMask, PORT_WIDTH};
use crate::signal::{GroupKind, Signal};

/// Combine the pins of `group`'s members into one mask.
///
/// Fails if a member belongs to another group, sits on a different port,
/// uses a bit outside the register, or shares a bit with another member.
/// Member counts are small, so overlap is checked pairwise.
pub const fn derive_mask(
    group: GroupKind,
    members: &[(Signal, Pin)],
) -> Result<PortMask, ConfigError> {
    if members.is_empty() {
        return Err(ConfigError::EmptyGroup { group });
    }
    let port = members[0].1.port;
    let mut bits = 0u8;
    let mut i = 0;
    while i < members.len() {
        let (signal, pin) = members[i];
        if !signal.in_group(group) {
            return Err(ConfigError::ForeignSignal { group, signal });
        }
        if pin.bit >= PORT_WIDTH {
            return Err(ConfigError::BitOutOfRange {
                signal,
                bit: pin.bit,
                width: PORT_WIDTH,
            });
        }
        if !pin.port.same_as(&port) {
            return Err(ConfigError::PortMismatch { group, signal });
        }
        let mut j = 0;
        while j < i {
            if members[j].1.bit == pin.bit {
                return Err(ConfigError::SharedBit {
                    group,
                    first: members[j].0,
                    second: signal,
                    bit: pin.bit,
                });
            }
            j += 1;
        }
        bits |= 1 << pin.bit;
        i += 1;
    }
    Ok(PortMask::from_validated(port, bits))
}

/// Collect the resolved pins of `group`'s members.
///
/// Returns a fixed buffer and the number of members written to it.
pub(crate) const fn members_of(
    group: GroupKind,
    pins: &[Pin; Signal::COUNT],
) -> ([(Signal, Pin); GroupKind::MAX_MEMBERS], usize) {
    let signals = group.members();
    let mut out = [(signals[0], pins[signals[0].index()]); GroupKind::MAX_MEMBERS];
    let mut i = 0;
    while i < signals.len() {
        out[i] = (signals[i], pins[signals[i].index()]);
        i += 1;
    }
    (out, signals.len())
}

/// Derive every group's mask from a complete set of resolved pins.
pub(crate) const fn derive_group_masks(
    pins: &[Pin; Signal::COUNT],
) -> Result<[PortMask; GroupKind::COUNT], ConfigError> {
    let first = {
        let (members, len) = members_of(GroupKind::Step, pins);
        const_try!(derive_mask(GroupKind::Step, members.split_at(len).0))
    };
    let mut masks = [first; GroupKind::COUNT];
    let mut g = 1;
    while g < GroupKind::COUNT {
        let group = GroupKind::ALL[g];
        let (members, len) = members_of(group, pins);
        masks[g] = const_try!(derive_mask(group, members.split_at(len).0));
        g += 1;
    }
    Ok(masks)
}
