//! Hardware resource model for motion-control pin maps.
//!
//! A board profile declares which port bit, interrupt line and timer channel
//! implements each logical machine signal. This crate resolves such a
//! declaration into an immutable [`ResolvedTable`]:
//!
//! - **Signal binding table:** every required [`Signal`] bound to a [`Pin`]
//! - **Group masks:** step, direction, limit and control signals share one
//!   port and combine into a validated [`PortMask`]
//! - **Interrupt binding:** limit and control groups get vectors and an
//!   explicit [`TriggerEdge`]
//! - **PWM binding:** the spindle timer channel, its register init values and
//!   the duty-cycle scale
//!
//! Resolution is a `const fn`, so a table built from a `const` declaration is
//! checked by the compiler: an invalid profile fails the build.

/// `?` for `const fn`, where the `Try` trait is unavailable.
macro_rules! const_try {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(e) => return Err(e),
        }
    };
}

pub mod error;
pub mod group;
pub mod interrupt;
pub mod mcu;
pub mod port;
pub mod pwm;
pub mod signal;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::ConfigError;
pub use group::derive_mask;
pub use interrupt::{
    GroupInterrupt, InterruptBinding, InterruptRegisters, InterruptSource, InterruptVector,
    SignalLine, TriggerEdge,
};
pub use mcu::{Channel, ExternalLine, McuModel, PinChangeBank, Timer, TimerChannel};
pub use port::{Pin, PinId, Port, PortId, PortMask, RegisterAddr, PORT_WIDTH};
pub use pwm::{Prescaler, PwmBinding, PwmConfig, WaveformMode};
pub use signal::{GroupKind, Signal, SignalDirection};
pub use table::{resolve, BoardMap, PinBinding, ResolvedTable, Resource, SerialBinding, TimerRef};
