//! Spindle PWM timer binding.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mcu::{Channel, McuModel};
use crate::port::{Pin, RegisterAddr};

/// 16-bit timer fast PWM modes usable for the spindle output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaveformMode {
    /// Mode 7, counter top fixed at `0x03FF`.
    FastPwm10Bit,
    /// Mode 14, counter top in `ICRn`.
    FastPwmIcrTop,
    /// Mode 15, counter top in `OCRnA`.
    FastPwmOcrTop,
}

impl WaveformMode {
    /// `WGMn3:0`.
    pub const fn wgm(self) -> u8 {
        match self {
            WaveformMode::FastPwm10Bit => 7,
            WaveformMode::FastPwmIcrTop => 14,
            WaveformMode::FastPwmOcrTop => 15,
        }
    }

    pub const fn fixed_top(self) -> Option<u16> {
        match self {
            WaveformMode::FastPwm10Bit => Some(0x03FF),
            _ => None,
        }
    }
}

/// Timer clock prescaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Prescaler {
    Div1,
    Div8,
    Div64,
    Div256,
    Div1024,
}

impl Prescaler {
    /// Clock select bits `CSn2:0`.
    pub const fn cs_bits(self) -> u8 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div8 => 2,
            Prescaler::Div64 => 3,
            Prescaler::Div256 => 4,
            Prescaler::Div1024 => 5,
        }
    }

    /// Timer clock divisor, `clk/N`.
    pub const fn divisor(self) -> u16 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }
}

/// PWM declaration of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PwmConfig {
    pub timer: u8,
    pub channel: Channel,
    pub mode: WaveformMode,
    pub prescaler: Prescaler,
    pub max: u16,
    pub min: u16,
    pub off: u16,
    /// Counter top written to the top register.
    pub top: u16,
}

/// Resolved PWM output: duty scale plus the register values that start it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PwmBinding {
    pub max: u16,
    pub min: u16,
    pub off: u16,
    /// `max - min`.
    pub range: u16,
    pub timer: u8,
    pub channel: Channel,
    pub mode: WaveformMode,
    pub prescaler: Prescaler,
    pub tccra: RegisterAddr,
    /// Waveform bits of `TCCRnA`, before the output is enabled.
    pub tccra_init: u8,
    pub tccrb: RegisterAddr,
    /// Waveform and clock select bits of `TCCRnB`.
    pub tccrb_init: u8,
    /// `OCRnx` of the output channel.
    pub compare: RegisterAddr,
    /// `COMnx1`; set in `TCCRnA` to connect the output.
    pub com_mask: u8,
    /// `None` when the mode has a fixed top.
    pub top_register: Option<RegisterAddr>,
    pub top_value: u16,
}

impl PwmBinding {
    /// Compare value for an output ratio.
    ///
    /// Zero (or less) yields `off`; anything in `(0, 1]` scales linearly onto
    /// `[min, max]`. Ratios above one are clamped.
    pub fn duty(&self, ratio: f32) -> u16 {
        if ratio.is_nan() || ratio <= 0.0 {
            return self.off;
        }
        let ratio = ratio.min(1.0);
        let scaled = (ratio * f32::from(self.range)).round() as u16;
        self.min + scaled.min(self.range)
    }
}

/// Check a PWM declaration against the MCU and the spindle-PWM pin.
pub(crate) const fn bind_pwm(
    mcu: &McuModel,
    config: Option<PwmConfig>,
    output: Pin,
) -> Result<PwmBinding, ConfigError> {
    let cfg = match config {
        Some(c) => c,
        None => return Err(ConfigError::MissingPwm),
    };
    let timer = match mcu.timer(cfg.timer) {
        Some(t) => t,
        None => return Err(ConfigError::UnknownTimer { timer: cfg.timer }),
    };
    let channel = match timer.channel(cfg.channel) {
        Some(c) => c,
        None => {
            return Err(ConfigError::UnknownTimerChannel {
                timer: cfg.timer,
                channel: cfg.channel,
            })
        }
    };
    if !channel.output.same(&output.id()) {
        return Err(ConfigError::PwmPinMismatch {
            timer: cfg.timer,
            channel: cfg.channel,
        });
    }
    let top_register = match cfg.mode {
        WaveformMode::FastPwmOcrTop => {
            if cfg.channel.same(Channel::A) {
                return Err(ConfigError::PwmChannelIsTop { timer: cfg.timer });
            }
            match timer.channel(Channel::A) {
                Some(a) => Some(a.compare),
                None => {
                    return Err(ConfigError::UnknownTimerChannel {
                        timer: cfg.timer,
                        channel: Channel::A,
                    })
                }
            }
        }
        WaveformMode::FastPwmIcrTop => Some(timer.icr),
        WaveformMode::FastPwm10Bit => None,
    };

    if cfg.min == 0 {
        return Err(ConfigError::PwmMinNotPositive);
    }
    if cfg.max <= cfg.min {
        return Err(ConfigError::PwmRangeEmpty {
            min: cfg.min,
            max: cfg.max,
        });
    }
    if cfg.off != 0 {
        return Err(ConfigError::PwmOffNonZero { off: cfg.off });
    }
    let top = match cfg.mode.fixed_top() {
        Some(fixed) => fixed,
        None => cfg.top,
    };
    if cfg.top != top || top != cfg.max {
        return Err(ConfigError::PwmTopMismatch {
            top: cfg.top,
            max: cfg.max,
        });
    }

    let wgm = cfg.mode.wgm();
    Ok(PwmBinding {
        max: cfg.max,
        min: cfg.min,
        off: cfg.off,
        range: cfg.max - cfg.min,
        timer: cfg.timer,
        channel: cfg.channel,
        mode: cfg.mode,
        prescaler: cfg.prescaler,
        tccra: timer.tccra,
        tccra_init: wgm & 0b11,
        tccrb: timer.tccrb,
        tccrb_init: (((wgm >> 2) & 0b11) << 3) | cfg.prescaler.cs_bits(),
        compare: channel.compare,
        com_mask: 1 << cfg.channel.com_bit(),
        top_register,
        top_value: top,
    })
}
