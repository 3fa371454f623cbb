//! This module contains the types exchanged with the 9129B.

use strum_macros::EnumIter;
use thiserror::Error;

use crate::command::Command;

/// Number of output channels on the supply.
pub const CHANNEL_COUNT: usize = 3;

/// One value per channel, in the order the device reports them.
pub type ChannelValues<T> = heapless::Vec<T, CHANNEL_COUNT>;

/// Raised when converting a raw number into one of our types.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    #[error("No such channel: {0}")]
    InvalidChannel(u8),
    #[error("No such output mode: {0}")]
    InvalidMode(u8),
}

/// An output channel of the supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
#[repr(u8)]
pub enum Channel {
    Ch1 = 1,
    Ch2 = 2,
    /// Always independent, whatever the output mode.
    Ch3 = 3,
}

impl Channel {
    /// The channel number as used by `INST:NSEL`.
    pub const fn number(&self) -> u8 {
        *self as u8
    }
}

impl From<Channel> for u8 {
    fn from(value: Channel) -> Self {
        value.number()
    }
}

impl TryFrom<u8> for Channel {
    type Error = ConversionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Channel::Ch1),
            2 => Ok(Channel::Ch2),
            3 => Ok(Channel::Ch3),
            _ => Err(ConversionError::InvalidChannel(value)),
        }
    }
}

/// How channels 1 and 2 are wired together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
#[repr(u8)]
pub enum OutputMode {
    /// All channels are treated as independent.
    #[default]
    Independent = 0,
    /// Channels 1+2 in series with shared limits. The voltage set point is the sum of the pair.
    Series = 1,
    /// Channels 1+2 in parallel with shared limits. The current set point is the sum of the pair.
    Parallel = 2,
}

impl OutputMode {
    /// Whether `channel` is tied to another channel in this mode.
    pub fn is_coupled(&self, channel: Channel) -> bool {
        *self != OutputMode::Independent && channel != Channel::Ch3
    }
}

impl From<OutputMode> for u8 {
    fn from(value: OutputMode) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for OutputMode {
    type Error = ConversionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            t if t == OutputMode::Independent as u8 => Ok(OutputMode::Independent),
            t if t == OutputMode::Series as u8 => Ok(OutputMode::Series),
            t if t == OutputMode::Parallel as u8 => Ok(OutputMode::Parallel),
            _ => Err(ConversionError::InvalidMode(value)),
        }
    }
}

/// The two set point quantities. Both go through the same write-and-verify cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Volts.
    Voltage,
    /// Amps.
    Current,
}

impl Quantity {
    pub(crate) const fn set_command(&self) -> Command {
        match self {
            Quantity::Voltage => Command::SetVoltage,
            Quantity::Current => Command::SetCurrent,
        }
    }

    /// The read-back query. Depends on the selected channel.
    pub(crate) const fn readback_command(&self) -> Command {
        match self {
            Quantity::Voltage => Command::GetVoltageSetpoint,
            Quantity::Current => Command::GetCurrentSetpoint,
        }
    }
}

/// Baud rates the 9129B can be configured for. Framing is always 8N1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum BaudRate {
    _4800,
    /// This is the default baud rate.
    #[default]
    _9600,
    _38400,
}

impl BaudRate {
    /// Bits per second, for whoever opens the port.
    pub const fn bits_per_second(&self) -> u32 {
        match self {
            BaudRate::_4800 => 4800,
            BaudRate::_9600 => 9600,
            BaudRate::_38400 => 38400,
        }
    }
}

impl From<BaudRate> for u32 {
    fn from(value: BaudRate) -> Self {
        value.bits_per_second()
    }
}

/// Everything [`get_status`](crate::psu::Bk9129b::get_status) reads in one go.
///
/// The five lists come from five separate queries, so they may describe slightly
/// different moments.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub output_enable: ChannelValues<bool>,
    /// Measured.
    pub output_current: ChannelValues<f64>,
    /// Measured.
    pub output_voltage: ChannelValues<f64>,
    /// Set point.
    pub target_current: ChannelValues<f64>,
    /// Set point.
    pub target_voltage: ChannelValues<f64>,
}
