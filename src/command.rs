//! This module defines the command set understood by the 9129B.
//!
//! Every token must match the firmware's vocabulary verbatim. Queries end in `?` and are
//! answered with exactly one line; everything else gets no reply at all.

use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Prepended to every outgoing line. The 9129B uses none.
pub const START_BYTE: &str = "";

/// Terminates every outgoing command and every reply.
pub const END_BYTE: &str = "\n";

/// Byte form of [`END_BYTE`], used when scanning replies.
pub const END_BYTE_U8: u8 = b'\n';

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, EnumCountMacro)]
pub enum Command {
    /// Clear a tripped protection on the supply.
    ClearProtection,
    /// __Q__ - Current set point of the selected channel.
    ///
    /// __Note:__ Undocumented. Answers for whichever channel is selected.
    GetCurrentSetpoint,
    /// __Q__ - Voltage set point of the selected channel.
    ///
    /// __Note:__ Undocumented. Answers for whichever channel is selected.
    GetVoltageSetpoint,
    /// __Q__ - Number of the active channel.
    GetChannel,
    /// __Q__ - Measured output current of the selected channel.
    MeasureCurrent,
    /// __Q__ - Measured output current of all channels.
    MeasureCurrentAll,
    /// __Q__ - Measured output voltage of the selected channel.
    MeasureVoltage,
    /// __Q__ - Measured output voltage of all channels.
    MeasureVoltageAll,
    /// __Q__ - Output state of all channels.
    GetOutputStateAll,
    /// __Q__ - Current set points of all channels.
    GetCurrentSetpointAll,
    /// __Q__ - Voltage set points of all channels.
    GetVoltageSetpointAll,
    /// __Q__ - Output state of the selected channel.
    GetOutputState,
    /// __Q__ - `1` when channels 1+2 are in series.
    IsSeries,
    /// __Q__ - `1` when channels 1+2 are in parallel.
    IsParallel,
    /// Output on/off. Takes `0` or `1`.
    OutputState,
    /// Series mode on/off. Takes `0` or `1`.
    SeriesMode,
    /// Parallel mode on/off. Takes `0` or `1`.
    ParallelMode,
    /// Return to front panel (local) control.
    RemoteDisable,
    /// Take remote control of the supply.
    RemoteEnable,
    /// Select the active channel. Takes the channel number.
    SelectChannel,
    /// Current set point of the selected channel. Takes e.g. `150.000mA` or `1.500A`.
    SetCurrent,
    /// Voltage set point of the selected channel. Takes e.g. `12.00`.
    SetVoltage,
}

impl Command {
    /// The literal wire token for this command.
    pub const fn token(&self) -> &'static str {
        match self {
            Command::ClearProtection => "OUTP:PROT:CLE",
            Command::GetCurrentSetpoint => "SOUR:CURR?",
            Command::GetVoltageSetpoint => "SOUR:VOLT?",
            Command::GetChannel => "INST:NSEL?",
            Command::MeasureCurrent => "MEAS:CURR?",
            Command::MeasureCurrentAll => "MEAS:CURR:ALL?",
            Command::MeasureVoltage => "MEAS:VOLT?",
            Command::MeasureVoltageAll => "MEAS:VOLT:ALL?",
            Command::GetOutputStateAll => "SOUR:APP:OUT?",
            Command::GetCurrentSetpointAll => "SOUR:APP:CURR?",
            Command::GetVoltageSetpointAll => "SOUR:APP:VOLT?",
            Command::GetOutputState => "OUTP:STAT?",
            Command::IsSeries => "OUTP:SER?",
            Command::IsParallel => "OUTP:PARA?",
            Command::OutputState => "OUTP:STAT",
            Command::SeriesMode => "OUTP:SER",
            Command::ParallelMode => "OUTP:PARA",
            Command::RemoteDisable => "SYST:LOC",
            Command::RemoteEnable => "SYST:REM",
            Command::SelectChannel => "INST:NSEL",
            Command::SetCurrent => "SOUR:CURR",
            Command::SetVoltage => "SOUR:VOLT",
        }
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}
