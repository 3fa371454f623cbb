use core::fmt::{self, Write as _};

use crate::{
    command::Command,
    config::ControllerConfig,
    error::{Error, Result},
    line,
    types::{Channel, ChannelValues, OutputMode, Quantity, StatusSnapshot},
    wire::{self, CurrentSetpoint, ParseError, VoltageSetpoint},
};

/// You can create a Bk9129b using any interface which implements [embedded_io::Read] & [embedded_io::Write].
///
/// Pass `&mut port` if you need the port back afterwards; the controller then only borrows it.
/// Either way the controller must be the only thing talking to the supply, since replies are
/// matched to queries purely by order.
///
/// For its methods, "set" means to write a configuration and "get" means to read back a
/// configuration value, whereas "measure" means to get a measured value.
///
/// Set points are never trusted: each write is re-sent until an independent read-back
/// agrees with it. Output enable, remote control and mode changes are sent once and taken
/// at face value.
pub struct Bk9129b<S: embedded_io::Read + embedded_io::Write, const L: usize = 64> {
    interface: S,
    config: ControllerConfig,
    /// Tracked, not queried. See [`Self::read_output_mode`].
    mode: OutputMode,
    /// Last selection the device confirmed. Never used in place of selecting again.
    selected: Option<Channel>,
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> Bk9129b<S, L> {
    /// Create a new Bk9129b with the default retry budgets and tolerances.
    ///
    /// Queries the supply for its output mode, so this fails if the supply does not answer.
    pub fn new(interface: S) -> Result<Self, S::Error> {
        Self::with_config(interface, ControllerConfig::default())
    }

    /// Create a new Bk9129b with custom retry budgets and tolerances.
    pub fn with_config(interface: S, config: ControllerConfig) -> Result<Self, S::Error> {
        let mut psu = Self {
            interface,
            config,
            mode: OutputMode::Independent,
            selected: None,
        };
        psu.mode = psu.read_output_mode()?;
        log::debug!("Supply reports {:?} output mode", psu.mode);
        Ok(psu)
    }

    /// Give the interface back.
    pub fn into_inner(self) -> S {
        self.interface
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The output mode as last detected or set by this controller.
    pub fn output_mode(&self) -> OutputMode {
        self.mode
    }

    /// The channel the device last confirmed as selected, if any.
    pub fn selected_channel(&self) -> Option<Channel> {
        self.selected
    }

    /// Ask the supply which output mode it is in.
    ///
    /// Series wins if the supply claims both. This does not update [`Self::output_mode`],
    /// so it can be used to check that a [`Self::set_output_mode`] took effect.
    pub fn read_output_mode(&mut self) -> Result<OutputMode, S::Error> {
        if self.query_integer(Command::IsSeries)? == 1 {
            return Ok(OutputMode::Series);
        }
        if self.query_integer(Command::IsParallel)? == 1 {
            return Ok(OutputMode::Parallel);
        }
        Ok(OutputMode::Independent)
    }

    /// Switch channels 1+2 between independent, series and parallel operation.
    ///
    /// Not verified. Going independent clears both series and parallel explicitly.
    pub fn set_output_mode(&mut self, mode: OutputMode) -> Result<(), S::Error> {
        match mode {
            OutputMode::Series => self.send_with(Command::SeriesMode, 1)?,
            OutputMode::Parallel => self.send_with(Command::ParallelMode, 1)?,
            OutputMode::Independent => {
                self.send_with(Command::SeriesMode, 0)?;
                self.send_with(Command::ParallelMode, 0)?;
            }
        }
        log::debug!("Output mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        Ok(())
    }

    /// Select the active channel, retrying up to the configured limit.
    ///
    /// Returns `Ok(false)` if the device never reported the channel as selected.
    pub fn select_channel(&mut self, channel: Channel) -> Result<bool, S::Error> {
        self.select_channel_with_retries(channel, self.config.select_retry_limit)
    }

    /// Select the active channel, making at most `retry_limit` attempts.
    ///
    /// Each attempt writes the selection and reads it straight back. A reply that is not an
    /// integer is an error and ends the attempts.
    pub fn select_channel_with_retries(
        &mut self,
        channel: Channel,
        retry_limit: u8,
    ) -> Result<bool, S::Error> {
        self.selected = None;
        for attempt in 1..=retry_limit {
            self.send_with(Command::SelectChannel, channel.number())?;
            let active = self.query_integer(Command::GetChannel)?;
            if active == i64::from(channel.number()) {
                self.selected = Some(channel);
                return Ok(true);
            }
            log::debug!(
                "Selecting {channel:?}: device reports channel {active} (attempt {attempt}/{retry_limit})"
            );
        }
        log::warn!("Could not select {channel:?} after {retry_limit} attempts");
        Ok(false)
    }

    /// Return the channel number the device reports as active.
    pub fn get_active_channel(&mut self) -> Result<i64, S::Error> {
        self.query_integer(Command::GetChannel)
    }

    /// Set the current limit of a channel, in amps, and confirm it by read-back.
    ///
    /// Returns `Ok(false)` if the channel could not be selected or the device never
    /// echoed the value back within tolerance.
    pub fn set_output_current(&mut self, current: f64, channel: Channel) -> Result<bool, S::Error> {
        self.set_and_verify(Quantity::Current, current, channel)
    }

    /// Set the output voltage of a channel, in volts, and confirm it by read-back.
    ///
    /// In series mode the value is the total across channels 1+2.
    pub fn set_output_voltage(&mut self, voltage: f64, channel: Channel) -> Result<bool, S::Error> {
        self.set_and_verify(Quantity::Voltage, voltage, channel)
    }

    fn set_and_verify(
        &mut self,
        quantity: Quantity,
        value: f64,
        channel: Channel,
    ) -> Result<bool, S::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidRange);
        }
        let command = quantity.set_command();
        let (frame, tolerance) = match quantity {
            Quantity::Current => (
                self.encode(command, CurrentSetpoint(value))?,
                self.config.current_tolerance,
            ),
            Quantity::Voltage => (
                self.encode(command, VoltageSetpoint(value))?,
                self.config.voltage_tolerance,
            ),
        };

        if !self.select_channel(channel)? {
            log::warn!("Not writing {quantity:?} set point, {channel:?} could not be selected");
            return Ok(false);
        }
        if self.mode.is_coupled(channel) {
            log::debug!("{channel:?} is coupled in {:?} mode", self.mode);
        }

        let retry_limit = self.config.setpoint_retry_limit;
        for attempt in 1..=retry_limit {
            line::send_line(&mut self.interface, &frame)?;
            let readback = self.query_float(quantity.readback_command())?;
            if within(readback, value, tolerance) {
                return Ok(true);
            }
            log::debug!(
                "{quantity:?} on {channel:?}: wrote {value}, read back {readback} (attempt {attempt}/{retry_limit})"
            );
        }
        log::warn!("{quantity:?} set point {value} on {channel:?} not confirmed after {retry_limit} attempts");
        Ok(false)
    }

    /// Enable/disable the outputs. Not verified.
    pub fn output_enable(&mut self, enable: bool) -> Result<(), S::Error> {
        self.send_with(Command::OutputState, u8::from(enable))
    }

    /// Disable the outputs. Not verified.
    pub fn output_disable(&mut self) -> Result<(), S::Error> {
        self.output_enable(false)
    }

    /// Take (`true`) or release (`false`) remote control of the supply. Not verified.
    pub fn remote_control(&mut self, enable: bool) -> Result<(), S::Error> {
        if enable {
            self.send(Command::RemoteEnable)
        } else {
            self.send(Command::RemoteDisable)
        }
    }

    /// Clear a tripped protection. Not verified.
    pub fn clear_protection(&mut self) -> Result<(), S::Error> {
        self.send(Command::ClearProtection)
    }

    /// Disable the outputs and hand control back to the front panel.
    ///
    /// Best effort: failures are logged and both steps are always attempted.
    pub fn close(&mut self) {
        if let Err(err) = self.output_disable() {
            log::warn!("Failed to disable outputs on close: {err}");
        }
        if let Err(err) = self.remote_control(false) {
            log::warn!("Failed to release remote control on close: {err}");
        }
    }

    /// Return the output state of every channel.
    pub fn get_output_status(&mut self) -> Result<ChannelValues<bool>, S::Error> {
        self.query_list(Command::GetOutputStateAll, wire::parse_flag)
    }

    /// Return the measured output current of every channel, in amps.
    pub fn get_output_current(&mut self) -> Result<ChannelValues<f64>, S::Error> {
        self.query_list(Command::MeasureCurrentAll, wire::parse_float)
    }

    /// Return the measured output voltage of every channel, in volts.
    pub fn get_output_voltage(&mut self) -> Result<ChannelValues<f64>, S::Error> {
        self.query_list(Command::MeasureVoltageAll, wire::parse_float)
    }

    /// Return the current limit set point of every channel, in amps.
    pub fn get_output_current_setpoint(&mut self) -> Result<ChannelValues<f64>, S::Error> {
        let values = self.query_list(Command::GetCurrentSetpointAll, wire::parse_float)?;
        log::debug!("Current set points: {values:?}");
        Ok(values)
    }

    /// Return the voltage set point of every channel, in volts.
    pub fn get_output_voltage_setpoint(&mut self) -> Result<ChannelValues<f64>, S::Error> {
        let values = self.query_list(Command::GetVoltageSetpointAll, wire::parse_float)?;
        log::debug!("Voltage set points: {values:?}");
        Ok(values)
    }

    /// Read outputs, measurements and set points of every channel.
    ///
    /// Five separate queries; the supply may change state in between.
    pub fn get_status(&mut self) -> Result<StatusSnapshot, S::Error> {
        Ok(StatusSnapshot {
            output_enable: self.get_output_status()?,
            output_current: self.get_output_current()?,
            output_voltage: self.get_output_voltage()?,
            target_current: self.get_output_current_setpoint()?,
            target_voltage: self.get_output_voltage_setpoint()?,
        })
    }

    /// Return the measured output current of one channel, in amps.
    ///
    /// `None` if the channel could not be selected.
    pub fn measure_current(&mut self, channel: Channel) -> Result<Option<f64>, S::Error> {
        self.query_channel(channel, Command::MeasureCurrent, wire::parse_float)
    }

    /// Return the measured output voltage of one channel, in volts.
    ///
    /// `None` if the channel could not be selected.
    pub fn measure_voltage(&mut self, channel: Channel) -> Result<Option<f64>, S::Error> {
        self.query_channel(channel, Command::MeasureVoltage, wire::parse_float)
    }

    /// Return whether one channel's output is enabled.
    ///
    /// `None` if the channel could not be selected.
    pub fn get_channel_output_state(&mut self, channel: Channel) -> Result<Option<bool>, S::Error> {
        self.query_channel(channel, Command::GetOutputState, wire::parse_flag)
    }

    fn query_channel<T>(
        &mut self,
        channel: Channel,
        command: Command,
        parse: impl Fn(&str) -> core::result::Result<T, ParseError>,
    ) -> Result<Option<T>, S::Error> {
        if !self.select_channel(channel)? {
            return Ok(None);
        }
        let reply = self.query(command)?;
        Ok(Some(parse(reply.as_str())?))
    }

    fn query_list<T>(
        &mut self,
        command: Command,
        parse: impl Fn(&str) -> core::result::Result<T, ParseError>,
    ) -> Result<ChannelValues<T>, S::Error> {
        let reply = self.query(command)?;
        Ok(wire::parse_list(reply.as_str(), parse)?)
    }

    fn query_integer(&mut self, command: Command) -> Result<i64, S::Error> {
        let reply = self.query(command)?;
        Ok(wire::parse_integer(reply.as_str())?)
    }

    fn query_float(&mut self, command: Command) -> Result<f64, S::Error> {
        let reply = self.query(command)?;
        Ok(wire::parse_float(reply.as_str())?)
    }

    /// Send a query and read its single reply line.
    fn query(&mut self, command: Command) -> Result<heapless::String<L>, S::Error> {
        self.send(command)?;
        line::read_line(&mut self.interface)
    }

    fn send(&mut self, command: Command) -> Result<(), S::Error> {
        line::send_line(&mut self.interface, command.token())
    }

    fn send_with(&mut self, command: Command, argument: impl fmt::Display) -> Result<(), S::Error> {
        let frame = self.encode(command, argument)?;
        line::send_line(&mut self.interface, &frame)
    }

    /// Render `<token> <argument>`. The space is required by the firmware.
    fn encode(
        &self,
        command: Command,
        argument: impl fmt::Display,
    ) -> Result<heapless::String<L>, S::Error> {
        let mut frame = heapless::String::new();
        write!(frame, "{command} {argument}").map_err(|_| Error::BufferError)?;
        Ok(frame)
    }
}

/// `|a - b| < tolerance`, without needing `f64::abs` from std.
fn within(a: f64, b: f64, tolerance: f64) -> bool {
    let error = if a > b { a - b } else { b - a };
    error < tolerance
}
