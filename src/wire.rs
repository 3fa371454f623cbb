//! Lexical forms used on the wire: how set points are written and how replies are read.

use core::fmt;

use crate::types::ChannelValues;

/// A reply could not be interpreted as the expected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError;

/// Current set point as the 9129B expects it.
///
/// Below 1 A the value is sent in milliamps (`150.000mA`), otherwise in amps (`1.500A`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentSetpoint(pub f64);

impl fmt::Display for CurrentSetpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1.0 {
            write!(f, "{:.3}mA", self.0 * 1000.0)
        } else {
            write!(f, "{:.3}A", self.0)
        }
    }
}

/// Voltage set point as the 9129B expects it. Always two decimals, no unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageSetpoint(pub f64);

impl fmt::Display for VoltageSetpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Parse a plain integer reply, e.g. the active channel or a mode flag.
pub fn parse_integer(reply: &str) -> Result<i64, ParseError> {
    reply.trim().parse::<i64>().map_err(|_| ParseError)
}

/// Parse a `0`/`1` style flag. Any nonzero integer is `true`.
pub fn parse_flag(reply: &str) -> Result<bool, ParseError> {
    parse_integer(reply).map(|value| value != 0)
}

/// Parse a single decimal reply.
pub fn parse_float(reply: &str) -> Result<f64, ParseError> {
    reply.trim().parse::<f64>().map_err(|_| ParseError)
}

/// Parse a `", "` separated per-channel list, in the order the device reported it.
///
/// More entries than the supply has channels is treated as malformed, as is an empty entry.
pub fn parse_list<T>(
    reply: &str,
    parse_one: impl Fn(&str) -> Result<T, ParseError>,
) -> Result<ChannelValues<T>, ParseError> {
    let mut values = ChannelValues::new();
    for entry in reply.trim().split(',') {
        let value = parse_one(entry)?;
        values.push(value).map_err(|_| ParseError)?;
    }
    Ok(values)
}
