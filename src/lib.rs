//! This crate provides an interface for communicating with and controlling the BK Precision 9129B
//! triple output programmable power supply.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! The supply speaks a SCPI-like text protocol, one command per `\n` terminated line. It is not
//! a well behaved peer: channel selections and set points are sometimes silently dropped,
//! especially right after a mode or channel change. The [`psu::Bk9129b`] controller therefore
//! confirms every selection and every set point with a read-back, retrying a bounded number of
//! times, and reports a value the supply never accepted as `Ok(false)` rather than an error.
//!
//! Calibration commands are not implemented.
//!
//! The serial port used for PSU comms should be configured like so:
//! * Default baud rate: 9600 (4800 and 38400 are also available, see [`types::BaudRate`])
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None
//! * A read timeout, so that a silent supply surfaces as [`error::Error::Timeout`]

#![cfg_attr(all(feature = "no-std", not(test)), no_std)]

pub mod command;
pub mod config;
pub mod error;
mod line;
pub mod psu;
pub mod types;
pub mod wire;

pub use config::ControllerConfig;
pub use error::{Error, Result};
pub use psu::Bk9129b;
pub use types::{BaudRate, Channel, ChannelValues, OutputMode, StatusSnapshot};

#[cfg(test)]
mod mock_serial;
