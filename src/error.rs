//! Unified error types for the Infinistream controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform. Configuration problems
//! are fatal at startup validation; capability I/O failures surface per
//! tick and are resolved by the loop's configured policy.

use core::fmt;
use std::io;

use crate::relays::RelayAddress;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Configuration failed startup validation (zero full-scale divisor,
    /// duplicate relay address, missing bank endpoint).
    Config(&'static str),
    /// A hardware collaborator could not be reached at startup.
    Connect {
        endpoint: String,
        source: io::Error,
    },
    /// A digital selector line could not be read.
    DigitalRead { channel: u8, source: io::Error },
    /// An analog channel could not be read.
    AnalogRead { channel: u8, source: io::Error },
    /// A relay write failed. Writes before this one in the plan have
    /// already been issued; the physical system may be in a mixed state.
    RelayWrite {
        address: RelayAddress,
        source: io::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Connect { endpoint, source } => {
                write!(f, "connect to {endpoint}: {source}")
            }
            Self::DigitalRead { channel, source } => {
                write!(f, "digital read (channel {channel}): {source}")
            }
            Self::AnalogRead { channel, source } => {
                write!(f, "analog read (channel {channel}): {source}")
            }
            Self::RelayWrite { address, source } => {
                write!(f, "relay write ({address}): {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(_) => None,
            Self::Connect { source, .. }
            | Self::DigitalRead { source, .. }
            | Self::AnalogRead { source, .. }
            | Self::RelayWrite { source, .. } => Some(source),
        }
    }
}

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
