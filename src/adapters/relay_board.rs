//! TCP transport to ETH-series relay boards.
//!
//! One persistent connection per relay bank. The framing is the board's
//! native byte protocol — a command byte plus operands, answered by a
//! short fixed-length response — and stays entirely inside this adapter;
//! the core only ever sees the port traits.
//!
//! The boards also expose their digital inputs and analog channels over
//! the same connection, which is how the selector lines and the flow and
//! turbidity sensors are acquired in relay-board deployments.

use std::io;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use log::info;

use crate::app::ports::{AnalogInputPort, DigitalInputPort, RelayPort};
use crate::config::HwConfig;
use crate::error::{Error, Result};
use crate::relays::{RelayAddress, RelayState};

const CMD_RELAY_ACTIVE: u8 = 0x20;
const CMD_RELAY_INACTIVE: u8 = 0x21;
const CMD_GET_INPUTS: u8 = 0x25;
const CMD_GET_ANALOG: u8 = 0x32;

/// Board inputs are reported as a 32-bit field, LSB-first.
const INPUT_FIELD_BYTES: usize = 4;

const IO_TIMEOUT: Duration = Duration::from_secs(2);

pub struct RelayBoardClient {
    banks: Vec<Bank>,
}

struct Bank {
    stream: TcpStream,
}

impl Bank {
    fn transact(&mut self, command: &[u8], response: &mut [u8]) -> io::Result<()> {
        self.stream.write_all(command)?;
        self.stream.read_exact(response)
    }
}

impl RelayBoardClient {
    /// Connect to every configured bank.
    ///
    /// Fails fast if the relay map references a bank with no endpoint —
    /// that is a configuration error, caught here so it can never surface
    /// mid-plan at tick time.
    pub fn connect(hw: &HwConfig) -> Result<Self> {
        for address in hw.relays.addresses() {
            if usize::from(address.bank) >= hw.relay_banks.len() {
                return Err(Error::Config(
                    "relay map references a bank with no configured endpoint",
                ));
            }
        }

        let mut banks = Vec::with_capacity(hw.relay_banks.len());
        for endpoint in &hw.relay_banks {
            let connect = |source| Error::Connect {
                endpoint: endpoint.clone(),
                source,
            };
            let stream = TcpStream::connect(endpoint).map_err(connect)?;
            stream.set_read_timeout(Some(IO_TIMEOUT)).map_err(connect)?;
            stream.set_write_timeout(Some(IO_TIMEOUT)).map_err(connect)?;
            info!("relay bank connected: {endpoint}");
            banks.push(Bank { stream });
        }
        Ok(Self { banks })
    }

    fn bank(&mut self, bank: u8) -> io::Result<&mut Bank> {
        self.banks
            .get_mut(usize::from(bank))
            .ok_or_else(|| io::Error::other("unmapped relay bank"))
    }
}

/// Extract one input line from the board's packed state field.
/// Inputs are numbered from 1.
fn input_bit(states: [u8; INPUT_FIELD_BYTES], channel: u8) -> io::Result<bool> {
    if channel == 0 || usize::from(channel) > INPUT_FIELD_BYTES * 8 {
        return Err(io::Error::other("input channel out of range"));
    }
    let index = usize::from(channel - 1);
    Ok(states[index / 8] >> (index % 8) & 1 == 1)
}

impl RelayPort for RelayBoardClient {
    fn write_relay(&mut self, address: RelayAddress, state: RelayState) -> Result<()> {
        let fail = |source| Error::RelayWrite { address, source };

        let opcode = match state {
            RelayState::Open => CMD_RELAY_ACTIVE,
            RelayState::Closed => CMD_RELAY_INACTIVE,
        };
        // Board relays are numbered from 1; a pulse time of 0 latches.
        let command = [opcode, address.relay + 1, 0];

        let bank = self.bank(address.bank).map_err(fail)?;
        let mut ack = [0u8; 1];
        bank.transact(&command, &mut ack).map_err(fail)?;
        if ack[0] != 0 {
            return Err(fail(io::Error::other("board rejected relay command")));
        }
        Ok(())
    }
}

impl DigitalInputPort for RelayBoardClient {
    fn read_digital(&mut self, channel: u8) -> Result<bool> {
        let fail = |source| Error::DigitalRead { channel, source };

        // Inputs live on the first bank.
        let bank = self.bank(0).map_err(fail)?;
        let mut states = [0u8; INPUT_FIELD_BYTES];
        bank.transact(&[CMD_GET_INPUTS], &mut states).map_err(fail)?;
        input_bit(states, channel).map_err(fail)
    }
}

impl AnalogInputPort for RelayBoardClient {
    fn read_analog(&mut self, channel: u8) -> Result<i32> {
        let fail = |source| Error::AnalogRead { channel, source };

        let bank = self.bank(0).map_err(fail)?;
        let mut sample = [0u8; 2];
        bank.transact(&[CMD_GET_ANALOG, channel], &mut sample)
            .map_err(fail)?;
        Ok(i32::from(u16::from_be_bytes(sample)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_bits_unpack_lsb_first() {
        let states = [0b0000_0101, 0b0000_0001, 0, 0];
        assert!(input_bit(states, 1).unwrap());
        assert!(!input_bit(states, 2).unwrap());
        assert!(input_bit(states, 3).unwrap());
        assert!(input_bit(states, 9).unwrap());
        assert!(!input_bit(states, 32).unwrap());
    }

    #[test]
    fn out_of_range_inputs_are_io_errors() {
        assert!(input_bit([0; 4], 0).is_err());
        assert!(input_bit([0; 4], 33).is_err());
    }
}
